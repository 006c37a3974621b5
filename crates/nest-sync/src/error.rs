use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] nest_config::ConfigError),

    #[error("merge error: {0}")]
    Merge(#[from] nest_merge::MergeError),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("remote config was modified; pull the changes before pushing")]
    RemoteAhead,

    #[error("not authenticated; set NEST_TOKEN or log in first")]
    NotAuthenticated,

    #[error("review failed: {0}")]
    Review(String),

    #[error("{hook} hook `{command}` failed: {reason}")]
    Hook {
        hook: &'static str,
        command: String,
        reason: String,
    },
}

pub type SyncResult<T> = Result<T, SyncError>;
