use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{file} is missing; run `nest init` to create it")]
    MissingFile { file: String },

    #[error("config directory already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid module metadata in {file}: {reason}")]
    InvalidMeta { file: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
