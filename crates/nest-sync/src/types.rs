use nest_config::Meta;
use nest_diff::{Diff, LineDiff};
use serde::Serialize;

/// Config as stored on the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteConfig {
    pub meta: Meta,
    pub ignore: String,
    /// Milliseconds since the Unix epoch.
    pub last_sync: i64,
}

/// Modification flags for the two synced files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub meta: bool,
    pub ignore: bool,
}

impl FileStatus {
    pub fn any(&self) -> bool {
        self.meta || self.ignore
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Local files differ from the last-synced snapshot.
    pub local: FileStatus,
    /// Pulling would change the local files.
    pub remote: FileStatus,
    /// The local snapshot is newer than the remote config.
    pub local_newer: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffReport {
    pub meta: Diff,
    pub ignore: LineDiff,
    pub conflict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullOutcome {
    /// Local files were overwritten with the remote config.
    Forced,
    /// Nothing changed on either side.
    UpToDate,
    /// No local edits; the remote config was taken as is.
    FastForward,
    /// Local edits were replayed onto the remote config.
    Merged { conflict: bool },
    /// The reviewer rejected the merge; nothing was written.
    Declined,
}

impl PullOutcome {
    /// `true` if the local files now match a state that may be uploaded.
    pub fn is_clean(&self) -> bool {
        !matches!(self, Self::Merged { conflict: true } | Self::Declined)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushOutcome {
    Uploaded,
    Forced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// Set when the remote was ahead and a pull ran first.
    pub pull: Option<PullOutcome>,
    /// Set when the local config was uploaded.
    pub push: Option<PushOutcome>,
}
