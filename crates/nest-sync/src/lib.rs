//! Config synchronization between a nest module and the registry.
//!
//! Local edits are measured against the snapshot taken at the last sync and
//! replayed onto the remote config with the merge engine. The registry and
//! the user confirmation step sit behind async traits so the workflows can
//! run against an in-memory registry in tests.

pub mod config_sync;
pub mod error;
pub mod hooks;
pub mod registry;
pub mod review;
pub mod types;

pub use config_sync::ConfigSync;
pub use error::{SyncError, SyncResult};
pub use hooks::run_hook;
pub use registry::{PlaceholderRegistry, RegistryApi};
pub use review::{AssumeYes, Review, Reviewer};
pub use types::{
    DiffReport, FileStatus, PullOutcome, PushOutcome, RemoteConfig, StatusReport, SyncOutcome,
};
