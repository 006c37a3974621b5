//! # nest-config
//!
//! On-disk configuration for a nest module: the `.nest/` directory with the
//! user-editable `module.json` and `ignore` files and the tool-managed
//! `data.json` holding the last-synced snapshot.

pub mod dir;
pub mod error;
pub mod meta;
pub mod project;

pub use dir::{ConfigDir, LocalFiles, DATA_FILE, IGNORE_FILE, META_FILE, NEST_DIRECTORY};
pub use error::{ConfigError, ConfigResult};
pub use meta::{Hooks, Meta};
pub use project::{now_millis, Api, ModuleRef, Project, DEFAULT_IGNORE};
