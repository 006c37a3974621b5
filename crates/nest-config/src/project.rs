use std::fmt;

use serde::{Deserialize, Serialize};

use crate::meta::Meta;

/// Default contents of a fresh `ignore` file.
pub const DEFAULT_IGNORE: &str = ".*";

/// Identifies a module on the registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleRef {
    pub author: String,
    pub name: String,
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.author, self.name)
    }
}

/// Registry-side publishing state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Api {
    pub versions: Vec<String>,
    pub latest_version: String,
    pub last_published: i64,
}

/// The tool-managed project state stored in `data.json`.
///
/// `meta` and `ignore` hold the snapshot taken at the last successful sync;
/// local edits are diffed against them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub author: String,
    pub version: String,
    /// Milliseconds since the Unix epoch.
    pub last_sync: i64,
    pub next_auto_sync: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub ignore: String,
}

impl Project {
    pub fn new(author: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            version: version.into(),
            last_sync: 0,
            next_auto_sync: 0,
            api: Api::default(),
            meta: Meta::default(),
            ignore: DEFAULT_IGNORE.to_string(),
        }
    }

    pub fn module(&self) -> ModuleRef {
        ModuleRef {
            author: self.author.clone(),
            name: self.name.clone(),
        }
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
