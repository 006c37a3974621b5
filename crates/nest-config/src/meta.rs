//! The user-editable module metadata stored in `module.json`.
//!
//! This is the schema layer: everything the diff engine sees has already been
//! checked against these types, so unknown keys and mistyped fields are
//! rejected here rather than merged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};

/// Editor hint written at the top of `module.json`; never compared or synced.
pub(crate) const SCHEMA_KEY: &str = "$schema";

/// Lifecycle hooks run around sync, pack, publish and audit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hooks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presync: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postsync: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postpack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepublish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postpublish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preaudit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postaudit: Option<String>,
}

/// Module metadata as published to the registry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlisted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<Hooks>,
}

impl Meta {
    /// The JSON tree handed to the diff engine.
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|source| ConfigError::Json {
            file: crate::dir::META_FILE.to_string(),
            source,
        })
    }

    /// Validate a JSON tree (typically a merge result) against the schema.
    ///
    /// The `$schema` editor hint is dropped. `file` names the origin of the
    /// value in error messages.
    pub fn from_value(value: Value, file: &str) -> ConfigResult<Self> {
        let fields: Map<String, Value> = match value {
            Value::Object(fields) => fields,
            other => {
                let reason = match other {
                    Value::Array(_) => "received an array".to_string(),
                    other => format!("expected an object, received {other}"),
                };
                return Err(ConfigError::InvalidMeta {
                    file: file.to_string(),
                    reason,
                });
            }
        };
        let fields = fields.into_iter().filter(|(key, _)| key != SCHEMA_KEY).collect();

        serde_json::from_value(Value::Object(fields)).map_err(|e| ConfigError::InvalidMeta {
            file: file.to_string(),
            reason: e.to_string(),
        })
    }
}
