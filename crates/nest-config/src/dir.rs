//! The `.nest/` directory holding `module.json`, `data.json` and `ignore`.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::meta::{Meta, SCHEMA_KEY};
use crate::project::{now_millis, Project};

/// Default config directory name, relative to the module root.
pub const NEST_DIRECTORY: &str = ".nest";
pub const META_FILE: &str = "module.json";
pub const DATA_FILE: &str = "data.json";
pub const IGNORE_FILE: &str = "ignore";

const META_SCHEMA: &str = "../cli/module.json";
const DATA_COMMENT: &str = "THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.";

/// The user-editable files, read together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalFiles {
    pub meta: Meta,
    pub ignore: String,
}

/// Handle on a config directory.
#[derive(Clone, Debug)]
pub struct ConfigDir {
    root: PathBuf,
}

impl ConfigDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta_path(&self) -> PathBuf {
        self.root.join(META_FILE)
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    pub fn ignore_path(&self) -> PathBuf {
        self.root.join(IGNORE_FILE)
    }

    /// Fail with [`ConfigError::MissingFile`] naming the first missing file.
    pub async fn ensure_exists(&self) -> ConfigResult<()> {
        for (file, path) in [
            (META_FILE, self.meta_path()),
            (DATA_FILE, self.data_path()),
            (IGNORE_FILE, self.ignore_path()),
        ] {
            if tokio::fs::metadata(&path).await.is_err() {
                return Err(ConfigError::MissingFile {
                    file: file.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Create the directory and write all three files from `project`.
    pub async fn init(&self, project: &Project) -> ConfigResult<()> {
        if tokio::fs::metadata(self.data_path()).await.is_ok() {
            return Err(ConfigError::AlreadyInitialized(self.root.clone()));
        }
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| io_error(&self.root, source))?;

        tokio::try_join!(
            self.write_meta(&project.meta),
            self.write_ignore(&project.ignore),
            self.write_project(project),
        )?;
        info!(module = %project.module(), root = %self.root.display(), "initialized config directory");
        Ok(())
    }

    pub async fn read_project(&self) -> ConfigResult<Project> {
        read_json(&self.data_path(), DATA_FILE).await
    }

    pub async fn read_meta(&self) -> ConfigResult<Meta> {
        let value: Value = read_json(&self.meta_path(), META_FILE).await?;
        Meta::from_value(value, META_FILE)
    }

    pub async fn read_ignore(&self) -> ConfigResult<String> {
        read_text(&self.ignore_path(), IGNORE_FILE).await
    }

    /// Read `module.json` and `ignore` concurrently.
    pub async fn read_local(&self) -> ConfigResult<LocalFiles> {
        let (meta, ignore) = tokio::try_join!(self.read_meta(), self.read_ignore())?;
        Ok(LocalFiles { meta, ignore })
    }

    pub async fn write_meta(&self, meta: &Meta) -> ConfigResult<()> {
        let mut out = Map::new();
        out.insert(SCHEMA_KEY.into(), Value::String(META_SCHEMA.into()));
        if let Value::Object(fields) = meta.to_value()? {
            out.extend(fields);
        }
        write_json(&self.meta_path(), META_FILE, &Value::Object(out)).await
    }

    pub async fn write_project(&self, project: &Project) -> ConfigResult<()> {
        let mut out = Map::new();
        out.insert("$comment".into(), Value::String(DATA_COMMENT.into()));
        let value = serde_json::to_value(project).map_err(|source| ConfigError::Json {
            file: DATA_FILE.to_string(),
            source,
        })?;
        if let Value::Object(fields) = value {
            out.extend(fields);
        }
        write_json(&self.data_path(), DATA_FILE, &Value::Object(out)).await
    }

    pub async fn write_ignore(&self, ignore: &str) -> ConfigResult<()> {
        let path = self.ignore_path();
        tokio::fs::write(&path, ignore)
            .await
            .map_err(|source| io_error(&path, source))?;
        debug!(file = IGNORE_FILE, bytes = ignore.len(), "wrote config file");
        Ok(())
    }

    /// Persist `meta` and `ignore` as both the working files and the new
    /// last-synced snapshot, stamping `lastSync` with the current time.
    pub async fn update(&self, project: &Project, meta: &Meta, ignore: &str) -> ConfigResult<Project> {
        let mut updated = project.clone();
        updated.meta = meta.clone();
        updated.ignore = ignore.to_string();
        updated.last_sync = now_millis();

        tokio::try_join!(
            self.write_meta(meta),
            self.write_ignore(ignore),
            self.write_project(&updated),
        )?;
        debug!(last_sync = updated.last_sync, "config snapshot updated");
        Ok(updated)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}

async fn read_text(path: &Path, file: &str) -> ConfigResult<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::MissingFile {
            file: file.to_string(),
        }),
        Err(e) => Err(io_error(path, e)),
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path, file: &str) -> ConfigResult<T> {
    let text = read_text(path, file).await?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        file: file.to_string(),
        source,
    })
}

async fn write_json(path: &Path, file: &str, value: &Value) -> ConfigResult<()> {
    let mut text = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Json {
        file: file.to_string(),
        source,
    })?;
    text.push('\n');
    tokio::fs::write(path, &text)
        .await
        .map_err(|source| io_error(path, source))?;
    debug!(file, bytes = text.len(), "wrote config file");
    Ok(())
}
