//! Status, diff, pull, push and sync between the local `.nest/` directory
//! and the registry.
//!
//! Local edits are always measured against the snapshot stored in
//! `data.json`. A pull replays those edits onto the remote config; a push
//! uploads the local files as they are.

use std::path::Path;

use nest_config::{ConfigDir, LocalFiles, Meta, Project};
use nest_diff::{compare_lines, diff_values, values_equal, Diff, LineDiff};
use nest_merge::{apply, apply_lines};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::hooks::run_hook;
use crate::registry::RegistryApi;
use crate::review::{Review, Reviewer};
use crate::types::{
    DiffReport, FileStatus, PullOutcome, PushOutcome, RemoteConfig, StatusReport, SyncOutcome,
};

/// Name used for the merged metadata in validation errors.
const MERGED_META: &str = "merged module.json";

/// Everything a workflow needs, read in one go.
struct State {
    project: Project,
    local: LocalFiles,
    remote: RemoteConfig,
}

/// Local edits relative to the snapshot.
struct LocalChanges {
    meta: Diff,
    ignore: LineDiff,
}

/// Local edits replayed onto the remote config.
struct MergedConfig {
    meta: Meta,
    ignore: String,
    review: Review,
}

/// Runs the config workflows for one module directory.
pub struct ConfigSync<R, V> {
    dir: ConfigDir,
    registry: R,
    reviewer: V,
    token: Option<String>,
}

impl<R: RegistryApi, V: Reviewer> ConfigSync<R, V> {
    pub fn new(dir: ConfigDir, registry: R, reviewer: V) -> Self {
        Self {
            dir,
            registry,
            reviewer,
            token: None,
        }
    }

    /// Set the registry token required by [`push`](Self::push) and
    /// [`sync`](Self::sync).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn dir(&self) -> &ConfigDir {
        &self.dir
    }

    pub async fn status(&self) -> SyncResult<StatusReport> {
        let state = self.load().await?;
        let changes = local_changes(&state)?;
        let merged = merge(&state, &changes)?;

        Ok(StatusReport {
            local: FileStatus {
                meta: changes.meta.is_modified(),
                ignore: changes.ignore.is_modified(),
            },
            remote: FileStatus {
                meta: merged.review.meta.is_modified(),
                ignore: merged.review.ignore.is_modified(),
            },
            local_newer: state.project.last_sync >= state.remote.last_sync,
        })
    }

    /// With `remote == false`, the local edits since the last sync; otherwise
    /// what a pull would change in the local files.
    pub async fn diff(&self, remote: bool) -> SyncResult<DiffReport> {
        if !remote {
            self.dir.ensure_exists().await?;
            let (project, local) = tokio::try_join!(self.dir.read_project(), self.dir.read_local())?;
            return Ok(DiffReport {
                meta: diff_values(&local.meta.to_value()?, &project.meta.to_value()?),
                ignore: compare_lines(&local.ignore, &project.ignore),
                conflict: false,
            });
        }

        let state = self.load().await?;
        let changes = local_changes(&state)?;
        let Review {
            meta,
            ignore,
            conflict,
        } = merge(&state, &changes)?.review;
        Ok(DiffReport {
            meta,
            ignore,
            conflict,
        })
    }

    pub async fn pull(&self, force: bool) -> SyncResult<PullOutcome> {
        let state = self.load().await?;
        self.pull_loaded(&state, force).await
    }

    pub async fn push(&self, force: bool) -> SyncResult<PushOutcome> {
        let token = self.token()?;
        let state = self.load().await?;
        self.push_loaded(&state.project, &state.local, &state.remote, force, token)
            .await
    }

    /// Pull when the remote is ahead, then upload unless the pull left a
    /// conflict or was declined.
    ///
    /// The module's `presync` hook runs first and `postsync` last, both from
    /// the module root. A failing hook aborts the command.
    pub async fn sync(&self) -> SyncResult<SyncOutcome> {
        let token = self.token()?;
        self.dir.ensure_exists().await?;
        let hooks = self.dir.read_meta().await?.hooks.unwrap_or_default();
        let root = self.module_root();

        run_hook("presync", hooks.presync.as_deref(), root).await?;
        let outcome = self.sync_once(token).await?;
        run_hook("postsync", hooks.postsync.as_deref(), root).await?;
        Ok(outcome)
    }

    async fn sync_once(&self, token: &str) -> SyncResult<SyncOutcome> {
        let state = self.load().await?;

        if state.project.last_sync >= state.remote.last_sync {
            let push = self
                .push_loaded(&state.project, &state.local, &state.remote, false, token)
                .await?;
            return Ok(SyncOutcome {
                pull: None,
                push: Some(push),
            });
        }

        let pulled = self.pull_loaded(&state, false).await?;
        if !pulled.is_clean() {
            info!(outcome = ?pulled, "skipping upload");
            return Ok(SyncOutcome {
                pull: Some(pulled),
                push: None,
            });
        }

        let (project, local) = tokio::try_join!(self.dir.read_project(), self.dir.read_local())?;
        let push = self
            .push_loaded(&project, &local, &state.remote, false, token)
            .await?;
        Ok(SyncOutcome {
            pull: Some(pulled),
            push: Some(push),
        })
    }

    /// The directory holding the config directory; hooks run there.
    fn module_root(&self) -> &Path {
        match self.dir.root().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn token(&self) -> SyncResult<&str> {
        self.token.as_deref().ok_or(SyncError::NotAuthenticated)
    }

    async fn load(&self) -> SyncResult<State> {
        self.dir.ensure_exists().await?;
        let project = self.dir.read_project().await?;
        let module = project.module();

        let (local, remote) = tokio::try_join!(
            async { self.dir.read_local().await.map_err(SyncError::from) },
            self.registry.download_config(&module),
        )?;
        debug!(%module, local_sync = project.last_sync, remote_sync = remote.last_sync, "loaded config state");
        Ok(State {
            project,
            local,
            remote,
        })
    }

    async fn pull_loaded(&self, state: &State, force: bool) -> SyncResult<PullOutcome> {
        let State {
            project,
            local,
            remote,
        } = state;

        if force {
            self.dir.update(project, &remote.meta, &remote.ignore).await?;
            warn!(module = %project.module(), "config was force pulled to local");
            return Ok(PullOutcome::Forced);
        }

        let changes = local_changes(state)?;
        if !changes.meta.is_modified() && !changes.ignore.is_modified() {
            let synced = values_equal(&local.meta.to_value()?, &remote.meta.to_value()?)
                && compare_lines(&local.ignore, &remote.ignore).is_unchanged();
            self.dir.update(project, &remote.meta, &remote.ignore).await?;
            return Ok(if synced {
                info!("already synced");
                PullOutcome::UpToDate
            } else {
                info!("fast-forwarded local config to remote");
                PullOutcome::FastForward
            });
        }

        let merged = merge(state, &changes)?;
        if merged.review.is_modified() && !self.reviewer.confirm(&merged.review).await? {
            info!("merge declined; nothing written");
            return Ok(PullOutcome::Declined);
        }

        self.dir.update(project, &merged.meta, &merged.ignore).await?;
        let conflict = merged.review.conflict;
        if conflict {
            warn!("conflict detected; resolve it before pushing to remote");
        } else {
            info!("successfully updated config");
        }
        Ok(PullOutcome::Merged { conflict })
    }

    async fn push_loaded(
        &self,
        project: &Project,
        local: &LocalFiles,
        remote: &RemoteConfig,
        force: bool,
        token: &str,
    ) -> SyncResult<PushOutcome> {
        if !force && project.last_sync <= remote.last_sync {
            return Err(SyncError::RemoteAhead);
        }

        let module = project.module();
        self.registry
            .upload_config(&module, &local.meta, &local.ignore, token)
            .await?;
        self.dir.update(project, &local.meta, &local.ignore).await?;

        if force {
            warn!(%module, "config was force pushed to remote");
            Ok(PushOutcome::Forced)
        } else {
            info!(%module, "config pushed to remote");
            Ok(PushOutcome::Uploaded)
        }
    }
}

fn local_changes(state: &State) -> SyncResult<LocalChanges> {
    Ok(LocalChanges {
        meta: diff_values(&state.local.meta.to_value()?, &state.project.meta.to_value()?),
        ignore: compare_lines(&state.local.ignore, &state.project.ignore),
    })
}

fn merge(state: &State, changes: &LocalChanges) -> SyncResult<MergedConfig> {
    let local_meta = state.local.meta.to_value()?;

    let meta = apply(&changes.meta, &state.remote.meta.to_value()?)?;
    let ignore = apply_lines(&changes.ignore, &state.remote.ignore);
    let conflict = meta.conflict || ignore.conflict;
    if conflict {
        debug!(meta = meta.conflict, ignore = ignore.conflict, "merge kept both sides");
    }

    let review = Review {
        meta: diff_values(&meta.value, &local_meta),
        ignore: compare_lines(&ignore.value, &state.local.ignore),
        conflict,
    };
    Ok(MergedConfig {
        meta: validate(meta.value)?,
        ignore: ignore.value,
        review,
    })
}

fn validate(value: Value) -> SyncResult<Meta> {
    Ok(Meta::from_value(value, MERGED_META)?)
}
