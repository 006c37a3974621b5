//! Lifecycle hooks declared in `module.json`.

use std::path::Path;
use std::time::Instant;

use tokio::process::Command;
use tracing::{error, info};

use crate::error::{SyncError, SyncResult};

/// Run `command` through the platform shell in `cwd`.
///
/// A missing or blank command is a no-op. Fails with [`SyncError::Hook`]
/// when the command cannot be started or exits unsuccessfully.
pub async fn run_hook(hook: &'static str, command: Option<&str>, cwd: &Path) -> SyncResult<()> {
    let Some(command) = command.filter(|c| !c.trim().is_empty()) else {
        return Ok(());
    };
    info!(hook, command, "running hook");

    let started = Instant::now();
    let status = shell(command)
        .current_dir(cwd)
        .status()
        .await
        .map_err(|e| SyncError::Hook {
            hook,
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        error!(hook, code = ?status.code(), "hook failed");
        return Err(SyncError::Hook {
            hook,
            command: command.to_string(),
            reason: match status.code() {
                Some(code) => format!("exited with code {code}"),
                None => "terminated by signal".to_string(),
            },
        });
    }

    info!(hook, elapsed_ms = started.elapsed().as_millis() as u64, "hook done");
    Ok(())
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_or_blank_hook_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        run_hook("presync", None, tmp.path()).await.unwrap();
        run_hook("postsync", Some("  "), tmp.path()).await.unwrap();
    }

    #[tokio::test]
    async fn hook_runs_in_the_given_directory() {
        let tmp = tempfile::tempdir().unwrap();
        run_hook("presync", Some("echo ran > hook.out"), tmp.path())
            .await
            .unwrap();
        assert!(tmp.path().join("hook.out").exists());
    }

    #[tokio::test]
    async fn failing_hook_reports_exit_code() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_hook("presync", Some("exit 3"), tmp.path()).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Hook { hook: "presync", ref reason, .. } if reason == "exited with code 3"
        ));
    }
}
