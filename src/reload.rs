//! Style reload of the running desktop shell.
//!
//! The reload command runs on a background task. Its result is logged and
//! otherwise ignored: a shell that is not running must not fail the run.

use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::ReloadConfig;

/// How the reload command ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ReloadOutcome {
    Succeeded,
    /// Exited non-zero (`None` when killed by a signal).
    ExitedWith { code: Option<i32> },
    /// Could not be started, e.g. program not installed.
    LaunchFailed { reason: String },
}

/// Handle to a spawned reload task.
#[derive(Debug)]
pub struct ReloadHandle {
    program: String,
    task: JoinHandle<ReloadOutcome>,
}

impl ReloadHandle {
    /// Program being run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Wait for the command for at most `timeout`.
    ///
    /// Returns `None` when the command is still running; it is left to finish
    /// on its own.
    pub async fn settle(self, timeout: Duration) -> Option<ReloadOutcome> {
        match tokio::time::timeout(timeout, self.task).await {
            Ok(Ok(outcome)) => Some(outcome),
            Ok(Err(e)) => {
                warn!(error = %e, "Reload task aborted");
                None
            }
            Err(_) => {
                debug!(program = %self.program, ?timeout, "Reload still running, detaching");
                None
            }
        }
    }
}

/// Spawn the reload command on the current tokio runtime.
///
/// Returns `None` when reloading is disabled or no command is configured.
#[instrument(skip_all)]
pub fn spawn_reload(config: &ReloadConfig) -> Option<ReloadHandle> {
    if !config.enabled {
        debug!("Reload disabled");
        return None;
    }
    let (program, args) = config.command.split_first()?;
    let program = program.clone();
    let args = args.to_vec();

    info!(program = %program, ?args, "Requesting style reload");
    let task = tokio::spawn(run_reload(program.clone(), args));
    Some(ReloadHandle { program, task })
}

async fn run_reload(program: String, args: Vec<String>) -> ReloadOutcome {
    let status = Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    let outcome = match status {
        Ok(status) if status.success() => ReloadOutcome::Succeeded,
        Ok(status) => ReloadOutcome::ExitedWith {
            code: status.code(),
        },
        Err(e) => ReloadOutcome::LaunchFailed {
            reason: e.to_string(),
        },
    };

    match &outcome {
        ReloadOutcome::Succeeded => debug!(program = %program, "Reload command finished"),
        ReloadOutcome::ExitedWith { code } => {
            warn!(program = %program, ?code, "Reload command exited unsuccessfully");
        }
        ReloadOutcome::LaunchFailed { reason } => {
            warn!(program = %program, %reason, "Could not launch reload command");
        }
    }
    outcome
}
