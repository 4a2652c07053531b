//! The apply run: status -> settings -> targets -> reload.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::LoadedConfig;
use crate::error::{Result, ThemeError};
use crate::patch::{ResolvedTarget, TargetOutcome, TargetReport, patch_target};
use crate::reload::{ReloadHandle, spawn_reload};
use crate::settings::ThemeSettings;
use crate::status::{ThemeStatus, read_status};

/// Options for one apply run.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Overrides the configured status file.
    pub status_path: Option<PathBuf>,
    pub dry_run: bool,
    pub no_reload: bool,
    /// Restrict to these target names (empty = all enabled targets).
    pub only: Vec<String>,
}

/// Whether the reload command was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadState {
    Spawned,
    Disabled,
    SkippedDryRun,
}

/// Counts per target outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    pub total: usize,
    /// Written, or would be written in a dry run.
    pub updated: usize,
    /// Created from a template, or would be.
    pub created: usize,
    pub unchanged: usize,
    /// Missing files.
    pub skipped: usize,
    pub failed: usize,
}

impl ApplySummary {
    pub fn from_reports(reports: &[TargetReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            ..Self::default()
        };
        for report in reports {
            match report.outcome {
                TargetOutcome::Updated | TargetOutcome::WouldUpdate => summary.updated += 1,
                TargetOutcome::Created | TargetOutcome::WouldCreate => summary.created += 1,
                TargetOutcome::Unchanged => summary.unchanged += 1,
                TargetOutcome::Missing => summary.skipped += 1,
                TargetOutcome::Failed => summary.failed += 1,
            }
        }
        summary
    }

    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Everything an apply run did.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub applied_at: DateTime<Utc>,
    pub dry_run: bool,
    pub status_file: PathBuf,
    pub status: ThemeStatus,
    pub settings: ThemeSettings,
    pub targets: Vec<TargetReport>,
    pub summary: ApplySummary,
    pub reload: ReloadState,
}

/// Resolve and compile the targets selected for a run.
pub fn select_targets(loaded: &LoadedConfig, only: &[String]) -> Result<Vec<ResolvedTarget>> {
    let known = loaded.config.target_names();
    if let Some(name) = only.iter().find(|n| !known.contains(n)) {
        return Err(ThemeError::UnknownTarget {
            name: name.clone(),
            known,
        });
    }

    let resolver = loaded.resolver()?;
    loaded
        .config
        .targets
        .iter()
        .filter(|t| {
            if only.is_empty() {
                t.enabled
            } else {
                only.contains(&t.name)
            }
        })
        .map(|t| ResolvedTarget::resolve(t, &resolver))
        .collect()
}

/// Read the status file named by the options or the config.
pub fn load_status(loaded: &LoadedConfig, status_path: Option<&PathBuf>) -> Result<(PathBuf, ThemeStatus)> {
    let path = match status_path {
        Some(path) => path.clone(),
        None => loaded.status_path()?,
    };
    let status = read_status(&path)?;
    Ok((path, status))
}

/// Run the whole pipeline.
///
/// Only a missing status file or a bad target selection fail the run; target
/// problems are recorded in the report. When a reload is spawned its handle
/// is returned so the caller can give it time to start before exiting. Must
/// be called within a tokio runtime when reloading is enabled.
pub fn run_apply(
    loaded: &LoadedConfig,
    options: &ApplyOptions,
) -> Result<(ApplyReport, Option<ReloadHandle>)> {
    let (status_file, status) = load_status(loaded, options.status_path.as_ref())?;
    apply_status(loaded, options, status_file, status)
}

/// Run the pipeline for an already known status.
///
/// `status_file` is only recorded in the report.
#[instrument(skip_all, fields(dry_run = options.dry_run, status_file = %status_file.display()))]
pub fn apply_status(
    loaded: &LoadedConfig,
    options: &ApplyOptions,
    status_file: PathBuf,
    status: ThemeStatus,
) -> Result<(ApplyReport, Option<ReloadHandle>)> {
    let settings = ThemeSettings::derive(&status, &loaded.config.derive);
    let targets = select_targets(loaded, &options.only)?;

    info!(
        mode = %status.mode,
        transparency = %status.transparency,
        targets = targets.len(),
        "Applying theme settings"
    );

    let reports: Vec<TargetReport> = targets
        .iter()
        .map(|target| patch_target(target, &settings, options.dry_run))
        .collect();
    let summary = ApplySummary::from_reports(&reports);
    if !summary.is_success() {
        warn!(failed = summary.failed, "Some targets failed to update");
    }

    let (reload, handle) = if options.dry_run {
        (ReloadState::SkippedDryRun, None)
    } else if options.no_reload {
        (ReloadState::Disabled, None)
    } else {
        match spawn_reload(&loaded.config.reload) {
            Some(handle) => (ReloadState::Spawned, Some(handle)),
            None => (ReloadState::Disabled, None),
        }
    };

    info!(
        updated = summary.updated,
        created = summary.created,
        unchanged = summary.unchanged,
        skipped = summary.skipped,
        failed = summary.failed,
        "Apply finished"
    );

    let report = ApplyReport {
        applied_at: Utc::now(),
        dry_run: options.dry_run,
        status_file,
        status,
        settings,
        targets: reports,
        summary,
        reload,
    };
    Ok((report, handle))
}
