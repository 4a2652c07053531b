//! Output mode abstraction for robot and human output.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::apply::ApplyReport;
use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::ThemeError;
use crate::settings::ThemeSettings;
use crate::status::ThemeStatus;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// A configured target as listed by `themesync targets`.
#[derive(Debug, Clone, Serialize)]
pub struct TargetInfo {
    pub name: String,
    /// First existing candidate, else the primary path.
    pub path: PathBuf,
    pub enabled: bool,
    /// Whether the file is created from a template when missing.
    pub creatable: bool,
    pub exists: bool,
    pub edit_count: usize,
}

/// Build metadata for `themesync version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
    pub target: &'static str,
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for scripts and agents.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { color: bool },
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human {
                color: !cli.no_color && console::colors_enabled(),
            }
        }
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self, quiet: bool) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { color } => Box::new(HumanOutput::new(color, quiet)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    fn error(&self, error: &ThemeError);

    // Runs
    fn apply_report(&self, report: &ApplyReport);
    fn status_report(&self, path: &Path, status: &ThemeStatus, settings: &ThemeSettings);

    // Configuration
    fn target_list(&self, targets: &[TargetInfo]);
    fn config_dump(&self, path: &Path, from_file: bool, config: &AppConfig);
    fn config_path(&self, path: &Path, from_file: bool);
    fn config_written(&self, path: &Path);

    // Metadata
    fn version_info(&self, info: &VersionInfo);
}
