//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::apply::ApplyReport;
use crate::config::AppConfig;
use crate::error::ThemeError;
use crate::settings::ThemeSettings;
use crate::status::ThemeStatus;

use super::{Output, RobotFormat, TargetInfo, VersionInfo};

/// JSON output implementation for scripts and agents.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    /// Render any serializable data as JSON.
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> String {
        let rendered = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        // Our report types only hold strings, numbers and paths
        rendered.unwrap_or_else(|e| {
            serde_json::json!({ "error": true, "message": format!("serialization failed: {e}") })
                .to_string()
        })
    }

    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = self.render(data);
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }
}

impl Output for RobotOutput {
    #[instrument(skip(self))]
    fn error(&self, error: &ThemeError) {
        debug!(error = %error, "Robot: error");
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{}", self.render(&json));
    }

    #[instrument(skip_all, fields(targets = report.targets.len()))]
    fn apply_report(&self, report: &ApplyReport) {
        self.output_json(report);
    }

    #[instrument(skip_all)]
    fn status_report(&self, path: &Path, status: &ThemeStatus, settings: &ThemeSettings) {
        self.output_json(&serde_json::json!({
            "status_file": path,
            "status": status,
            "settings": settings,
        }));
    }

    #[instrument(skip_all, fields(count = targets.len()))]
    fn target_list(&self, targets: &[TargetInfo]) {
        self.output_json(targets);
    }

    #[instrument(skip_all)]
    fn config_dump(&self, path: &Path, from_file: bool, config: &AppConfig) {
        self.output_json(&serde_json::json!({
            "path": path,
            "from_file": from_file,
            "config": config,
        }));
    }

    fn config_path(&self, path: &Path, from_file: bool) {
        self.output_json(&serde_json::json!({ "path": path, "exists": from_file }));
    }

    fn config_written(&self, path: &Path) {
        self.output_json(&serde_json::json!({ "written": path, "ok": true }));
    }

    fn version_info(&self, info: &VersionInfo) {
        self.output_json(info);
    }
}
