//! Human-friendly output implementation using console styling.

use std::path::Path;

use console::Style;
use tracing::{debug, instrument};

use crate::apply::{ApplyReport, ReloadState};
use crate::config::{AppConfig, ConfigFormat, render_config};
use crate::error::ThemeError;
use crate::patch::{EditOutcome, TargetOutcome, TargetReport};
use crate::settings::{ThemeSettings, format_float};
use crate::status::ThemeStatus;

use super::{Output, TargetInfo, VersionInfo};

/// Colors and styles for human-mode output.
struct Palette {
    accent: Style,
    success: Style,
    error: Style,
    warning: Style,
    muted: Style,
    label: Style,
    value: Style,
}

impl Palette {
    fn new(color: bool) -> Self {
        let style = || Style::new().force_styling(color);
        Self {
            accent: style().cyan().bold(),
            success: style().green().bold(),
            error: style().red().bold(),
            warning: style().yellow(),
            muted: style().dim(),
            label: style().bold(),
            value: style().white(),
        }
    }
}

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    palette: Palette,
    quiet: bool,
}

impl HumanOutput {
    #[instrument]
    pub fn new(color: bool, quiet: bool) -> Self {
        debug!("Creating HumanOutput");
        Self {
            palette: Palette::new(color),
            quiet,
        }
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {message}", self.palette.success.apply_to("[OK]"));
        }
    }

    fn outcome_tag(&self, outcome: TargetOutcome) -> String {
        let p = &self.palette;
        let (text, style) = match outcome {
            TargetOutcome::Updated => ("updated", &p.success),
            TargetOutcome::WouldUpdate => ("would update", &p.accent),
            TargetOutcome::Created => ("created", &p.success),
            TargetOutcome::WouldCreate => ("would create", &p.accent),
            TargetOutcome::Unchanged => ("unchanged", &p.muted),
            TargetOutcome::Missing => ("missing", &p.warning),
            TargetOutcome::Failed => ("failed", &p.error),
        };
        style.apply_to(format!("{text:<12}")).to_string()
    }

    fn settings_line(&self, settings: &ThemeSettings) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" };
        format!(
            "window {} | terminal {} | blur {} ({}x{}) | border {} | vibrant {} | profile {}",
            format_float(settings.window_opacity),
            format_float(settings.terminal_opacity),
            on_off(settings.blur),
            settings.blur_size,
            settings.blur_passes,
            settings.border_size,
            on_off(settings.vibrant),
            settings.trans_profile,
        )
    }

    fn target_block(&self, target: &TargetReport, dry_run: bool) -> Vec<String> {
        let p = &self.palette;
        let mut lines = vec![format!(
            "  {:<12} {} {}",
            target.name,
            self.outcome_tag(target.outcome),
            p.muted.apply_to(target.path.display())
        )];

        if let Some(error) = &target.error {
            lines.push(format!("      {}", p.error.apply_to(error)));
        }
        for edit in &target.edits {
            match edit.outcome {
                EditOutcome::NoMatch | EditOutcome::OutOfRange => lines.push(format!(
                    "      {} {}",
                    p.warning.apply_to(format!("edit {}: {:?}", edit.index + 1, edit.outcome)),
                    p.muted.apply_to(&edit.locator)
                )),
                EditOutcome::Applied if dry_run => lines.push(format!(
                    "      {} -> {}",
                    edit.before.as_deref().unwrap_or(""),
                    p.value.apply_to(&edit.after)
                )),
                _ => {}
            }
        }
        lines
    }
}

impl Output for HumanOutput {
    #[instrument(skip(self))]
    fn error(&self, error: &ThemeError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!("{} {error}", self.palette.error.apply_to("[ERR]"));
        if let ThemeError::UnknownTarget { known, .. } = error {
            eprintln!("  {} {}", self.palette.label.apply_to("Targets:"), known.join(", "));
        }
        if let Some(suggestion) = error.suggestion() {
            eprintln!("  {} {suggestion}", self.palette.warning.apply_to("Hint:"));
        }
    }

    #[instrument(skip_all, fields(targets = report.targets.len()))]
    fn apply_report(&self, report: &ApplyReport) {
        let p = &self.palette;
        let summary = &report.summary;
        if self.quiet && summary.is_success() {
            return;
        }

        if report.dry_run {
            println!("{}", p.accent.apply_to("DRY RUN: no files written"));
        }
        println!(
            "{} {} | {} ({})",
            p.label.apply_to("Theme:"),
            p.accent.apply_to(report.status.mode),
            report.status.transparency,
            report.status.scheme
        );
        println!("  {}", p.muted.apply_to(self.settings_line(&report.settings)));
        for warning in &report.status.warnings {
            println!("  {}", p.warning.apply_to(warning));
        }
        println!();

        for target in &report.targets {
            for line in self.target_block(target, report.dry_run) {
                println!("{line}");
            }
        }
        println!();

        let reload = match report.reload {
            ReloadState::Spawned => "reload requested",
            ReloadState::Disabled => "reload disabled",
            ReloadState::SkippedDryRun => "reload skipped",
        };
        let failed = if summary.failed > 0 {
            p.error.apply_to(format!("failed {}", summary.failed)).to_string()
        } else {
            format!("failed {}", summary.failed)
        };
        let (updated, created) = if report.dry_run {
            ("Would update", "would create")
        } else {
            ("Updated", "created")
        };
        println!(
            "{updated} {}, {created} {}, unchanged {}, missing {}, {failed} | {reload}",
            summary.updated,
            summary.created,
            summary.unchanged,
            summary.skipped,
        );
    }

    fn status_report(&self, path: &Path, status: &ThemeStatus, settings: &ThemeSettings) {
        let p = &self.palette;
        let row = |label: &str, value: String| {
            println!("{:>14} {}", p.label.apply_to(format!("{label}:")), value);
        };
        row("Status file", path.display().to_string());
        row("Mode", status.mode.to_string());
        row("Transparency", status.transparency.to_string());
        row("Scheme", status.scheme.clone());
        row("Wallpaper", status.wallpaper_style.clone());
        row("Borders", status.border.to_string());
        row("Vibrancy", status.vibrancy.to_string());
        row("Glass", status.transparency_mode.to_string());
        println!();
        row("Window", format_float(settings.window_opacity));
        row("Terminal", format_float(settings.terminal_opacity));
        row(
            "Blur",
            format!(
                "{} (size {}, passes {})",
                settings.blur, settings.blur_size, settings.blur_passes
            ),
        );
        row("Border size", settings.border_size.to_string());
        row("Profile", settings.trans_profile.to_string());
        row(
            "Launcher",
            format!(
                "{} / {}",
                settings.launcher_background, settings.launcher_element_background
            ),
        );
        for warning in &status.warnings {
            println!("{:>14} {}", p.warning.apply_to("Warning:"), warning);
        }
    }

    fn target_list(&self, targets: &[TargetInfo]) {
        let p = &self.palette;
        if targets.is_empty() {
            println!("{}", p.warning.apply_to("No targets configured"));
            return;
        }
        for t in targets {
            let state = match (t.enabled, t.exists, t.creatable) {
                (false, _, _) => p.muted.apply_to("disabled"),
                (true, true, _) => p.success.apply_to("present "),
                (true, false, true) => p.accent.apply_to("creates "),
                (true, false, false) => p.warning.apply_to("missing "),
            };
            println!(
                "  {:<12} {} {} edit(s)  {}",
                t.name,
                state,
                t.edit_count,
                p.muted.apply_to(t.path.display())
            );
        }
    }

    fn config_dump(&self, path: &Path, from_file: bool, config: &AppConfig) {
        let source = if from_file { "" } else { " (not present, built-in defaults)" };
        println!("{} {}{source}", self.palette.label.apply_to("Config:"), path.display());
        println!();
        match render_config(config, ConfigFormat::Toml) {
            Ok(text) => print!("{text}"),
            Err(e) => self.error(&e),
        }
    }

    fn config_path(&self, path: &Path, _from_file: bool) {
        println!("{}", path.display());
    }

    fn config_written(&self, path: &Path) {
        self.success(&format!("Wrote {}", path.display()));
    }

    fn version_info(&self, info: &VersionInfo) {
        let p = &self.palette;
        println!("{} {}", p.accent.apply_to("themesync"), info.version);
        println!(
            "git: {}{}",
            info.git_sha,
            if info.git_dirty { " (dirty)" } else { "" }
        );
        println!("built: {}", info.build_timestamp);
        println!("rustc: {}", info.rustc_version);
        println!("target: {}", info.target);
    }
}
