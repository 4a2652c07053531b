//! Configuration schema.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! built-in setup. Sections merge field by field over the defaults; a
//! `targets` list, when present, replaces the default list entirely.
//!
//! # Example TOML
//!
//! ```toml
//! status_file = "~/.local/state/ags/user/colormode.txt"
//!
//! [derive.terminal_opacity]
//! opaque = 1.0
//! transparent = 0.85
//!
//! [reload]
//! command = ["agsv1", "-r", "handleStyles();"]
//!
//! [[targets]]
//! name = "kitty"
//! path = "~/.config/kitty/kitty.conf"
//!
//! [[targets.edits]]
//! kind = "line"
//! line = 1
//! value = "background_opacity {terminal_opacity}"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, ThemeError};
use crate::settings::{PLACEHOLDERS, template_placeholders};

use super::path::{config_home, state_home};

/// Name of the capture group whose span a pattern edit replaces.
pub const VALUE_GROUP: &str = "value";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the status file written by the desktop shell.
    pub status_file: PathBuf,
    /// Values the derived settings are chosen from.
    pub derive: DeriveConfig,
    /// Style reload command for the running desktop shell.
    pub reload: ReloadConfig,
    /// Files to patch, in order.
    pub targets: Vec<TargetConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            status_file: state_home().join("ags/user/colormode.txt"),
            derive: DeriveConfig::default(),
            reload: ReloadConfig::default(),
            targets: default_targets(),
        }
    }
}

/// A value chosen by the transparency setting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ByTransparency<T> {
    pub opaque: T,
    pub transparent: T,
}

impl<T> ByTransparency<T> {
    pub const fn new(opaque: T, transparent: T) -> Self {
        Self { opaque, transparent }
    }

    pub const fn pick(&self, transparent: bool) -> &T {
        if transparent {
            &self.transparent
        } else {
            &self.opaque
        }
    }
}

/// Values the derived settings are picked from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeriveConfig {
    /// Compositor border width with borders on (0 with them off).
    pub border_size: u32,
    pub window_opacity: ByTransparency<f64>,
    pub terminal_opacity: ByTransparency<f64>,
    pub launcher_background: ByTransparency<String>,
    pub launcher_element_background: ByTransparency<String>,
    pub blur_size: ByTransparency<u32>,
    pub blur_passes: ByTransparency<u32>,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            border_size: 2,
            window_opacity: ByTransparency::new(1.0, 0.78),
            terminal_opacity: ByTransparency::new(1.0, 0.9),
            launcher_background: ByTransparency::new(
                "var(surface)".to_string(),
                "#00000090".to_string(),
            ),
            launcher_element_background: ByTransparency::new(
                "var(surface-container-low)".to_string(),
                "#00000025".to_string(),
            ),
            blur_size: ByTransparency::new(2, 8),
            blur_passes: ByTransparency::new(1, 3),
        }
    }
}

/// External command asking the desktop shell to reload its styles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadConfig {
    pub enabled: bool,
    /// Program followed by its arguments.
    pub command: Vec<String>,
    /// How long to wait for the command before exiting (milliseconds).
    pub wait_ms: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: vec!["agsv1".into(), "-r".into(), "handleStyles();".into()],
            wait_ms: 3000,
        }
    }
}

/// A file to patch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetConfig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Alternative locations, tried in order when `path` does not exist.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<PathBuf>,
    /// Template written to `path` when no candidate file exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<String>,
    #[serde(default)]
    pub edits: Vec<EditSpec>,
}

const fn default_true() -> bool {
    true
}

/// A single substitution within a target file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditSpec {
    /// Replace the `value` capture group of a regex match with a template.
    Pattern {
        pattern: String,
        value: String,
        /// Replace every match rather than only the first.
        #[serde(default)]
        all: bool,
    },
    /// Replace a whole line (1-based) with a template.
    Line { line: usize, value: String },
}

impl EditSpec {
    pub fn pattern(pattern: &str, value: &str) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            value: value.to_string(),
            all: false,
        }
    }

    /// A pattern edit applied to every match.
    pub fn pattern_all(pattern: &str, value: &str) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            value: value.to_string(),
            all: true,
        }
    }

    pub fn line(line: usize, value: &str) -> Self {
        Self::Line {
            line,
            value: value.to_string(),
        }
    }

    /// The replacement template.
    pub fn template(&self) -> &str {
        match self {
            Self::Pattern { value, .. } | Self::Line { value, .. } => value,
        }
    }
}

impl TargetConfig {
    pub fn new(name: &str, path: PathBuf, edits: Vec<EditSpec>) -> Self {
        Self {
            name: name.to_string(),
            path,
            enabled: true,
            fallbacks: Vec::new(),
            create: None,
            edits,
        }
    }

    /// Every candidate location, primary path first.
    pub fn candidates(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.path.as_path()).chain(self.fallbacks.iter().map(PathBuf::as_path))
    }
}

/// Stylesheet variables the desktop shell reads, one per line.
const STYLESHEET_TEMPLATE: &str = "$border:{scss_border};\n$transparent:{scss_transparent};\n$vibrant:{scss_vibrant};\n$transProfile:{trans_profile};\n";

/// The built-in target set: the shell's stylesheet fragment, the compositor's
/// window rules, decoration and layout, both terminals and the launcher.
///
/// Paths honour `XDG_CONFIG_HOME` and `XDG_STATE_HOME`.
pub fn default_targets() -> Vec<TargetConfig> {
    let config = config_home();
    let hypr = config.join("hypr");

    vec![
        TargetConfig {
            create: Some(STYLESHEET_TEMPLATE.to_string()),
            ..TargetConfig::new(
                "stylesheet",
                state_home().join("ags/scss/_mode.scss"),
                vec![
                    EditSpec::pattern_all(r"border:(?P<value>[^;\n]*);", "{scss_border}"),
                    EditSpec::pattern_all(r"transparent:(?P<value>[^;\n]*);", "{scss_transparent}"),
                    EditSpec::pattern_all(r"vibrant:(?P<value>[^;\n]*);", "{scss_vibrant}"),
                    EditSpec::pattern_all(r"transProfile:(?P<value>[^;\n]*);", "{trans_profile}"),
                ],
            )
        },
        TargetConfig::new(
            "window-rules",
            hypr.join("hyprland/rules/default.conf"),
            vec![EditSpec::line(
                1,
                "windowrule = opacity {window_opacity} override, class:.*",
            )],
        ),
        TargetConfig {
            fallbacks: vec![
                hypr.join("hyprland/settings/decoration.conf"),
                hypr.join("decoration.conf"),
            ],
            ..TargetConfig::new(
                "decoration",
                hypr.join("hyprland/decoration.conf"),
                vec![
                    EditSpec::pattern_all(r"\bblur\s*=\s*(?P<value>\w+)", "{blur}"),
                    EditSpec::pattern_all(r"\bblur_size\s*=\s*(?P<value>\d+)", "{blur_size}"),
                    EditSpec::pattern_all(r"\bblur_passes\s*=\s*(?P<value>\d+)", "{blur_passes}"),
                ],
            )
        },
        TargetConfig::new(
            "foot",
            config.join("foot/colors.ini"),
            vec![EditSpec::line(2, "alpha={terminal_opacity}")],
        ),
        TargetConfig::new(
            "kitty",
            config.join("kitty/kitty.conf"),
            vec![EditSpec::line(1, "background_opacity {terminal_opacity}")],
        ),
        TargetConfig::new(
            "launcher",
            config.join("rofi/config.rasi"),
            vec![
                EditSpec::pattern_all(r"\bwbg:(?P<value>[^;\n]*);", "{launcher_background}"),
                EditSpec::pattern_all(
                    r"\belement-bg:(?P<value>[^;\n]*);",
                    "{launcher_element_background}",
                ),
            ],
        ),
        TargetConfig::new(
            "layout",
            hypr.join("hyprland/layouts/default.conf"),
            vec![EditSpec::line(7, "    border_size = {border_size}")],
        ),
    ]
}

impl AppConfig {
    /// Target names in config order.
    pub fn target_names(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.name.clone()).collect()
    }

    /// Validate the configuration.
    ///
    /// Checks that:
    /// - Opacity values are within 0-1
    /// - The reload command is non-empty when reloading is enabled
    /// - Target names are non-empty and unique
    /// - Every pattern compiles and has a `value` group
    /// - Line numbers are 1-based and line templates are single-line
    /// - Templates only use known placeholders
    pub fn validate(&self) -> Result<()> {
        trace!(targets = self.targets.len(), "Validating config");

        let d = &self.derive;
        for (field, value) in [
            ("derive.window_opacity.opaque", d.window_opacity.opaque),
            ("derive.window_opacity.transparent", d.window_opacity.transparent),
            ("derive.terminal_opacity.opaque", d.terminal_opacity.opaque),
            ("derive.terminal_opacity.transparent", d.terminal_opacity.transparent),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ThemeError::ConfigInvalid(format!(
                    "{field} must be between 0 and 1, got {value}"
                )));
            }
        }

        if self.reload.enabled && self.reload.command.first().is_none_or(String::is_empty) {
            return Err(ThemeError::ConfigInvalid(
                "reload.command must name a program when reload is enabled".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.name.trim().is_empty() {
                return Err(ThemeError::ConfigInvalid(format!(
                    "target with path '{}' has an empty name",
                    target.path.display()
                )));
            }
            if !seen.insert(target.name.as_str()) {
                return Err(ThemeError::ConfigInvalid(format!(
                    "duplicate target name '{}'",
                    target.name
                )));
            }
            for (index, edit) in target.edits.iter().enumerate() {
                validate_edit(&target.name, index, edit)?;
            }
            if let Some(template) = &target.create {
                check_placeholders(template).map_err(|unknown| {
                    ThemeError::ConfigInvalid(format!(
                        "target '{}' create template: {unknown}",
                        target.name
                    ))
                })?;
            }
        }

        debug!(targets = self.targets.len(), "Config validated");
        Ok(())
    }
}

fn validate_edit(target: &str, index: usize, edit: &EditSpec) -> Result<()> {
    match edit {
        EditSpec::Pattern { pattern, .. } => {
            let regex = Regex::new(pattern).map_err(|e| ThemeError::InvalidPattern {
                target: target.to_string(),
                index,
                reason: e.to_string(),
            })?;
            if !regex.capture_names().any(|n| n == Some(VALUE_GROUP)) {
                return Err(ThemeError::InvalidPattern {
                    target: target.to_string(),
                    index,
                    reason: format!("missing (?P<{VALUE_GROUP}>...) group"),
                });
            }
        }
        EditSpec::Line { line, value } => {
            if *line == 0 {
                return Err(ThemeError::ConfigInvalid(format!(
                    "target '{target}' edit {index}: line numbers start at 1"
                )));
            }
            if value.contains('\n') {
                return Err(ThemeError::ConfigInvalid(format!(
                    "target '{target}' edit {index}: line template spans several lines"
                )));
            }
        }
    }

    check_placeholders(edit.template()).map_err(|unknown| {
        ThemeError::ConfigInvalid(format!("target '{target}' edit {index}: {unknown}"))
    })
}

fn check_placeholders(template: &str) -> std::result::Result<(), String> {
    match template_placeholders(template).find(|p| !PLACEHOLDERS.contains(p)) {
        Some(unknown) => Err(format!(
            "unknown placeholder {{{unknown}}} (known: {})",
            PLACEHOLDERS.join(", ")
        )),
        None => Ok(()),
    }
}
