//! Derived settings and template rendering.
//!
//! The status file holds keywords ("transparent", "noborder", ...); the target
//! files need concrete values (an opacity, a blur pass count, a launcher
//! color). [`ThemeSettings`] holds those values and renders them into edit
//! templates through `{placeholder}` tokens.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

use crate::config::DeriveConfig;
use crate::status::{
    Border, ColorMode, ThemeStatus, Transparency, TransparencyMode, Vibrancy,
};

/// Placeholder names accepted in edit templates.
pub const PLACEHOLDERS: &[&str] = &[
    "mode",
    "dark",
    "transparency",
    "transparent",
    "scheme",
    "wallpaper_style",
    "scss_border",
    "scss_transparent",
    "scss_vibrant",
    "trans_profile",
    "window_opacity",
    "terminal_opacity",
    "launcher_background",
    "launcher_element_background",
    "border_size",
    "blur",
    "blur_size",
    "blur_passes",
];

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("invalid placeholder regex"));

/// Names of all `{name}` tokens in a template, known or not.
pub fn template_placeholders(template: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
}

/// Concrete values derived from the status file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeSettings {
    pub mode: ColorMode,
    pub transparency: Transparency,
    pub scheme: String,
    pub wallpaper_style: String,
    pub dark: bool,
    pub transparent: bool,
    pub bordered: bool,
    pub vibrant: bool,
    /// Glass profile for the stylesheet: "none" while opaque.
    pub trans_profile: &'static str,
    pub window_opacity: f64,
    pub terminal_opacity: f64,
    pub launcher_background: String,
    pub launcher_element_background: String,
    /// Compositor border width; 0 without borders.
    pub border_size: u32,
    pub blur: bool,
    pub blur_size: u32,
    pub blur_passes: u32,
}

impl ThemeSettings {
    pub fn derive(status: &ThemeStatus, config: &DeriveConfig) -> Self {
        let transparent = status.transparency.is_transparent();
        let bordered = status.border == Border::Border;

        let trans_profile = match (transparent, status.transparency_mode) {
            (false, _) => "none",
            (true, TransparencyMode::Normal) => "Normal",
            (true, TransparencyMode::Intense) => "Intense",
        };

        let settings = Self {
            mode: status.mode,
            transparency: status.transparency,
            scheme: status.scheme.clone(),
            wallpaper_style: status.wallpaper_style.clone(),
            dark: status.mode == ColorMode::Dark,
            transparent,
            bordered,
            vibrant: status.vibrancy == Vibrancy::Vibrant,
            trans_profile,
            window_opacity: *config.window_opacity.pick(transparent),
            terminal_opacity: *config.terminal_opacity.pick(transparent),
            launcher_background: config.launcher_background.pick(transparent).clone(),
            launcher_element_background: config
                .launcher_element_background
                .pick(transparent)
                .clone(),
            border_size: if bordered { config.border_size } else { 0 },
            blur: transparent,
            blur_size: *config.blur_size.pick(transparent),
            blur_passes: *config.blur_passes.pick(transparent),
        };

        debug!(
            dark = settings.dark,
            transparent = settings.transparent,
            bordered = settings.bordered,
            vibrant = settings.vibrant,
            trans_profile = settings.trans_profile,
            window_opacity = settings.window_opacity,
            "Derived settings"
        );
        settings
    }

    /// Value of a placeholder, or `None` for an unknown name.
    pub fn placeholder(&self, name: &str) -> Option<String> {
        let value = match name {
            "mode" => self.mode.to_string(),
            "dark" => self.dark.to_string(),
            "transparency" => self.transparency.to_string(),
            "transparent" => self.transparent.to_string(),
            "scheme" => self.scheme.clone(),
            "wallpaper_style" => self.wallpaper_style.clone(),
            "scss_border" => scss_bool(self.bordered).to_string(),
            "scss_transparent" => scss_bool(self.transparent).to_string(),
            "scss_vibrant" => scss_bool(self.vibrant).to_string(),
            "trans_profile" => self.trans_profile.to_string(),
            "window_opacity" => format_float(self.window_opacity),
            "terminal_opacity" => format_float(self.terminal_opacity),
            "launcher_background" => self.launcher_background.clone(),
            "launcher_element_background" => self.launcher_element_background.clone(),
            "border_size" => self.border_size.to_string(),
            "blur" => self.blur.to_string(),
            "blur_size" => self.blur_size.to_string(),
            "blur_passes" => self.blur_passes.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Substitute `{name}` tokens. Unknown tokens are left verbatim.
    pub fn render(&self, template: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(template, |caps: &Captures<'_>| {
                self.placeholder(&caps[1])
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// The stylesheet compiler reads these as identifiers.
const fn scss_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Format with at most four decimals, trailing zeros trimmed.
pub fn format_float(value: f64) -> String {
    let fixed = format!("{value:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
