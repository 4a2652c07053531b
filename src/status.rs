//! Status file parsing.
//!
//! The status file is a short line-oriented text file the desktop shell
//! rewrites whenever a theme toggle changes:
//!
//! ```text
//! dark
//! transparent
//! scheme-tonal-spot
//! catppuccin
//! border
//! normal
//! intense
//! ```
//!
//! | Line | Field             | Values                     |
//! |------|-------------------|----------------------------|
//! | 1    | color mode        | `dark`, `light`            |
//! | 2    | transparency      | `transparent`, `opaque`    |
//! | 3    | color scheme      | e.g. `scheme-tonal-spot`   |
//! | 4    | wallpaper style   | e.g. `catppuccin`          |
//! | 5    | borders           | `border`, `noborder`       |
//! | 6    | vibrancy          | `normal`, `vibrant`        |
//! | 7    | transparency mode | `normal`, `intense`        |
//!
//! Parsing is lenient: missing lines take defaults silently, unrecognized
//! values take defaults and are reported as warnings.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{Result, ResultExt, ThemeError};

/// Color scheme used when line 3 is absent.
pub const DEFAULT_SCHEME: &str = "scheme-tonal-spot";

/// Wallpaper style used when line 4 is absent.
pub const DEFAULT_WALLPAPER_STYLE: &str = "none";

/// Implements `as_str`, `FromStr` and `Display` for a status keyword enum.
macro_rules! keyword_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $word:literal),+ $(,)? }) => {
        impl $ty {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $word,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($word => Ok(Self::$variant),)+
                    other => Err(format!(concat!("unknown ", $what, " '{}'"), other)),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Light or dark color mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Dark,
    Light,
}

keyword_enum!(ColorMode, "color mode", { Dark => "dark", Light => "light" });

/// Whether panels and windows should be see-through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transparency {
    Transparent,
    #[default]
    Opaque,
}

keyword_enum!(Transparency, "transparency", {
    Transparent => "transparent",
    Opaque => "opaque",
});

impl Transparency {
    pub const fn is_transparent(self) -> bool {
        matches!(self, Self::Transparent)
    }
}

/// Window and widget borders on or off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Border {
    #[default]
    Border,
    #[value(name = "noborder")]
    NoBorder,
}

keyword_enum!(Border, "border setting", { Border => "border", NoBorder => "noborder" });

/// Saturated ("vibrant") or regular widget colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Vibrancy {
    #[default]
    Normal,
    Vibrant,
}

keyword_enum!(Vibrancy, "vibrancy", { Normal => "normal", Vibrant => "vibrant" });

/// Strength of the glass effect while transparent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransparencyMode {
    #[default]
    Normal,
    Intense,
}

keyword_enum!(TransparencyMode, "transparency mode", {
    Normal => "normal",
    Intense => "intense",
});

/// Parsed contents of the status file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeStatus {
    pub mode: ColorMode,
    pub transparency: Transparency,
    /// Color scheme name (e.g. "scheme-tonal-spot").
    pub scheme: String,
    /// Wallpaper recolor style. Carried through, not used for patching.
    pub wallpaper_style: String,
    pub border: Border,
    pub vibrancy: Vibrancy,
    pub transparency_mode: TransparencyMode,
    /// Problems found while parsing; the affected fields hold defaults.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Default for ThemeStatus {
    fn default() -> Self {
        Self {
            mode: ColorMode::default(),
            transparency: Transparency::default(),
            scheme: DEFAULT_SCHEME.to_string(),
            wallpaper_style: DEFAULT_WALLPAPER_STYLE.to_string(),
            border: Border::default(),
            vibrancy: Vibrancy::default(),
            transparency_mode: TransparencyMode::default(),
            warnings: Vec::new(),
        }
    }
}

/// Explicit field values that replace what the status file says.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusOverrides {
    pub mode: Option<ColorMode>,
    pub transparency: Option<Transparency>,
    pub scheme: Option<String>,
    pub wallpaper_style: Option<String>,
    pub border: Option<Border>,
    pub vibrancy: Option<Vibrancy>,
    pub transparency_mode: Option<TransparencyMode>,
}

impl StatusOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ThemeStatus {
    /// Parse status text. Never fails; see the module docs.
    pub fn parse(text: &str) -> Self {
        let mut status = Self::default();
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let line = |n: usize| lines.get(n - 1).copied().filter(|l| !l.is_empty());

        match line(1) {
            Some(value) => status.mode = status.keyword(1, value, status.mode),
            None => status.warn(format!("line 1: missing color mode, using {}", status.mode)),
        }
        if let Some(value) = line(2) {
            status.transparency = status.keyword(2, value, status.transparency);
        }
        if let Some(value) = line(3) {
            status.scheme = status.name(3, value, DEFAULT_SCHEME);
        }
        if let Some(value) = line(4) {
            status.wallpaper_style = status.name(4, value, DEFAULT_WALLPAPER_STYLE);
        }
        if let Some(value) = line(5) {
            status.border = status.keyword(5, value, status.border);
        }
        if let Some(value) = line(6) {
            status.vibrancy = status.keyword(6, value, status.vibrancy);
        }
        if let Some(value) = line(7) {
            status.transparency_mode = status.keyword(7, value, status.transparency_mode);
        }

        if lines.len() < 7 {
            debug!(lines = lines.len(), "Short status file, remaining fields defaulted");
        }
        status
    }

    fn keyword<T>(&mut self, line: usize, value: &str, fallback: T) -> T
    where
        T: FromStr<Err = String> + fmt::Display,
    {
        value.parse().unwrap_or_else(|e| {
            self.warn(format!("line {line}: {e}, using {fallback}"));
            fallback
        })
    }

    fn name(&mut self, line: usize, value: &str, fallback: &str) -> String {
        if is_name(value) {
            value.to_ascii_lowercase()
        } else {
            self.warn(format!("line {line}: invalid name '{value}', using {fallback}"));
            fallback.to_string()
        }
    }

    /// Apply explicit overrides on top of the parsed status.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &StatusOverrides) -> Self {
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if let Some(transparency) = overrides.transparency {
            self.transparency = transparency;
        }
        if let Some(scheme) = &overrides.scheme {
            self.scheme = scheme.trim().to_ascii_lowercase();
        }
        if let Some(style) = &overrides.wallpaper_style {
            self.wallpaper_style = style.trim().to_ascii_lowercase();
        }
        if let Some(border) = overrides.border {
            self.border = border;
        }
        if let Some(vibrancy) = overrides.vibrancy {
            self.vibrancy = vibrancy;
        }
        if let Some(mode) = overrides.transparency_mode {
            self.transparency_mode = mode;
        }
        self
    }

    /// Render the status back into its seven-line file form.
    pub fn to_file_contents(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
            self.mode,
            self.transparency,
            self.scheme,
            self.wallpaper_style,
            self.border,
            self.vibrancy,
            self.transparency_mode,
        )
    }

    fn warn(&mut self, message: String) {
        warn!(%message, "Status file problem");
        self.warnings.push(message);
    }
}

/// Scheme and style names: ASCII letters, digits, `-` and `_`.
pub fn is_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Read and parse the status file.
///
/// A missing file is an error: there is nothing to derive settings from.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_status(path: &Path) -> Result<ThemeStatus> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ThemeError::StatusNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read status file {}", path.display()));
        }
    };

    let status = ThemeStatus::parse(&text);
    debug!(
        mode = %status.mode,
        transparency = %status.transparency,
        scheme = %status.scheme,
        border = %status.border,
        vibrancy = %status.vibrancy,
        transparency_mode = %status.transparency_mode,
        "Read status file"
    );
    Ok(status)
}

/// Write the status file, creating parent directories as needed.
#[instrument(skip(status), fields(path = %path.display()))]
pub fn write_status(path: &Path, status: &ThemeStatus) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create status directory {}", parent.display()))?;
    }
    std::fs::write(path, status.to_file_contents())
        .with_context(|| format!("Failed to write status file {}", path.display()))?;
    debug!("Wrote status file");
    Ok(())
}
