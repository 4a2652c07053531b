//! CLI argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::apply::ApplyOptions;
use crate::status::{
    Border, ColorMode, StatusOverrides, Transparency, TransparencyMode, Vibrancy, is_name,
};

/// themesync - propagate the desktop color mode into app configs.
///
/// Reads the color mode status file, derives opacity, blur, border and
/// launcher settings, patches them into the configured files and asks the
/// desktop shell to reload its styles. Running without a command applies.
#[derive(Parser, Debug)]
#[command(name = "themesync", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Configuration file (TOML or YAML)
    #[arg(long, short = 'c', global = true, env = "THEMESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (text for humans, json for scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "THEMESYNC_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output (`NO_COLOR` with any value but false/0/no/off)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Patch all targets from the current status file (default)
    Apply(ApplyArgs),

    /// Update the status file, then apply
    Set(SetArgs),

    /// Show the status file and the settings derived from it
    Show(ShowArgs),

    /// List configured targets
    Targets,

    /// Write a default configuration file
    Init(InitArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Args, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ApplyArgs {
    /// Status file to read instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub status: Option<PathBuf>,

    /// Show what would change without writing files or reloading
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Do not ask the desktop shell to reload
    #[arg(long)]
    pub no_reload: bool,

    /// Only patch these targets (repeatable)
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Exit with an error if any target fails
    #[arg(long)]
    pub strict: bool,
}

impl ApplyArgs {
    pub fn options(&self) -> ApplyOptions {
        ApplyOptions {
            status_path: self.status.clone(),
            dry_run: self.dry_run,
            no_reload: self.no_reload,
            only: self.only.clone(),
        }
    }
}

/// Arguments for `set`.
///
/// # Examples
///
/// ```bash
/// themesync set --mode light
/// themesync set --transparency transparent --transparency-mode intense
/// themesync set --border noborder --scheme scheme-content
/// ```
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Color mode
    #[arg(long)]
    pub mode: Option<ColorMode>,

    /// Transparency
    #[arg(long)]
    pub transparency: Option<Transparency>,

    /// Color scheme (e.g. scheme-tonal-spot)
    #[arg(long, value_parser = parse_name)]
    pub scheme: Option<String>,

    /// Wallpaper style (e.g. catppuccin)
    #[arg(long, value_parser = parse_name)]
    pub wallpaper_style: Option<String>,

    /// Window and widget borders
    #[arg(long)]
    pub border: Option<Border>,

    /// Widget color vibrancy
    #[arg(long)]
    pub vibrancy: Option<Vibrancy>,

    /// Glass strength while transparent
    #[arg(long)]
    pub transparency_mode: Option<TransparencyMode>,

    #[command(flatten)]
    pub apply: ApplyArgs,
}

impl SetArgs {
    pub fn overrides(&self) -> StatusOverrides {
        StatusOverrides {
            mode: self.mode,
            transparency: self.transparency,
            scheme: self.scheme.clone(),
            wallpaper_style: self.wallpaper_style.clone(),
            border: self.border,
            vibrancy: self.vibrancy,
            transparency_mode: self.transparency_mode,
        }
    }
}

fn parse_name(value: &str) -> Result<String, String> {
    if is_name(value) {
        Ok(value.to_ascii_lowercase())
    } else {
        Err("expected letters, digits, '-' or '_'".to_string())
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Status file to read instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub status: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Only print the configuration file path
    #[arg(long)]
    pub path: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
