//! themesync - propagate the desktop color mode into app configs.
//!
//! Provides both human-friendly and machine-readable (robot mode) output.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};
use std::time::Duration;

use clap::Parser;
use tracing::debug;

use themesync::apply::{ApplyReport, apply_status, load_status, run_apply};
use themesync::cli::{self, ApplyArgs, Cli, Commands};
use themesync::config::{
    AppConfig, LoadedConfig, default_config_path, load_or_default, save_config,
};
use themesync::error::{Result, ThemeError};
use themesync::logging::init_logging;
use themesync::output::{Output, OutputMode, TargetInfo, VersionInfo};
use themesync::reload::ReloadHandle;
use themesync::settings::ThemeSettings;
use themesync::status::{ThemeStatus, read_status, write_status};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> bool {
        option_env!("VERGEN_GIT_DIRTY") == Some("true")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    init_logging(cli.use_json(), cli.verbose, cli.quiet);
    let output = OutputMode::from_cli(&cli).into_output(cli.quiet);

    if let Err(e) = run(&cli, output.as_ref()).await {
        output.error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, out: &dyn Output) -> Result<()> {
    match &cli.command {
        None => cmd_apply(cli, out, &ApplyArgs::default()).await,
        Some(Commands::Apply(args)) => cmd_apply(cli, out, args).await,
        Some(Commands::Set(args)) => cmd_set(cli, out, args).await,
        Some(Commands::Show(args)) => cmd_show(cli, out, args),
        Some(Commands::Targets) => cmd_targets(cli, out),
        Some(Commands::Init(args)) => cmd_init(cli, out, args),
        Some(Commands::Config(args)) => cmd_config(cli, out, args),
        Some(Commands::Version) => {
            cmd_version(out);
            Ok(())
        }
        Some(Commands::Completions(args)) => {
            cmd_completions(args);
            Ok(())
        }
    }
}

// === Command Implementations ===

async fn cmd_apply(cli: &Cli, out: &dyn Output, args: &ApplyArgs) -> Result<()> {
    let loaded = load_or_default(cli.config.as_deref())?;
    let (report, handle) = run_apply(&loaded, &args.options())?;
    finish_apply(out, &loaded, args, &report, handle).await
}

async fn cmd_set(cli: &Cli, out: &dyn Output, args: &cli::SetArgs) -> Result<()> {
    let loaded = load_or_default(cli.config.as_deref())?;
    let path = match &args.apply.status {
        Some(path) => path.clone(),
        None => loaded.status_path()?,
    };

    let current = match read_status(&path) {
        Ok(status) => status,
        Err(ThemeError::StatusNotFound { .. }) => {
            debug!(path = %path.display(), "No status file yet, starting from defaults");
            ThemeStatus::default()
        }
        Err(e) => return Err(e),
    };
    let overrides = args.overrides();
    if overrides.is_empty() {
        debug!("Nothing to set, re-applying the current status");
    }
    let mut status = current.with_overrides(&overrides);
    status.warnings.clear();

    if args.apply.dry_run {
        debug!("Dry run, status file left untouched");
    } else {
        write_status(&path, &status)?;
    }

    let (report, handle) = apply_status(&loaded, &args.apply.options(), path, status)?;
    finish_apply(out, &loaded, &args.apply, &report, handle).await
}

/// Print the report, give the reload a moment, and apply `--strict`.
async fn finish_apply(
    out: &dyn Output,
    loaded: &LoadedConfig,
    args: &ApplyArgs,
    report: &ApplyReport,
    handle: Option<ReloadHandle>,
) -> Result<()> {
    out.apply_report(report);

    if let Some(handle) = handle {
        let wait = Duration::from_millis(loaded.config.reload.wait_ms);
        let program = handle.program().to_string();
        let outcome = handle.settle(wait).await;
        debug!(%program, ?outcome, "Reload settled");
    }

    if args.strict && !report.summary.is_success() {
        return Err(ThemeError::TargetsFailed {
            failed: report.summary.failed,
        });
    }
    Ok(())
}

fn cmd_show(cli: &Cli, out: &dyn Output, args: &cli::ShowArgs) -> Result<()> {
    let loaded = load_or_default(cli.config.as_deref())?;
    let (path, status) = load_status(&loaded, args.status.as_ref())?;
    let settings = ThemeSettings::derive(&status, &loaded.config.derive);
    out.status_report(&path, &status, &settings);
    Ok(())
}

fn cmd_targets(cli: &Cli, out: &dyn Output) -> Result<()> {
    let loaded = load_or_default(cli.config.as_deref())?;
    let resolver = loaded.resolver()?;

    let targets = loaded
        .config
        .targets
        .iter()
        .map(|t| -> Result<TargetInfo> {
            let candidates = t
                .candidates()
                .map(|p| resolver.resolve(p))
                .collect::<Result<Vec<_>>>()?;
            let found = candidates.iter().find(|p| p.is_file()).cloned();
            let primary = resolver.resolve(&t.path)?;
            Ok(TargetInfo {
                name: t.name.clone(),
                exists: found.is_some(),
                path: found.unwrap_or(primary),
                enabled: t.enabled,
                creatable: t.create.is_some(),
                edit_count: t.edits.len(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    out.target_list(&targets);
    Ok(())
}

fn cmd_init(cli: &Cli, out: &dyn Output, args: &cli::InitArgs) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    if path.exists() && !args.force {
        return Err(ThemeError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    save_config(&AppConfig::default(), &path)?;
    out.config_written(&path);
    Ok(())
}

fn cmd_config(cli: &Cli, out: &dyn Output, args: &cli::ConfigArgs) -> Result<()> {
    // `config --path` must work even when the file does not parse
    if args.path {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        out.config_path(&path, path.is_file());
        return Ok(());
    }

    let loaded = load_or_default(cli.config.as_deref())?;
    out.config_dump(&loaded.path, loaded.from_file, &loaded.config);
    Ok(())
}

fn cmd_version(out: &dyn Output) {
    out.version_info(&VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty(),
        build_timestamp: build_info::build_timestamp(),
        rustc_version: build_info::rustc_semver(),
        target: build_info::target(),
    });
}

fn cmd_completions(args: &cli::CompletionsArgs) {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "themesync", &mut io::stdout());
}
