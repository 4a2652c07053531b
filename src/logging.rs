//! Log setup.
//!
//! Logs always go to stderr so stdout stays reserved for the report. The
//! level comes from `-v`/`-q` unless `RUST_LOG` is set.

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// One JSON object per line (robot mode).
    Json,
    /// Colored multi-field lines for an interactive terminal.
    Pretty,
    /// Plain compact lines when stderr is piped.
    Plain,
}

impl LogStyle {
    pub const fn select(robot_mode: bool, stderr_is_tty: bool) -> Self {
        match (robot_mode, stderr_is_tty) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) => Self::Plain,
        }
    }
}

/// Filter directive for a verbosity level.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "themesync=error",
        (false, 0) => "themesync=info",
        (false, 1) => "themesync=debug",
        (false, _) => "themesync=trace",
    }
}

/// Install the global subscriber. Later calls are no-ops.
///
/// | Mode  | stderr | Lines          |
/// |-------|--------|----------------|
/// | Robot | any    | JSON           |
/// | Human | TTY    | pretty, colored|
/// | Human | piped  | compact, plain |
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));
    let style = LogStyle::select(robot_mode, io::stderr().is_terminal());

    let base = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_writer(io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    let _ = match style {
        LogStyle::Json => registry.with(base.json().with_target(true)).try_init(),
        LogStyle::Pretty => registry.with(base.with_target(false)).try_init(),
        LogStyle::Plain => registry
            .with(base.with_ansi(false).with_target(false).compact())
            .try_init(),
    };
}
