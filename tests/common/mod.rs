//! Common test utilities for the themesync CLI.
//!
//! - `cli`: CLI runner with output verification and fluent assertions
//! - `env`: Serialized environment variable overrides
//! - `fixtures`: A temporary desktop with status file, targets and config
#![allow(dead_code)]


use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Panic if the text carries ANSI escape sequences.
pub fn assert_no_ansi(output: &str) {
    assert!(
        !output.contains("\u{1b}["),
        "Expected no ANSI escape sequences in:\n{output}"
    );
}
