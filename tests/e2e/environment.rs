//! Environment variable behavior end-to-end tests.

use crate::common::cli::CliRunner;
use crate::common::fixtures::TestDesktop;
use crate::common::{assert_no_ansi, init_test_logging};

#[test]
fn test_format_env_sets_json_output() {
    init_test_logging();
    let desktop = TestDesktop::opaque_dark();
    let result = CliRunner::new()
        .with_config(&desktop.config_path)
        .with_env("THEMESYNC_FORMAT", "json")
        .run(&["show"]);

    result.assert_success();
    assert_eq!(result.json()["status"]["transparency"], "opaque");
}

#[test]
fn test_format_env_sets_compact_json() {
    let result = CliRunner::new()
        .with_env("THEMESYNC_FORMAT", "json-compact")
        .run(&["version"]);

    result.assert_success();
    assert!(result.json().get("version").is_some());
    assert_eq!(result.stdout.trim_end().lines().count(), 1, "Expected compact JSON single line");
}

#[test]
fn test_format_flag_overrides_env() {
    let result = CliRunner::new()
        .with_env("THEMESYNC_FORMAT", "json")
        .run(&["version", "--format=text"]);

    result.assert_success();
    assert!(
        serde_json::from_str::<serde_json::Value>(result.stdout.trim()).is_err(),
        "--format=text should override THEMESYNC_FORMAT=json"
    );
}

#[test]
fn test_config_flag_overrides_env() {
    let light = TestDesktop::new("light\nopaque\n");
    let dark = TestDesktop::opaque_dark();
    let config = light.config_path.display().to_string();

    CliRunner::new()
        .with_config(&dark.config_path)
        .run_robot(&["--config", &config, "show"])
        .assert_success()
        .assert_json_field("/status/mode", &serde_json::json!("light"));
}

#[test]
fn test_config_env_pointing_nowhere_fails() {
    let desktop = TestDesktop::opaque_dark();
    let missing = desktop.root().join("missing.toml");

    CliRunner::new()
        .with_config(&missing)
        .run(&["show"])
        .assert_exit_code(1)
        .assert_stderr_contains("Configuration file not found")
        .assert_stderr_contains("themesync init");
}

#[test]
fn test_no_color_env_disables_ansi() {
    let desktop = TestDesktop::new("light\ntransparent\n");
    let result = CliRunner::new()
        .with_config(&desktop.config_path)
        .with_env("NO_COLOR", "1")
        .run(&["apply", "--dry-run"]);

    result.assert_success();
    assert_no_ansi(&result.stdout);
    assert_no_ansi(&result.stderr);
}

#[test]
fn test_rust_log_enables_json_logs_in_robot_mode() {
    let desktop = TestDesktop::opaque_dark();
    let result = CliRunner::new()
        .with_config(&desktop.config_path)
        .with_env("RUST_LOG", "themesync=info")
        .run_robot(&["apply"]);

    result.assert_success();
    let first = result
        .stderr
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_else(|| panic!("Expected log lines on stderr"));
    let log: serde_json::Value = serde_json::from_str(first)
        .unwrap_or_else(|_| panic!("Expected JSON log line, got: {first}"));
    assert!(log.get("level").is_some());
    // stdout stays pure JSON
    assert_eq!(result.json()["summary"]["unchanged"], 7);
}

#[cfg(target_os = "linux")]
#[test]
fn test_xdg_dirs_locate_builtin_targets_without_config() {
    let desktop = TestDesktop::new("light\ntransparent\n");
    let root = desktop.root().display().to_string();
    let config_home = desktop.root().join("config").display().to_string();
    let state_home = desktop.root().join("state").display().to_string();

    // No config file under $XDG_CONFIG_HOME/themesync and no shell to reload
    let result = CliRunner::new()
        .with_env("HOME", &root)
        .with_env("PATH", &root)
        .with_env("XDG_CONFIG_HOME", &config_home)
        .with_env("XDG_STATE_HOME", &state_home)
        .run_robot(&["apply", "--strict"]);

    result
        .assert_success()
        .assert_json_field("/summary/updated", &serde_json::json!(6))
        .assert_json_field("/reload", &serde_json::json!("spawned"));
    assert_eq!(desktop.read("foot"), "[colors]\nalpha=0.9\nbackground=1e1e2e\n");
    assert_eq!(
        desktop.read("stylesheet"),
        "$border:True;\n$transparent:True;\n$vibrant:False;\n$transProfile:Normal;\n"
    );
}
