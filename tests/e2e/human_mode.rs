//! Human-mode end-to-end tests.

use crate::common::cli::CliRunner;
use crate::common::fixtures::TestDesktop;
use crate::common::{assert_no_ansi, init_test_logging};

fn cli(desktop: &TestDesktop) -> CliRunner {
    CliRunner::new().with_config(&desktop.config_path)
}

#[test]
fn test_apply_prints_theme_targets_and_summary() {
    init_test_logging();
    let desktop = TestDesktop::new("light\ntransparent\n");
    let result = cli(&desktop).run(&["apply"]);

    result
        .assert_success()
        .assert_stdout_contains("Theme: light | transparent (scheme-tonal-spot)")
        .assert_stdout_contains(
            "window 0.78 | terminal 0.9 | blur on (8x3) | border 2 | vibrant off | profile Normal",
        )
        .assert_stdout_contains("updated")
        .assert_stdout_contains(
            "Updated 6, created 0, unchanged 1, missing 0, failed 0 | reload disabled",
        )
        .assert_stdout_not_contains("DRY RUN");
    assert_no_ansi(&result.stdout);
    assert!(
        serde_json::from_str::<serde_json::Value>(result.stdout.trim()).is_err(),
        "Human mode output should not be JSON"
    );
}

#[test]
fn test_dry_run_shows_before_and_after() {
    let desktop = TestDesktop::new("light\ntransparent\n");
    cli(&desktop)
        .run(&["apply", "-n"])
        .assert_success()
        .assert_stdout_contains("DRY RUN: no files written")
        .assert_stdout_contains("would update")
        .assert_stdout_contains("alpha=1 -> alpha=0.9")
        .assert_stdout_contains("false -> true")
        .assert_stdout_contains("Would update 6, would create 0");
}

#[test]
fn test_dry_run_announces_stylesheet_creation() {
    let desktop = TestDesktop::new("light\ntransparent\n");
    std::fs::remove_file(desktop.target_path("stylesheet")).unwrap();

    cli(&desktop)
        .run(&["apply", "--dry-run"])
        .assert_success()
        .assert_stdout_contains("would create")
        .assert_stdout_contains("Would update 5, would create 1");
    assert!(!desktop.target_path("stylesheet").exists());
}

#[test]
fn test_status_warnings_are_shown() {
    let desktop = TestDesktop::new("dusk\n");
    cli(&desktop)
        .run(&["apply", "--dry-run"])
        .assert_success()
        .assert_stdout_contains("line 1:")
        .assert_stdout_contains("Theme: dark | opaque");
}

#[test]
fn test_missing_targets_are_reported_not_fatal() {
    let desktop = TestDesktop::new("light\ntransparent\n");
    std::fs::remove_file(desktop.target_path("launcher")).unwrap();

    cli(&desktop)
        .run(&["apply"])
        .assert_success()
        .assert_stdout_contains("missing")
        .assert_stdout_contains("Updated 5, created 0, unchanged 1, missing 1, failed 0");
}

#[test]
fn test_quiet_apply_prints_nothing_on_success() {
    let desktop = TestDesktop::new("light\ntransparent\n");
    cli(&desktop).run(&["-q", "apply"]).assert_success().assert_stdout_is_empty();
    assert_eq!(desktop.read("foot"), "[colors]\nalpha=0.9\nbackground=1e1e2e\n");
}

#[test]
fn test_show_lists_status_and_settings() {
    let desktop = TestDesktop::new("light\ntransparent\nscheme-rainbow\nnord\nnoborder\nvibrant\nintense\n");
    cli(&desktop)
        .run(&["show"])
        .assert_success()
        .assert_stdout_contains("Mode: light")
        .assert_stdout_contains("Transparency: transparent")
        .assert_stdout_contains("Scheme: scheme-rainbow")
        .assert_stdout_contains("Wallpaper: nord")
        .assert_stdout_contains("Borders: noborder")
        .assert_stdout_contains("Glass: intense")
        .assert_stdout_contains("Blur: true (size 8, passes 3)")
        .assert_stdout_contains("Border size: 0")
        .assert_stdout_contains("Profile: Intense")
        .assert_stdout_contains("Launcher: #00000090 / #00000025");
}

#[test]
fn test_targets_marks_present_missing_and_disabled() {
    let desktop = TestDesktop::opaque_dark();
    std::fs::remove_file(desktop.target_path("foot")).unwrap();
    std::fs::remove_file(desktop.target_path("stylesheet")).unwrap();
    let mut config = TestDesktop::config();
    config.targets[1].enabled = false;
    desktop.write_config(&config);

    let result = cli(&desktop).run(&["targets"]);
    result.assert_success();

    let line = |name: &str| {
        result
            .stdout
            .lines()
            .find(|l| l.trim_start().starts_with(name))
            .unwrap_or_else(|| panic!("no line for {name} in:\n{}", result.stdout))
            .to_string()
    };
    assert!(line("window-rules").contains("disabled"));
    assert!(line("stylesheet").contains("creates"));
    assert!(line("foot").contains("missing"));
    assert!(line("kitty").contains("present"));
    assert!(line("decoration").contains("3 edit(s)"));
}

#[test]
fn test_errors_carry_a_hint() {
    let desktop = TestDesktop::opaque_dark();
    std::fs::remove_file(&desktop.status_path).unwrap();

    cli(&desktop)
        .run(&["show"])
        .assert_exit_code(1)
        .assert_stderr_contains("[ERR] Status file not found")
        .assert_stderr_contains("Hint: Run: themesync set");
}

#[test]
fn test_unknown_target_lists_known_ones() {
    let desktop = TestDesktop::opaque_dark();
    cli(&desktop)
        .run(&["apply", "--only", "alacritty"])
        .assert_exit_code(1)
        .assert_stderr_contains("Unknown target 'alacritty'")
        .assert_stderr_contains(
            "Targets: stylesheet, window-rules, decoration, foot, kitty, launcher, layout",
        );
}

#[test]
fn test_human_version_is_plain_text() {
    let result = CliRunner::new().run(&["version"]);
    result
        .assert_success()
        .assert_stdout_contains("themesync")
        .assert_stdout_contains(env!("CARGO_PKG_VERSION"))
        .assert_stdout_contains("rustc:");
}
