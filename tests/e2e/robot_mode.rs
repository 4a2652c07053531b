//! Robot-mode end-to-end tests.

use serde_json::{Value, json};

use crate::common::cli::CliRunner;
use crate::common::fixtures::TestDesktop;
use crate::common::init_test_logging;

fn cli(desktop: &TestDesktop) -> CliRunner {
    CliRunner::new().with_config(&desktop.config_path)
}

#[test]
fn test_robot_apply_reports_every_target() {
    init_test_logging();
    let desktop = TestDesktop::new("light\ntransparent\n");
    let result = cli(&desktop).run_robot(&["apply"]);

    result
        .assert_success()
        .assert_json_field("/dry_run", &json!(false))
        .assert_json_field("/status/mode", &json!("light"))
        .assert_json_field("/settings/trans_profile", &json!("Normal"))
        .assert_json_field("/settings/window_opacity", &json!(0.78))
        .assert_json_field("/summary/updated", &json!(6))
        .assert_json_field("/summary/unchanged", &json!(1))
        .assert_json_field("/reload", &json!("disabled"))
        .assert_json_array_len("/targets", 7);

    let json = result.json();
    let kitty = json["targets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "kitty")
        .unwrap();
    assert_eq!(kitty["outcome"], "updated");
    assert_eq!(kitty["edits"][0]["before"], "background_opacity 1");
    assert_eq!(kitty["edits"][0]["after"], "background_opacity 0.9");

    let decoration = &json["targets"][2];
    assert_eq!(decoration["name"], "decoration");
    assert_eq!(decoration["edits"][1]["before"], "2");
    assert_eq!(decoration["edits"][1]["after"], "8");
}

#[test]
fn test_no_command_applies() {
    let desktop = TestDesktop::new("dark\ntransparent\n");
    cli(&desktop)
        .run_robot(&[])
        .assert_success()
        .assert_json_field("/summary/total", &json!(7));
    assert_eq!(
        desktop.read("kitty"),
        "background_opacity 0.9\nfont_family JetBrains Mono\n"
    );
}

#[test]
fn test_robot_dry_run_changes_nothing() {
    let desktop = TestDesktop::new("light\ntransparent\n");
    cli(&desktop)
        .run_robot(&["apply", "--dry-run"])
        .assert_success()
        .assert_json_field("/dry_run", &json!(true))
        .assert_json_field("/reload", &json!("skipped_dry_run"))
        .assert_json_field("/targets/0/outcome", &json!("would_update"));
    assert_eq!(desktop.read("kitty"), crate::common::fixtures::KITTY);
}

#[test]
fn test_robot_show_includes_settings() {
    let desktop = TestDesktop::new("light\ntransparent\nscheme-fidelity\nnord\nnoborder\n");
    let result = cli(&desktop).run_robot(&["show"]);

    result
        .assert_success()
        .assert_json_field("/status/scheme", &json!("scheme-fidelity"))
        .assert_json_field("/status/wallpaper_style", &json!("nord"))
        .assert_json_field("/status/border", &json!("noborder"))
        .assert_json_field("/settings/border_size", &json!(0))
        .assert_json_field("/settings/blur", &json!(true))
        .assert_json_field("/settings/blur_passes", &json!(3))
        .assert_json_field("/settings/dark", &json!(false));
    assert_eq!(
        result.json()["status_file"],
        Value::String(desktop.status_path.display().to_string())
    );
}

#[test]
fn test_robot_targets_lists_builtins() {
    let desktop = TestDesktop::opaque_dark();
    let result = cli(&desktop).run_robot(&["targets"]);

    result.assert_success().assert_json_array_len("", 7);
    let names: Vec<_> = result
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        ["stylesheet", "window-rules", "decoration", "foot", "kitty", "launcher", "layout"]
    );
    result
        .assert_json_field("/0/edit_count", &json!(4))
        .assert_json_field("/0/creatable", &json!(true))
        .assert_json_field("/2/edit_count", &json!(3))
        .assert_json_field("/2/exists", &json!(true))
        .assert_json_field("/3/creatable", &json!(false));
}

#[test]
fn test_robot_error_goes_to_stderr_as_json() {
    let desktop = TestDesktop::opaque_dark();
    std::fs::remove_file(&desktop.status_path).unwrap();
    let result = cli(&desktop).run_robot(&["apply"]);

    result.assert_exit_code(1).assert_stdout_is_empty();
    let err = result.stderr_json();
    assert_eq!(err["error"], true);
    assert_eq!(err["recoverable"], true);
    assert!(err["message"].as_str().unwrap().contains("Status file not found"));
    assert!(err["suggestion"].is_string());
}

#[test]
fn test_compact_json_is_one_line() {
    let desktop = TestDesktop::opaque_dark();
    let result = cli(&desktop).run(&["--format", "json-compact", "show"]);

    result.assert_success();
    assert_eq!(result.stdout.trim_end().lines().count(), 1);
    assert_eq!(result.json()["status"]["mode"], "dark");
}

#[test]
fn test_robot_version_has_build_info() {
    let result = CliRunner::new().run_robot(&["version"]);
    result
        .assert_success()
        .assert_json_field("/version", &json!(env!("CARGO_PKG_VERSION")));
    let json = result.json();
    assert!(json["git_sha"].is_string());
    assert!(json["git_dirty"].is_boolean());
}
