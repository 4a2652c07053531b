//! Configuration loading and path resolution.

use std::path::{Path, PathBuf};

use themesync::config::{
    AppConfig, ConfigFormat, EditSpec, LoadedConfig, config_home, load_config,
    load_config_from_str, load_or_default, resolve_path, state_home,
};
use themesync::error::ThemeError;

use crate::common::env::with_home;
use crate::common::fixtures::TestDesktop;
use crate::common::init_test_logging;

#[test]
fn test_fixture_config_loads_from_disk() {
    init_test_logging();
    let desktop = TestDesktop::opaque_dark();
    let loaded = load_or_default(Some(&desktop.config_path)).unwrap();

    assert!(loaded.from_file);
    assert_eq!(loaded.config, TestDesktop::config());
    assert_eq!(loaded.status_path().unwrap(), desktop.status_path);
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let desktop = TestDesktop::opaque_dark();
    let err = load_or_default(Some(&desktop.root().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ThemeError::ConfigNotFound { .. }));
}

#[test]
fn test_unknown_extension_is_rejected() {
    let desktop = TestDesktop::opaque_dark();
    let path = desktop.root().join("config.ini");
    std::fs::write(&path, "").unwrap();
    assert!(load_config(&path).is_err());
}

#[test]
fn test_yaml_config_with_custom_target() {
    let yaml = r#"
status_file: /run/user/theme
derive:
  window_opacity:
    opaque: 1.0
    transparent: 0.7
reload:
  enabled: false
targets:
  - name: waybar
    path: waybar/style.css
    fallbacks:
      - ~/.config/waybar/style.css
    edits:
      - kind: pattern
        pattern: '@define-color bg-alpha (?P<value>[0-9.]+);'
        value: '{window_opacity}'
      - kind: line
        line: 1
        value: '/* {mode} */'
"#;
    let config = load_config_from_str(yaml, ConfigFormat::Yaml).unwrap();

    assert_eq!(config.status_file, PathBuf::from("/run/user/theme"));
    assert!((config.derive.window_opacity.transparent - 0.7).abs() < f64::EPSILON);
    assert_eq!(config.derive.border_size, 2);
    assert_eq!(config.target_names(), ["waybar"]);
    assert_eq!(config.targets[0].edits[1], EditSpec::line(1, "/* {mode} */"));
    assert_eq!(config.targets[0].candidates().count(), 2);
    assert!(config.targets[0].enabled);
    assert!(config.targets[0].create.is_none());
}

#[test]
fn test_toml_without_targets_keeps_builtins() {
    let config = load_config_from_str("[reload]\nwait_ms = 200\n", ConfigFormat::Toml).unwrap();
    assert_eq!(config.reload.wait_ms, 200);
    assert!(config.reload.enabled);
    assert_eq!(config.targets, AppConfig::default().targets);
}

#[test]
fn test_pattern_without_value_group_is_rejected() {
    let toml = r#"
[[targets]]
name = "kitty"
path = "kitty.conf"

[[targets.edits]]
kind = "pattern"
pattern = 'background_opacity\s+\S+'
value = "{terminal_opacity}"
"#;
    let err = load_config_from_str(toml, ConfigFormat::Toml).unwrap_err();
    assert!(err.is_user_recoverable(), "unexpected error: {err}");
}

#[test]
fn test_unknown_placeholder_is_rejected() {
    let toml = r#"
[[targets]]
name = "foot"
path = "colors.ini"
edits = [{ kind = "line", line = 2, value = "alpha={transparancy}" }]
"#;
    let err = load_config_from_str(toml, ConfigFormat::Toml).unwrap_err();
    assert!(err.to_string().contains("transparancy"), "unexpected error: {err}");
}

#[test]
fn test_relative_target_paths_follow_the_config_file() {
    let loaded = LoadedConfig {
        config: AppConfig::default(),
        path: PathBuf::from("/etc/themesync/config.toml"),
        from_file: true,
    };
    let resolver = loaded.resolver().unwrap();
    assert_eq!(
        resolver.resolve(Path::new("kitty/kitty.conf")).unwrap(),
        PathBuf::from("/etc/themesync/kitty/kitty.conf")
    );
    assert_eq!(
        resolver.resolve(Path::new("/abs/file")).unwrap(),
        PathBuf::from("/abs/file")
    );
}

#[test]
fn test_builtin_paths_follow_xdg_layout() {
    let config = AppConfig::default();
    let path = |name: &str| {
        config
            .targets
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.path.clone())
            .unwrap()
    };

    assert!(config.status_file.starts_with(state_home()));
    assert!(path("stylesheet").starts_with(state_home()));
    assert_eq!(path("kitty"), config_home().join("kitty/kitty.conf"));
    assert_eq!(path("launcher"), config_home().join("rofi/config.rasi"));
    assert_eq!(path("layout"), config_home().join("hypr/hyprland/layouts/default.conf"));

    let decoration = config.targets.iter().find(|t| t.name == "decoration").unwrap();
    assert_eq!(
        decoration.candidates().collect::<Vec<_>>(),
        [
            config_home().join("hypr/hyprland/decoration.conf"),
            config_home().join("hypr/hyprland/settings/decoration.conf"),
            config_home().join("hypr/decoration.conf"),
        ]
    );
}

#[cfg(unix)]
#[test]
fn test_tilde_expands_to_home() {
    let desktop = TestDesktop::opaque_dark();
    let home = desktop.root().display().to_string();
    let _guard = with_home(&home);

    let resolved = resolve_path(Path::new("~/.config/kitty/kitty.conf"), Path::new("/ignored")).unwrap();
    assert_eq!(resolved, desktop.root().join(".config/kitty/kitty.conf"));
}
