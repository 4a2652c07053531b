//! Status file reading and settings derivation.

use themesync::config::DeriveConfig;
use themesync::error::ThemeError;
use themesync::settings::ThemeSettings;
use themesync::status::{
    Border, ColorMode, StatusOverrides, ThemeStatus, Transparency, TransparencyMode, Vibrancy,
    read_status, write_status,
};

use crate::common::fixtures::{LIGHT_TRANSPARENT, TestDesktop};
use crate::common::init_test_logging;

#[test]
fn test_reads_fixture_status() {
    init_test_logging();
    let desktop = TestDesktop::opaque_dark();
    let status = read_status(&desktop.status_path).unwrap();

    assert_eq!(status.mode, ColorMode::Dark);
    assert_eq!(status.transparency, Transparency::Opaque);
    assert_eq!(status.scheme, "scheme-tonal-spot");
    assert_eq!(status.border, Border::Border);
    assert!(status.warnings.is_empty());
}

#[test]
fn test_missing_status_is_an_error() {
    let desktop = TestDesktop::opaque_dark();
    let missing = desktop.root().join("nope.txt");

    let err = read_status(&missing).unwrap_err();
    assert!(matches!(err, ThemeError::StatusNotFound { .. }));
    assert!(err.is_user_recoverable());
}

#[test]
fn test_garbled_status_falls_back_with_warnings() {
    let desktop = TestDesktop::new("midnight\nfrosted\n");
    let status = read_status(&desktop.status_path).unwrap();

    assert_eq!(status, ThemeStatus {
        warnings: status.warnings.clone(),
        ..ThemeStatus::default()
    });
    assert_eq!(status.warnings.len(), 2);
}

#[test]
fn test_write_then_read_keeps_overrides() {
    let desktop = TestDesktop::opaque_dark();
    let nested = desktop.root().join("fresh/dir/colormode.txt");

    let status = ThemeStatus::default().with_overrides(&StatusOverrides {
        mode: Some(ColorMode::Light),
        transparency: Some(Transparency::Transparent),
        wallpaper_style: Some("Tokyo-Night".to_string()),
        vibrancy: Some(Vibrancy::Vibrant),
        transparency_mode: Some(TransparencyMode::Intense),
        ..StatusOverrides::default()
    });
    write_status(&nested, &status).unwrap();

    assert_eq!(
        std::fs::read_to_string(&nested).unwrap(),
        "light\ntransparent\nscheme-tonal-spot\ntokyo-night\nborder\nvibrant\nintense\n"
    );
    assert_eq!(read_status(&nested).unwrap(), status);
}

#[test]
fn test_transparent_settings_render_into_templates() {
    let status = ThemeStatus::parse(LIGHT_TRANSPARENT);
    let settings = ThemeSettings::derive(&status, &DeriveConfig::default());

    assert_eq!(
        settings.render("{mode}/{transparency}/{scheme}/{wallpaper_style}"),
        "light/transparent/scheme-content/catppuccin"
    );
    assert_eq!(
        settings.render("$border:{scss_border}; $vibrant:{scss_vibrant}; $transProfile:{trans_profile};"),
        "$border:True; $vibrant:True; $transProfile:Normal;"
    );
    assert_eq!(
        settings.render("windowrule = opacity {window_opacity} override, class:.*"),
        "windowrule = opacity 0.78 override, class:.*"
    );
    assert_eq!(
        settings.render("blur={blur} size={blur_size} passes={blur_passes} border={border_size}"),
        "blur=true size=8 passes=3 border=2"
    );
}

#[test]
fn test_noborder_opaque_settings() {
    let status = ThemeStatus::parse("dark\nopaque\nscheme-neutral\nnone\nnoborder\nnormal\nintense\n");
    let settings = ThemeSettings::derive(&status, &DeriveConfig::default());

    assert_eq!(settings.border_size, 0);
    assert_eq!(settings.trans_profile, "none");
    assert_eq!(settings.render("{scss_border}/{scss_transparent}"), "False/False");
    assert_eq!(settings.render("wbg:{launcher_background};"), "wbg:var(surface);");
}

#[test]
fn test_custom_derive_values_are_used() {
    let mut derive = DeriveConfig::default();
    derive.terminal_opacity.opaque = 0.95;
    derive.launcher_background.opaque = "var(background)".to_string();
    let settings = ThemeSettings::derive(&ThemeStatus::parse("dark\nopaque\n"), &derive);

    assert_eq!(settings.render("alpha={terminal_opacity}"), "alpha=0.95");
    assert_eq!(settings.render("{launcher_background}"), "var(background)");
    assert!(!settings.blur);
}
