//! On-disk state: the theme preference, the per-session splash marker and the
//! TOML configuration file.

use std::fs;

use fitsyn_config::ConfigError;
use fitsyn_engine::storage::{FileStore, KeyValueStore, UnavailableStore};
use fitsyn_engine::theme::THEME_KEY;
use fitsyn_engine::{Command, Route, ShellConfig, Theme};
use tempfile::tempdir;

use crate::common::{ShellBuilder, ms};

fn shell_with_stores(durable: FileStore, session: FileStore) -> ShellBuilder {
    ShellBuilder {
        durable: Box::new(durable),
        session_store: Box::new(session),
        ..ShellBuilder::default()
    }
}

#[tokio::test]
async fn theme_choice_survives_restart() {
    let dir = tempdir().expect("tempdir");
    let prefs = dir.path().join("preferences.json");
    let session = dir.path().join("session.json");

    let mut first = shell_with_stores(FileStore::new(&prefs), FileStore::new(&session))
        .route("/settings")
        .build();
    assert_eq!(first.app.theme(), Theme::Dark);
    first.app.dispatch(Command::Activate);
    assert_eq!(first.app.theme(), Theme::Light);
    assert_eq!(
        FileStore::new(&prefs).get(THEME_KEY).expect("read").as_deref(),
        Some("light")
    );

    let second = shell_with_stores(FileStore::new(&prefs), FileStore::new(&session)).build();
    assert_eq!(second.app.theme(), Theme::Light);
}

#[tokio::test]
async fn garbage_theme_value_falls_back_to_dark() {
    let dir = tempdir().expect("tempdir");
    let prefs = FileStore::new(dir.path().join("preferences.json"));
    prefs.set(THEME_KEY, "sepia").expect("seed");

    let shell = shell_with_stores(prefs, FileStore::new(dir.path().join("session.json"))).build();
    assert_eq!(shell.app.theme(), Theme::Dark);
}

#[tokio::test]
async fn theme_still_toggles_without_storage() {
    let mut shell = ShellBuilder {
        durable: Box::new(UnavailableStore::new("read-only home")),
        ..ShellBuilder::default()
    }
    .route("/settings")
    .build();
    shell.app.dispatch(Command::Activate);
    assert_eq!(shell.app.theme(), Theme::Light);
}

#[tokio::test]
async fn splash_marker_is_scoped_to_one_terminal_session() {
    let dir = tempdir().expect("tempdir");
    let prefs = dir.path().join("preferences.json");
    let session_a = dir.path().join("session-a.json");

    let mut first = shell_with_stores(FileStore::new(&prefs), FileStore::new(&session_a))
        .with_splash()
        .build();
    assert!(first.app.show_splash());
    first.app.tick(ms(3000));
    assert!(!first.app.show_splash());

    let again = shell_with_stores(FileStore::new(&prefs), FileStore::new(&session_a))
        .with_splash()
        .build();
    assert!(!again.app.show_splash());

    let other_session = shell_with_stores(
        FileStore::new(&prefs),
        FileStore::new(dir.path().join("session-b.json")),
    )
    .with_splash()
    .build();
    assert!(other_session.app.show_splash());
}

#[tokio::test]
async fn config_file_drives_the_shell() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[app]
ascii_only = true
reduced_motion = true
start_muted = true

[timings]
splash_min_duration = 1000
toast_lifetime = 1500
"#,
    )
    .expect("write config");

    let config = ShellConfig::load_from(path).expect("parse");
    assert!(config.ui.ascii_only);
    assert!(config.ui.reduced_motion);
    assert_eq!(config.timings.splash_min_duration, ms(1000));
    assert_eq!(config.timings.toast_lifetime, ms(1500));
    assert_eq!(config.timings.menu_slide, ms(0));

    let mut shell = ShellBuilder {
        config,
        ..ShellBuilder::default()
    }
    .build_in_memory();
    assert!(shell.app.is_muted());

    // No slide: the menu is fully open on the next tick.
    shell.app.dispatch(Command::ToggleMenu);
    shell.app.tick(ms(0));
    assert!((shell.app.menu().visible_fraction() - 1.0).abs() < f32::EPSILON);
    assert_eq!(shell.audio.count(), 0);
    assert_eq!(shell.app.route(), &Route::Home);
}

#[test]
fn malformed_config_reports_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[app\nascii_only = ").expect("write config");

    let err = ShellConfig::load_from(path.clone()).expect_err("malformed");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), &path);
}

#[test]
fn missing_config_means_defaults() {
    let dir = tempdir().expect("tempdir");
    let config = ShellConfig::load_from(dir.path().join("absent.toml")).expect("defaults");
    assert!(!config.ui.ascii_only);
    assert!(!config.start_muted);
}
