//! Integration tests for Settings loading with a local project config.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they test local config merging with compiled defaults.

use std::fs;

use tempfile::TempDir;

use cheatsheets::config::{local_config_path, Settings};

// ============================================================
// Settings::load() local config overlay tests
// ============================================================

#[test]
fn given_local_config_with_scalars_when_load_then_overrides_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();
    let config = r#"
editor = "nano -w"

[store]
backup = true
"#;
    fs::write(local_config_path(project.path()), config).unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.editor, "nano -w");
    assert!(settings.store.backup, "local backup should win");
    assert!(settings.store.pretty, "unset option keeps default");
}

#[test]
fn given_relative_data_file_when_load_then_resolved_against_project_dir() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "data_file = \"notes/sheets.json\"\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(
        settings.data_file,
        project.path().join("notes").join("sheets.json")
    );
}

#[test]
fn given_absolute_data_file_when_load_then_kept_as_is() {
    let project = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    let target = elsewhere.path().join("store.json");
    fs::write(
        local_config_path(project.path()),
        format!("data_file = {:?}\n", target.to_string_lossy()),
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.data_file, target);
}

#[test]
fn given_project_dir_without_config_when_load_then_defaults() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert!(settings.data_file.ends_with("cheatsheets.json"));
    assert!(!settings.store.backup);
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "store = [not toml").unwrap();

    let result = Settings::load(Some(project.path()));

    let err = result.expect_err("invalid toml should fail");
    assert!(err.to_string().starts_with("config error:"), "got: {err}");
}

#[test]
fn given_loaded_settings_when_rendered_as_toml_then_round_trips() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "[store]\npretty = false\n").unwrap();
    let settings = Settings::load(Some(project.path())).unwrap();

    let rendered = settings.to_toml().unwrap();
    let reparsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(reparsed, settings);
}
