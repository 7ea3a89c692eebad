//! Tests for configuration loading and data folder resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate TUNECUP_DATA_FOLDER are marked with #[serial].

use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tunecup_common::config::{
    default_data_folder, resolve_data_folder, DataFolder, StoreFiles, TomlConfig, DATA_FOLDER_ENV,
};

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(DATA_FOLDER_ENV);

    let resolved = resolve_data_folder(None, &TomlConfig::default());
    assert_eq!(resolved, default_data_folder());
    assert!(!resolved.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_resolver_env_var_beats_toml() {
    env::set_var(DATA_FOLDER_ENV, "/tmp/tunecup-env-folder");

    let config = TomlConfig {
        data_folder: Some(PathBuf::from("/tmp/tunecup-toml-folder")),
        ..TomlConfig::default()
    };
    let resolved = resolve_data_folder(None, &config);

    env::remove_var(DATA_FOLDER_ENV);
    assert_eq!(resolved, PathBuf::from("/tmp/tunecup-env-folder"));
}

#[test]
#[serial]
fn test_resolver_cli_beats_env_var() {
    env::set_var(DATA_FOLDER_ENV, "/tmp/tunecup-env-folder");

    let resolved = resolve_data_folder(Some(Path::new("/tmp/cli")), &TomlConfig::default());

    env::remove_var(DATA_FOLDER_ENV);
    assert_eq!(resolved, PathBuf::from("/tmp/cli"));
}

#[test]
#[serial]
fn test_resolver_toml_used_without_env() {
    env::remove_var(DATA_FOLDER_ENV);

    let config = TomlConfig {
        data_folder: Some(PathBuf::from("/tmp/tunecup-toml-folder")),
        ..TomlConfig::default()
    };
    assert_eq!(
        resolve_data_folder(None, &config),
        PathBuf::from("/tmp/tunecup-toml-folder")
    );
}

#[test]
fn test_missing_config_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = TomlConfig::load(&temp_dir.path().join("nope.toml")).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "data_folder = [unterminated").unwrap();

    assert!(TomlConfig::load(&path).is_err());
}

#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
data_folder = "/music/league"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.data_folder, Some(PathBuf::from("/music/league")));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.files, StoreFiles::default());
}

#[test]
fn test_ensure_store_files_creates_only_missing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("league");
    let folder = DataFolder::new(&root, StoreFiles::default());

    assert_eq!(folder.ensure_store_files().unwrap(), 4);
    assert_eq!(std::fs::read_to_string(folder.votes_path()).unwrap().trim(), "[]");

    std::fs::write(folder.competitors_path(), r#"[{"id":"C1","name":"Al"}]"#).unwrap();
    assert_eq!(folder.ensure_store_files().unwrap(), 0);
    assert!(std::fs::read_to_string(folder.competitors_path())
        .unwrap()
        .contains("C1"));
}

#[test]
fn test_ensure_csv_store_files_writes_headers() {
    let temp_dir = TempDir::new().unwrap();
    let folder = DataFolder::new(temp_dir.path(), StoreFiles::csv());

    assert_eq!(folder.ensure_store_files().unwrap(), 4);
    assert!(folder.votes_path().ends_with("votes.csv"));

    let raw = std::fs::read_to_string(folder.votes_path()).unwrap();
    assert_eq!(
        raw.trim_end(),
        "Spotify URI,Voter ID,Created,Points Assigned,Comment,Round ID"
    );
}
