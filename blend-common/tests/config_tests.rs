//! Unit tests for data folder resolution
//!
//! Priority order: CLI argument, environment variable, TOML config file,
//! compiled default. Missing or broken config files never abort startup.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate the env var are marked with #[serial].

use blend_common::config::{
    database_path, default_data_folder, ensure_directory_exists, load_toml_config,
    resolve_data_folder_with, DATABASE_FILE,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

const TEST_ENV: &str = "BLEND_TEST_DATA_FOLDER";

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
    file.write_all(contents.as_bytes()).expect("Should write config");
    file
}

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(TEST_ENV, "/tmp/blend-from-env");
    let config = write_config(r#"data_folder = "/tmp/blend-from-toml""#);

    let folder = resolve_data_folder_with(
        Some(Path::new("/tmp/blend-from-cli")),
        TEST_ENV,
        Some(config.path()),
    );

    assert_eq!(folder, PathBuf::from("/tmp/blend-from-cli"));
    env::remove_var(TEST_ENV);
}

#[test]
#[serial]
fn test_env_var_beats_config_file() {
    env::set_var(TEST_ENV, "/tmp/blend-from-env");
    let config = write_config(r#"data_folder = "/tmp/blend-from-toml""#);

    let folder = resolve_data_folder_with(None, TEST_ENV, Some(config.path()));

    assert_eq!(folder, PathBuf::from("/tmp/blend-from-env"));
    env::remove_var(TEST_ENV);
}

#[test]
#[serial]
fn test_config_file_used_without_env() {
    env::remove_var(TEST_ENV);
    let config = write_config(r#"data_folder = "/tmp/blend-from-toml""#);

    let folder = resolve_data_folder_with(None, TEST_ENV, Some(config.path()));

    assert_eq!(folder, PathBuf::from("/tmp/blend-from-toml"));
}

#[test]
#[serial]
fn test_broken_config_falls_back_to_default() {
    env::remove_var(TEST_ENV);
    let config = write_config("data_folder = [not toml");

    let folder = resolve_data_folder_with(None, TEST_ENV, Some(config.path()));

    assert_eq!(folder, default_data_folder());
}

#[test]
#[serial]
fn test_missing_config_file_falls_back_to_default() {
    env::remove_var(TEST_ENV);

    let folder = resolve_data_folder_with(
        None,
        TEST_ENV,
        Some(Path::new("/nonexistent/blendlog/config.toml")),
    );

    assert_eq!(folder, default_data_folder());
}

#[test]
fn test_load_toml_config_without_folder() {
    let config = write_config("# empty\n");
    let parsed = load_toml_config(config.path()).expect("Empty config should parse");
    assert!(parsed.data_folder.is_none());
}

#[test]
fn test_database_path_inside_folder() {
    let root = PathBuf::from("/tmp/blend-root");
    assert_eq!(database_path(&root), root.join(DATABASE_FILE));
}

#[test]
fn test_ensure_directory_exists_is_idempotent() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let nested = dir.path().join("a").join("b");

    ensure_directory_exists(&nested).expect("First call should create");
    ensure_directory_exists(&nested).expect("Second call should succeed");

    assert!(nested.is_dir());
}
