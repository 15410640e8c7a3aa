//! Tests for configuration file discovery and resolution
//!
//! Tests that touch LAB_CONFIG are marked #[serial] so they do not race on
//! the process environment.

use lab_common::config::{
    config_file_path, load_toml_config, ConfigOverrides, ServiceConfig, CONFIG_PATH_ENV,
};
use lab_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
fn test_load_toml_config_reads_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
database = "/srv/lab/samples.db"
bind = "127.0.0.1"
port = 9090
max_connections = 4
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.database, Some(PathBuf::from("/srv/lab/samples.db")));
    assert_eq!(config.bind.as_deref(), Some("127.0.0.1"));
    assert_eq!(config.port, Some(9090));
    assert_eq!(config.max_connections, Some(4));
}

#[test]
fn test_load_toml_config_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 7000\n").unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.port, Some(7000));
    assert!(config.database.is_none());
    assert!(config.bind.is_none());
}

#[test]
fn test_load_toml_config_invalid_syntax() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = = 1").unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_load_toml_config_missing_file() {
    let path = PathBuf::from("/nonexistent/lab-tracker/config.toml");
    assert!(matches!(load_toml_config(&path), Err(Error::Io(_))));
}

#[test]
#[serial]
fn test_config_env_var_selects_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "port = 6123\n").unwrap();

    env::set_var(CONFIG_PATH_ENV, &path);
    assert_eq!(config_file_path(), Some(path.clone()));

    let config = ServiceConfig::load(ConfigOverrides::default()).unwrap();
    assert_eq!(config.port, 6123);

    env::remove_var(CONFIG_PATH_ENV);
}

#[test]
#[serial]
fn test_broken_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "this is not toml [").unwrap();

    env::set_var(CONFIG_PATH_ENV, &path);
    let config = ServiceConfig::load(ConfigOverrides {
        port: Some(8181),
        ..Default::default()
    })
    .unwrap();
    env::remove_var(CONFIG_PATH_ENV);

    assert_eq!(config.port, 8181);
    assert_eq!(config.max_connections, 10);
}
