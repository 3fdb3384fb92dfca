//! Tests for bootstrap configuration loading and graceful degradation
//!
//! Tests that manipulate BKM_CONFIG_DIR are marked with #[serial] so they
//! do not race on the process environment.

use bkm_common::config::{default_config_path, ConfigSource, TomlConfig, CONFIG_DIR_ENV};
use bkm_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, text).expect("Should write config file");
    path
}

#[test]
fn test_explicit_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        bind = "0.0.0.0"
        port = 9000

        [logging]
        level = "debug"
        "#,
    );

    let (config, source) = TomlConfig::load(Some(&path)).unwrap();
    assert_eq!(source, ConfigSource::File(path.clone()));
    assert_eq!(config.bind, "0.0.0.0");
    assert_eq!(config.port, 9000);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_explicit_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let (config, source) = TomlConfig::load(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
    assert_eq!(source, ConfigSource::Defaults { missing: Some(path) });
}

#[test]
fn test_malformed_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "port = [1, 2");

    let result = TomlConfig::load(Some(&path));
    assert!(matches!(result, Err(Error::Toml(_))));
}

#[test]
#[serial]
fn test_config_dir_env_var() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "port = 7001\n");
    env::set_var(CONFIG_DIR_ENV, dir.path());

    assert_eq!(default_config_path(), Some(dir.path().join("config.toml")));
    let (config, source) = TomlConfig::load(None).unwrap();
    assert_eq!(config.port, 7001);
    assert!(!source.is_defaults());

    env::remove_var(CONFIG_DIR_ENV);
}

#[test]
#[serial]
fn test_config_dir_env_var_without_file() {
    let dir = TempDir::new().unwrap();
    env::set_var(CONFIG_DIR_ENV, dir.path());

    let (config, source) = TomlConfig::load(None).unwrap();
    assert_eq!(config, TomlConfig::default());
    assert_eq!(
        source,
        ConfigSource::Defaults {
            missing: Some(dir.path().join("config.toml"))
        }
    );

    env::remove_var(CONFIG_DIR_ENV);
}

#[test]
#[serial]
fn test_default_path_uses_app_dir() {
    env::remove_var(CONFIG_DIR_ENV);

    if let Some(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("bookminder"));
        assert!(path_str.ends_with("config.toml"));
    }
}
