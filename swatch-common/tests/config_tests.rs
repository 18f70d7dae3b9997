//! Unit tests for configuration loading and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate SWATCH_CONFIG are marked with #[serial].

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use swatch_common::config::{
    load_or_default, load_toml_config, resolve_config_path, LoggingConfig, SearchConfig,
    TomlConfig, CONFIG_ENV_VAR,
};
use swatch_common::{DeltaEMethod, Error, MeasurementMode};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("swatch.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults() {
    let config = TomlConfig::default();
    assert_eq!(config.search.method, DeltaEMethod::DE00);
    assert_eq!(config.search.threshold, 2.0);
    assert_eq!(config.search.max_results, 50);
    assert_eq!(config.search.mode, MeasurementMode::M0);
    assert_eq!(config.search.illuminant, "D50");
    assert_eq!(config.search.observer, "2");
    assert_eq!(config.search.table, 5);
    assert_eq!(config.search.early_exit_factor, 2);
    assert!(!config.search.exhaustive_scan);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_full_file_parses() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[search]
method = "dECMC2:1"
threshold = 3.5
max_results = 20
mode = "M2"
illuminant = "D65"
observer = "10"
table = 6
early_exit_factor = 4
exhaustive_scan = true

[logging]
level = "debug"
"#,
    );

    let config = load_toml_config(&path).unwrap();
    assert_eq!(
        config.search,
        SearchConfig {
            method: DeltaEMethod::Cmc2_1,
            threshold: 3.5,
            max_results: 20,
            mode: MeasurementMode::M2,
            illuminant: "D65".to_string(),
            observer: "10".to_string(),
            table: 6,
            early_exit_factor: 4,
            exhaustive_scan: true,
        }
    );
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "debug".to_string()
        }
    );
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[search]\nthreshold = 1.0\n");

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.search.threshold, 1.0);
    assert_eq!(config.search.max_results, 50);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_invalid_values_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[search]\nmax_results = 0\n");
    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));

    let path = write_config(&dir, "[search]\nthreshold = -1.0\n");
    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));

    let path = write_config(&dir, "[search]\nmethod = \"dE99\"\n");
    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = load_toml_config(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
#[serial]
fn test_load_or_default_on_missing_file() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let config = load_or_default(Some(&dir.path().join("absent.toml")));
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_load_or_default_on_broken_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "this is = = not toml");
    let config = load_or_default(Some(&path));
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_explicit_path_takes_precedence_over_env() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/swatch-from-env.toml");
    let explicit = PathBuf::from("/tmp/swatch-explicit.toml");

    assert_eq!(resolve_config_path(Some(&explicit)), Some(explicit.clone()));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_explicit_path() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/swatch-from-env.toml");

    assert_eq!(
        resolve_config_path(None),
        Some(PathBuf::from("/tmp/swatch-from-env.toml"))
    );

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[search]\nmax_results = 7\n");
    env::set_var(CONFIG_ENV_VAR, &path);

    let config = load_or_default(None);
    assert_eq!(config.search.max_results, 7);

    env::remove_var(CONFIG_ENV_VAR);
}
