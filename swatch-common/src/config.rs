//! Configuration loading and config file resolution
//!
//! Swatch reads a single optional TOML file with search defaults and logging
//! settings. A missing file is not an error for callers that use
//! [`load_or_default`]: they get a warning and built-in defaults.
//!
//! Config file resolution priority:
//! 1. Explicit path (command-line argument of the embedding application)
//! 2. `SWATCH_CONFIG` environment variable
//! 3. `<user config dir>/swatch/swatch.toml`

use crate::catalog::MeasurementMode;
use crate::method::DeltaEMethod;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "SWATCH_CONFIG";

/// Root of the TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for similarity search controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default: dE00
    #[serde(default)]
    pub method: DeltaEMethod,

    /// Default: 2.0 (clamped to at least 0.1 when used)
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Default: 50
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Default: M0
    #[serde(default)]
    pub mode: MeasurementMode,

    /// Default: "D50"
    #[serde(default = "default_illuminant")]
    pub illuminant: String,

    /// Default: "2"
    #[serde(default = "default_observer")]
    pub observer: String,

    /// Default: 5
    #[serde(default = "default_table")]
    pub table: u32,

    /// Scanning stops once `early_exit_factor × max_results` matches within
    /// the threshold have been collected.
    ///
    /// Default: 2
    #[serde(default = "default_early_exit_factor")]
    pub early_exit_factor: usize,

    /// Disable early exit and always scan the whole corpus.
    ///
    /// Default: false
    #[serde(default)]
    pub exhaustive_scan: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            method: DeltaEMethod::default(),
            threshold: default_threshold(),
            max_results: default_max_results(),
            mode: MeasurementMode::default(),
            illuminant: default_illuminant(),
            observer: default_observer(),
            table: default_table(),
            early_exit_factor: default_early_exit_factor(),
            exhaustive_scan: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_threshold() -> f64 {
    2.0
}

fn default_max_results() -> usize {
    50
}

fn default_illuminant() -> String {
    "D50".to_string()
}

fn default_observer() -> String {
    "2".to_string()
}

fn default_table() -> u32 {
    5
}

fn default_early_exit_factor() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve which config file to read, if any
///
/// Returns the first candidate in priority order. The explicit path and the
/// environment variable are returned even if the file does not exist, so that
/// loading reports the missing file; the per-user default is only returned
/// when it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: explicit path
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: per-user config directory
    dirs::config_dir()
        .map(|d| d.join("swatch").join("swatch.toml"))
        .filter(|p| p.exists())
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration with graceful degradation
///
/// Missing or invalid files log a warning and yield defaults.
pub fn load_or_default(explicit: Option<&Path>) -> TomlConfig {
    let Some(path) = resolve_config_path(explicit) else {
        info!("No config file found, using built-in defaults");
        return TomlConfig::default();
    };

    match load_toml_config(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Config {} unusable ({}), using built-in defaults", path.display(), e);
            TomlConfig::default()
        }
    }
}

fn validate(config: &TomlConfig) -> Result<()> {
    let search = &config.search;
    if !search.threshold.is_finite() || search.threshold < 0.0 {
        return Err(Error::Config(format!(
            "search.threshold must be a non-negative number, got {}",
            search.threshold
        )));
    }
    if search.max_results == 0 {
        return Err(Error::Config("search.max_results must be at least 1".to_string()));
    }
    if search.early_exit_factor == 0 {
        return Err(Error::Config(
            "search.early_exit_factor must be at least 1".to_string(),
        ));
    }
    if search.illuminant.trim().is_empty() || search.observer.trim().is_empty() {
        return Err(Error::Config(
            "search.illuminant and search.observer must not be empty".to_string(),
        ));
    }
    Ok(())
}
