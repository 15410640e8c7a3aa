//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument or its environment variable (handled by the binary's clap args)
//! 2. TOML config file
//! 3. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file never stops startup; it is logged and skipped.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "LAB_CONFIG";

/// Application directory name under the platform config/data dirs
const APP_DIR: &str = "lab-tracker";

/// Settings readable from `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path of the SQLite database file
    pub database: Option<PathBuf>,
    /// Address to bind the HTTP listener to
    pub bind: Option<String>,
    /// HTTP port
    pub port: Option<u16>,
    /// Upper bound of the connection pool
    pub max_connections: Option<u32>,
}

/// Compiled fallbacks used when neither CLI, environment nor TOML set a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database: PathBuf,
    pub bind: String,
    pub port: u16,
    pub max_connections: u32,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            database: default_data_dir().join("lab_samples.db"),
            bind: "0.0.0.0".to_string(),
            port: 8080,
            max_connections: 10,
        }
    }
}

/// Values supplied on the command line (or via their env fallbacks)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub max_connections: Option<u32>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub database: PathBuf,
    pub bind: String,
    pub port: u16,
    pub max_connections: u32,
}

impl ServiceConfig {
    /// Merge overrides, optional TOML settings and compiled defaults
    pub fn resolve(overrides: ConfigOverrides, toml: Option<TomlConfig>) -> Result<Self> {
        let toml = toml.unwrap_or_default();
        let defaults = CompiledDefaults::for_current_platform();

        let config = Self {
            database: overrides
                .database
                .or(toml.database)
                .unwrap_or(defaults.database),
            bind: overrides.bind.or(toml.bind).unwrap_or(defaults.bind),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            max_connections: overrides
                .max_connections
                .or(toml.max_connections)
                .unwrap_or(defaults.max_connections),
        };

        if config.max_connections == 0 {
            return Err(Error::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    /// Resolve using the config file found by [`config_file_path`], if any
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let toml = match config_file_path() {
            Some(path) => match load_toml_config(&path) {
                Ok(config) => {
                    debug!("Loaded config file {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Ignoring config file {}: {}", path.display(), e);
                    None
                }
            },
            None => None,
        };

        Self::resolve(overrides, toml)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
}

/// Locate the config file: `LAB_CONFIG` first, then the platform config dir
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./lab_data"))
}
