//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/tracklore/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/tracklore/` (~/.config/tracklore/)
//! - Data: `$XDG_DATA_HOME/tracklore/` (~/.local/share/tracklore/)
//! - State/Logs: `$XDG_STATE_HOME/tracklore/` (~/.local/state/tracklore/)

use crate::analytics::ReportOptions;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Report catalogue thresholds
    #[serde(default)]
    pub reports: ReportOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/tracklore/config.toml` (~/.config/tracklore/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("tracklore").join("config.toml")
    }

    /// Returns the data directory path (for export files)
    ///
    /// `$XDG_DATA_HOME/tracklore/` (~/.local/share/tracklore/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("tracklore")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/tracklore/` (~/.local/state/tracklore/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("tracklore")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/tracklore/tracklore.log` (~/.local/state/tracklore/tracklore.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("tracklore.log")
    }
}
