//! Configuration management for securecheck.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and `SECURECHECK_`-prefixed environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "securecheck";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "police.db";

/// Environment variable prefix.
const ENV_PREFIX: &str = "SECURECHECK_";

/// Accepted range for `display.chart_width`.
const CHART_WIDTH_RANGE: std::ops::RangeInclusive<usize> = 10..=200;

/// Application configuration.
///
/// Sources, highest precedence first:
/// 1. Environment variables (`SECURECHECK_STORE__DATABASE_PATH`, ...)
/// 2. TOML config file at `~/.config/securecheck/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store connection settings.
    pub store: StoreConfig,
    /// Rendering settings.
    pub display: DisplayConfig,
}

/// Connection settings for the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/securecheck/police.db`
    pub database_path: Option<PathBuf>,
    /// Create the database file and `traffic_stops` table when absent.
    pub create_if_missing: bool,
}

/// Rendering settings for tables and charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width in characters of the longest chart bar.
    pub chart_width: usize,
    /// Maximum number of table rows to print. 0 for unlimited.
    pub max_rows: usize,
    /// Colorize notices.
    pub color: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            create_if_missing: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart_width: 40,
            max_rows: 0,
            color: true,
        }
    }
}

impl StoreConfig {
    /// Get the database path, resolving the default if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| Config::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if !CHART_WIDTH_RANGE.contains(&self.display.chart_width) {
            return Err(Error::config_validation(format!(
                "chart_width ({}) must be between {} and {}",
                self.display.chart_width,
                CHART_WIDTH_RANGE.start(),
                CHART_WIDTH_RANGE.end()
            )));
        }

        if let Some(path) = &self.store.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::config_validation("database_path must not be empty"));
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.store.database_path()
    }
}
