//! Configuration management for the store monitor
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `STORE_MONITOR_*` environment variables, then command-line flags (applied by
//! the CLI). `validate` runs once all layers are in.

use crate::app::models::ReferenceInstant;
use crate::app::services::timezone::TimezoneResolver;
use crate::constants::{
    BUSINESS_HOURS_FILE_NAME, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DATA_DIR,
    DEFAULT_HOST, DEFAULT_OUTPUT_DIR, DEFAULT_PORT, DEFAULT_TIMEZONE, ENV_PREFIX,
    STORE_STATUS_FILE_NAME, STORES_FILE_NAME,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub report: ReportConfig,
    pub server: ServerConfig,
}

/// Locations of the three input tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub stores_path: PathBuf,
    pub business_hours_path: PathBuf,
    pub status_path: PathBuf,
}

impl DataConfig {
    /// Standard file names inside one directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            stores_path: dir.join(STORES_FILE_NAME),
            business_hours_path: dir.join(BUSINESS_HOURS_FILE_NAME),
            status_path: dir.join(STORE_STATUS_FILE_NAME),
        }
    }

    fn paths(&self) -> [(&'static str, &Path); 3] {
        [
            ("data.stores_path", &self.stores_path),
            ("data.business_hours_path", &self.business_hours_path),
            ("data.status_path", &self.status_path),
        ]
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

/// Report generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory receiving `<report_id>.csv` artifacts
    pub output_dir: PathBuf,
    /// Timezone for stores with a missing or unknown timezone
    pub fallback_timezone: String,
    /// How the build's "now" is chosen
    pub reference: ReferenceInstant,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            fallback_timezone: DEFAULT_TIMEZONE.to_string(),
            reference: ReferenceInstant::default(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Default config file location: `<config_dir>/store-monitor/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file '{}'", path.display()),
                e,
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration using layered approach (file -> env -> args)
    ///
    /// `data_dir` and `output_dir` are the path flags given on the command line,
    /// if any. The result is not validated yet.
    pub fn load_layered(
        data_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        config_file: Option<&Path>,
    ) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides()?;

        if let Some(dir) = data_dir {
            config.data = DataConfig::in_dir(dir);
        }
        if let Some(dir) = output_dir {
            config.report.output_dir = dir;
        }

        Ok(config)
    }

    /// Apply `STORE_MONITOR_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup, keyed by full variable name
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |suffix: &str| {
            let key = format!("{}{}", ENV_PREFIX, suffix);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("DATA_DIR") {
            debug!("{} overrides data directory: {}", key, value);
            self.data = DataConfig::in_dir(value);
        }
        if let Some((key, value)) = var("OUTPUT_DIR") {
            debug!("{} overrides output directory: {}", key, value);
            self.report.output_dir = PathBuf::from(value);
        }
        if let Some((key, value)) = var("FALLBACK_TIMEZONE") {
            debug!("{} overrides fallback timezone: {}", key, value);
            self.report.fallback_timezone = value;
        }
        if let Some((_, value)) = var("HOST") {
            self.server.host = value;
        }
        if let Some((key, value)) = var("PORT") {
            self.server.port = value.trim().parse().map_err(|e| {
                Error::configuration(format!("Invalid {} '{}': {}", key, value, e))
            })?;
        }

        Ok(())
    }

    /// Point all three input tables at one directory
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data = DataConfig::in_dir(dir);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report.output_dir = dir.into();
        self
    }

    pub fn with_reference(mut self, reference: ReferenceInstant) -> Self {
        self.report.reference = reference;
        self
    }

    /// Validate the final configuration
    pub fn validate(&self) -> Result<()> {
        for (name, path) in self.data.paths() {
            if path.as_os_str().is_empty() {
                return Err(Error::configuration(format!("{} cannot be empty", name)));
            }
        }

        if self.report.output_dir.as_os_str().is_empty() {
            return Err(Error::configuration("report.output_dir cannot be empty"));
        }

        self.timezone_resolver()?;

        if self.server.host.trim().is_empty() {
            return Err(Error::configuration("server.host cannot be empty"));
        }
        if self.server.port == 0 {
            return Err(Error::configuration("server.port must be greater than 0"));
        }

        Ok(())
    }

    /// Timezone resolver using the configured fallback
    pub fn timezone_resolver(&self) -> Result<TimezoneResolver> {
        TimezoneResolver::with_fallback_name(&self.report.fallback_timezone)
    }

    /// Create the report output directory if needed
    pub fn ensure_output_directory(&self) -> Result<()> {
        let dir = &self.report.output_dir;
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::io(
                    format!("Failed to create output directory '{}'", dir.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}
