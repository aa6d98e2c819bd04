//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::series::{SeriesProfile, ValueFormat};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub series: SeriesConfig,

    #[serde(default)]
    pub watcher: WatcherSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tracked series configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesConfig {
    /// CSV file to watch
    #[serde(default = "default_csv_path")]
    pub csv_path: String,

    /// Display name for the series
    #[serde(default = "default_series_name")]
    pub name: String,

    /// Unit of measurement
    #[serde(default)]
    pub unit: String,

    /// Display format: currency, count, or plain
    #[serde(default)]
    pub format: ValueFormat,
}

fn default_csv_path() -> String {
    "samples.csv".to_string()
}

fn default_series_name() -> String {
    "series".to_string()
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            name: default_series_name(),
            unit: String::new(),
            format: ValueFormat::default(),
        }
    }
}

impl SeriesConfig {
    /// Display profile derived from this configuration
    pub fn profile(&self) -> SeriesProfile {
        SeriesProfile::new(&self.name, &self.unit, self.format)
    }
}

/// CSV watcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WatcherSettings {
    /// How often to poll the CSV for appended rows (ms)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Upper bound for error backoff (seconds)
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_max_backoff() -> u64 {
    60
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum concurrent WebSocket connections
    #[serde(default = "default_max_ws_connections")]
    pub max_ws_connections: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_max_ws_connections() -> usize {
    256
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_ws_connections: default_max_ws_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pulseboard").join("config.toml")),
            Some(PathBuf::from("/etc/pulseboard/config.toml")),
            Some(PathBuf::from("./pulseboard.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("PULSEBOARD_CSV_PATH") {
            self.series.csv_path = path;
        }
        if let Ok(name) = std::env::var("PULSEBOARD_SERIES_NAME") {
            self.series.name = name;
        }

        if let Ok(host) = std::env::var("PULSEBOARD_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("PULSEBOARD_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(interval) = std::env::var("PULSEBOARD_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.watcher.poll_interval_ms = ms;
            }
        }

        if let Ok(level) = std::env::var("PULSEBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PULSEBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pulseboard Configuration
#
# Environment variables override these settings:
# - PULSEBOARD_CSV_PATH
# - PULSEBOARD_SERIES_NAME
# - PULSEBOARD_API_HOST
# - PULSEBOARD_API_PORT
# - PULSEBOARD_POLL_INTERVAL_MS
# - PULSEBOARD_LOG_LEVEL
# - PULSEBOARD_LOG_FORMAT

[series]
# CSV file to watch (timestamp,value rows, appended by a collector)
csv_path = "samples.csv"

# Display name for the tracked series
name = "BTC/USD"

# Unit of measurement
unit = "USD"

# Display format: currency, count, or plain
format = "currency"

[watcher]
# How often to poll the CSV for appended rows (ms)
poll_interval_ms = 1000

# Upper bound for error backoff (seconds)
max_backoff_secs = 60

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8050

# Maximum concurrent WebSocket connections
max_ws_connections = 256

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_template_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.series.name, "BTC/USD");
        assert_eq!(config.series.format, ValueFormat::Currency);
        assert_eq!(config.api.port, 8050);
        assert_eq!(config.watcher.poll_interval_ms, 1000);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("[series]\ncsv_path = \"prices.csv\"\n").unwrap();

        assert_eq!(config.series.csv_path, "prices.csv");
        assert_eq!(config.series.name, "series");
        assert_eq!(config.api.port, 8050);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = 9000").unwrap();
        file.flush().unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9000);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not toml [").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
