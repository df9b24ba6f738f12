use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/lookaround/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("lookaround").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Every timeout and interval is non-zero
    /// - The places radius is a positive finite number
    /// - The recent searches page size is non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timing = &self.timing;
        let durations = [
            ("scene_loading_timeout_ms", timing.scene_loading_timeout_ms),
            ("location_update_interval_ms", timing.location_update_interval_ms),
            ("places_loading_timeout_ms", timing.places_loading_timeout_ms),
            (
                "location_availability_poll_ms",
                timing.location_availability_poll_ms,
            ),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ValidationError {
                message: format!("timing.{} must be greater than zero", name),
            });
        }

        let radius = self.search.places_radius_m;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::ValidationError {
                message: format!("search.places_radius_m must be positive, got {}", radius),
            });
        }

        if self.search.recent_searches_page_size == 0 {
            return Err(ConfigError::ValidationError {
                message: "search.recent_searches_page_size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
