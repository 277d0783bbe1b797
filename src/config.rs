//! Configuration management for `WeatherCast`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherCastError;
use crate::aggregation::DEFAULT_HORIZON_DAYS;
use crate::models::Units;
use crate::openweather::{DEFAULT_GEOCODING_BASE_URL, DEFAULT_WEATHER_BASE_URL};
use crate::simulation::DEFAULT_BASE_TEMPERATURE;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `WeatherCast` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeatherCastConfig {
    /// Weather API configuration
    pub api: ApiConfig,
    /// Default dashboard settings
    pub defaults: DefaultsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Favorites storage
    pub favorites: FavoritesConfig,
}

/// Weather and geocoding API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL of the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Base URL of the weather API
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Default dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Country code appended to city searches; empty disables the bias
    #[serde(default = "default_country_bias")]
    pub country_bias: Option<String>,
    /// Unit system for fetched data
    #[serde(default)]
    pub units: Units,
    /// Number of forecast days shown
    #[serde(default = "default_horizon_days")]
    pub horizon_days: usize,
    /// Base temperature for simulated days when no real day exists
    #[serde(default = "default_fallback_base_temperature")]
    pub fallback_base_temperature: f64,
    /// City loaded when no location is given
    #[serde(default = "default_city")]
    pub default_city: String,
    /// Maximum number of autocomplete suggestions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Favorites storage settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FavoritesConfig {
    /// JSON file holding the favorite cities
    pub path: Option<PathBuf>,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    DEFAULT_GEOCODING_BASE_URL.to_string()
}

fn default_weather_base_url() -> String {
    DEFAULT_WEATHER_BASE_URL.to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_country_bias() -> Option<String> {
    Some("IN".to_string())
}

fn default_horizon_days() -> usize {
    DEFAULT_HORIZON_DAYS
}

fn default_fallback_base_temperature() -> f64 {
    DEFAULT_BASE_TEMPERATURE
}

fn default_city() -> String {
    "London".to_string()
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            geocoding_base_url: default_geocoding_base_url(),
            weather_base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country_bias: default_country_bias(),
            units: Units::default(),
            horizon_days: default_horizon_days(),
            fallback_base_temperature: default_fallback_base_temperature(),
            default_city: default_city(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WeatherCastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // e.g. WEATHERCAST__API__API_KEY, WEATHERCAST__DEFAULTS__UNITS
        builder = builder.add_source(
            Environment::with_prefix("WEATHERCAST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherCastConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weathercast").join("config.toml"))
    }

    /// Favorites file, falling back to the platform config directory
    #[must_use]
    pub fn favorites_path(&self) -> PathBuf {
        self.favorites.path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("weathercast")
                .join("favorites.json")
        })
    }

    /// Country bias with empty values treated as "no bias"
    #[must_use]
    pub fn country_bias(&self) -> Option<&str> {
        self.defaults
            .country_bias
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Replace blank string settings with their defaults
    pub fn apply_defaults(&mut self) {
        if self.api.geocoding_base_url.is_empty() {
            self.api.geocoding_base_url = default_geocoding_base_url();
        }
        if self.api.weather_base_url.is_empty() {
            self.api.weather_base_url = default_weather_base_url();
        }
        if self.defaults.default_city.trim().is_empty() {
            self.defaults.default_city = default_city();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// An API key, when present, must not be blank
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.api.api_key {
            if api_key.trim().is_empty() {
                return Err(WeatherCastError::config(
                    "API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 120 {
            return Err(
                WeatherCastError::config("API timeout must be between 1 and 120 seconds").into(),
            );
        }

        if self.defaults.horizon_days == 0 || self.defaults.horizon_days > 16 {
            return Err(
                WeatherCastError::config("Forecast horizon must be between 1 and 16 days").into(),
            );
        }

        if self.defaults.suggestion_limit == 0 || self.defaults.suggestion_limit > 10 {
            return Err(
                WeatherCastError::config("Suggestion limit must be between 1 and 10").into(),
            );
        }

        if !self.defaults.fallback_base_temperature.is_finite() {
            return Err(
                WeatherCastError::config("Fallback base temperature must be a finite number")
                    .into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherCastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherCastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for url in [&self.api.geocoding_base_url, &self.api.weather_base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherCastError::config(format!(
                    "API base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        if let Some(country) = self.country_bias() {
            if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(WeatherCastError::config(format!(
                    "Country bias must be a two-letter country code, got '{country}'"
                ))
                .into());
            }
        }

        Ok(())
    }
}
