//! Configuration management for the weather page
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings. Provider
//! credentials only ever come from here, never from source.

use crate::format::Locale;
use crate::models::{Coordinate, Units};
use crate::{Result, WeatherPageError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Geocoding and weather provider settings
    pub providers: ProvidersConfig,
    /// Display settings
    pub display: DisplayConfig,
    /// Fallback position when the platform reports none
    pub location: LocationConfig,
    /// Web server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Provider endpoints and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Base URL of the Mapbox places endpoint
    pub geocoding_base_url: String,
    /// Base URL of the OpenWeather One Call API
    pub weather_base_url: String,
    /// Mapbox access token
    pub mapbox_access_token: Option<String>,
    /// OpenWeather API key
    pub openweather_api_key: Option<String>,
    /// Measurement system requested from the weather provider
    pub units: Units,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Locale tag used for numbers and dates (en-US, en-GB, de-DE, fr-FR)
    pub locale: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://api.mapbox.com/geocoding/v5/mapbox.places".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/3.0".to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: default_geocoding_base_url(),
            weather_base_url: default_weather_base_url(),
            mapbox_access_token: None,
            openweather_api_key: None,
            units: Units::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
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

impl AppConfig {
    /// Environment variable prefix, e.g. `WEATHER_PAGE_PROVIDERS__UNITS`
    pub const ENV_PREFIX: &'static str = "WEATHER_PAGE";

    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        builder = builder.add_source(
            Environment::with_prefix(Self::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().map_err(|e| {
            WeatherPageError::config(format!("Failed to build configuration: {e}"))
        })?;

        let mut config: AppConfig = settings.try_deserialize().map_err(|e| {
            WeatherPageError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-page").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.providers.geocoding_base_url.is_empty() {
            self.providers.geocoding_base_url = default_geocoding_base_url();
        }
        if self.providers.weather_base_url.is_empty() {
            self.providers.weather_base_url = default_weather_base_url();
        }
        if self.display.locale.is_empty() {
            self.display.locale = default_locale();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
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
        self.validate_credentials_shape()?;
        self.validate_string_values()?;
        self.validate_location()?;
        Ok(())
    }

    /// Credentials are optional until a flow needs them, but if present they
    /// must not be blank.
    fn validate_credentials_shape(&self) -> Result<()> {
        let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());

        if blank(&self.providers.mapbox_access_token) {
            return Err(WeatherPageError::config(
                "Mapbox access token cannot be empty if provided. Either remove it or provide a valid token.",
            ));
        }
        if blank(&self.providers.openweather_api_key) {
            return Err(WeatherPageError::config(
                "OpenWeather API key cannot be empty if provided. Either remove it or provide a valid key.",
            ));
        }
        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherPageError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherPageError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("Geocoding", &self.providers.geocoding_base_url),
            ("Weather", &self.providers.weather_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherPageError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        self.locale()?;
        Ok(())
    }

    fn validate_location(&self) -> Result<()> {
        match (self.location.latitude, self.location.longitude) {
            (None, None) => Ok(()),
            (Some(lat), Some(lon)) => Coordinate::checked(lat, lon)
                .map(|_| ())
                .map_err(|e| WeatherPageError::config(format!("Invalid fallback location: {e}"))),
            _ => Err(WeatherPageError::config(
                "Fallback location needs both latitude and longitude",
            )),
        }
    }

    /// Parsed display locale
    pub fn locale(&self) -> Result<Locale> {
        self.display
            .locale
            .parse()
            .map_err(|e: WeatherPageError| WeatherPageError::config(e.to_string()))
    }

    /// Configured fallback position, if both components are set
    #[must_use]
    pub fn fallback_location(&self) -> Option<Coordinate> {
        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    /// The Mapbox token and OpenWeather key, or a configuration error naming
    /// the missing one
    pub fn require_credentials(&self) -> Result<(String, String)> {
        let token = self.providers.mapbox_access_token.clone().ok_or_else(|| {
            WeatherPageError::config(format!(
                "Missing Mapbox access token. Set providers.mapbox_access_token or {}_PROVIDERS__MAPBOX_ACCESS_TOKEN",
                Self::ENV_PREFIX
            ))
        })?;
        let key = self.providers.openweather_api_key.clone().ok_or_else(|| {
            WeatherPageError::config(format!(
                "Missing OpenWeather API key. Set providers.openweather_api_key or {}_PROVIDERS__OPENWEATHER_API_KEY",
                Self::ENV_PREFIX
            ))
        })?;
        Ok((token, key))
    }
}
