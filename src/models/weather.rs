//! Weather snapshot model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Measurement system requested from the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value of the provider's `units` query parameter
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl std::str::FromStr for Units {
    type Err = crate::WeatherPageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(crate::WeatherPageError::validation(format!(
                "Unknown units '{other}'. Must be one of: metric, imperial"
            ))),
        }
    }
}

/// Summary of the sky, taken from the provider's first `weather` entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Conditions {
    /// Provider icon code, e.g. `04d`
    pub icon: String,
    pub description: String,
    pub main: String,
}

impl Conditions {
    /// Image URL for the provider icon
    #[must_use]
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

/// A single point-in-time normalized weather reading.
///
/// Instants are unix epoch milliseconds. Temperatures and speeds are in
/// whatever `units` the snapshot was fetched with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Cloudiness in percent
    pub clouds: f64,
    pub dew_point: f64,
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Pressure in hPa
    pub pressure: f64,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: f64,
    pub uvi: f64,
    /// Visibility in metres
    pub visibility: Option<f64>,
    pub weather: Conditions,
    /// Wind direction in degrees (meteorological)
    pub wind_deg: f64,
    pub wind_gust: Option<f64>,
    pub wind_speed: f64,
    /// Time of the observation
    pub observed_at: i64,
    /// IANA zone name of the location, e.g. `Europe/Berlin`
    pub timezone: String,
    pub units: Units,
}

impl WeatherSnapshot {
    #[must_use]
    pub fn sunrise_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.sunrise)
    }

    #[must_use]
    pub fn sunset_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.sunset)
    }

    /// Location time zone, falling back to UTC for names chrono-tz does not know
    #[must_use]
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}

#[cfg(test)]
pub(crate) fn sample_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        clouds: 75.0,
        dew_point: 1.5,
        feels_like: 2.0,
        humidity: 50.0,
        pressure: 1013.0,
        sunrise: 1_705_302_900_000,
        sunset: 1_705_332_600_000,
        temp: 5.5,
        uvi: 0.4,
        visibility: Some(10_000.0),
        weather: Conditions {
            icon: "04d".to_string(),
            description: "broken clouds".to_string(),
            main: "Clouds".to_string(),
        },
        wind_deg: 225.0,
        wind_gust: Some(9.1),
        wind_speed: 3.6,
        observed_at: 1_705_320_000_000,
        timezone: "Europe/Berlin".to_string(),
        units: Units::Metric,
    }
}
