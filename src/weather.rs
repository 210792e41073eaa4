//! Current conditions from the OpenWeather One Call API

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::http::{JsonFetcher, decode};
use crate::models::{Coordinate, Units, WeatherSnapshot};
use crate::Result;

const WEATHER_ERROR_LABEL: &str = "Something went wrong getting weather data!";

/// Source of current weather for a coordinate
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn get_weather(&self, coordinate: Coordinate, units: Units) -> Result<WeatherSnapshot>;
}

/// OpenWeather One Call client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    fetcher: JsonFetcher,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(
        fetcher: JsonFetcher,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn onecall_url(&self, coordinate: Coordinate, units: Units) -> String {
        format!(
            "{}/onecall?lat={}&lon={}&units={}&appid={}",
            self.base_url,
            coordinate.latitude,
            coordinate.longitude,
            units.as_query(),
            self.api_key
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn get_weather(&self, coordinate: Coordinate, units: Units) -> Result<WeatherSnapshot> {
        info!(
            "Getting current weather for coordinates: {}",
            coordinate.format_coordinates()
        );

        let body = self
            .fetcher
            .fetch_json(&self.onecall_url(coordinate, units), WEATHER_ERROR_LABEL)
            .await?;
        let response: onecall::OneCallResponse = decode(body, "weather response")?;
        let snapshot = response.into_snapshot(units)?;

        info!(
            "Current weather: {} at {}",
            snapshot.weather.description, snapshot.temp
        );
        Ok(snapshot)
    }
}

/// One Call API response structures and conversion
mod onecall {
    use serde::Deserialize;

    use crate::models::{Conditions, Units, WeatherSnapshot};
    use crate::{Result, WeatherPageError};

    #[derive(Debug, Deserialize)]
    pub struct OneCallResponse {
        pub timezone: String,
        pub current: Current,
    }

    /// The `current` block; instants are unix seconds
    #[derive(Debug, Deserialize)]
    pub struct Current {
        pub dt: i64,
        pub sunrise: i64,
        pub sunset: i64,
        pub temp: f64,
        pub feels_like: f64,
        pub pressure: f64,
        pub humidity: f64,
        pub dew_point: f64,
        pub uvi: f64,
        pub clouds: f64,
        pub visibility: Option<f64>,
        pub wind_speed: f64,
        pub wind_deg: f64,
        pub wind_gust: Option<f64>,
        pub weather: Vec<WeatherEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct WeatherEntry {
        pub main: String,
        pub description: String,
        pub icon: String,
    }

    impl OneCallResponse {
        pub fn into_snapshot(self, units: Units) -> Result<WeatherSnapshot> {
            let current = self.current;
            let entry = current.weather.into_iter().next().ok_or_else(|| {
                WeatherPageError::malformed("current.weather has no entries")
            })?;

            Ok(WeatherSnapshot {
                clouds: current.clouds,
                dew_point: current.dew_point,
                feels_like: current.feels_like,
                humidity: current.humidity,
                pressure: current.pressure,
                sunrise: current.sunrise * 1000,
                sunset: current.sunset * 1000,
                temp: current.temp,
                uvi: current.uvi,
                visibility: current.visibility,
                weather: Conditions {
                    icon: entry.icon,
                    description: entry.description,
                    main: entry.main,
                },
                wind_deg: current.wind_deg,
                wind_gust: current.wind_gust,
                wind_speed: current.wind_speed,
                observed_at: current.dt * 1000,
                timezone: self.timezone,
                units,
            })
        }
    }
}
