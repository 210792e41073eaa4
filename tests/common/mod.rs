//! Fakes shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use tokio::sync::Notify;

use weather_page::controller::Clock;
use weather_page::models::Conditions;
use weather_page::{
    Coordinate, GeocodingProvider, PlaceDescriptor, Units, WeatherPageError, WeatherProvider,
    WeatherSnapshot,
};

pub const BERLIN: Coordinate = Coordinate {
    latitude: 52.52,
    longitude: 13.405,
};

pub const PARIS: Coordinate = Coordinate {
    latitude: 48.8566,
    longitude: 2.3522,
};

pub fn snapshot(temp: f64, description: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        clouds: 40.0,
        dew_point: 3.0,
        feels_like: temp - 1.0,
        humidity: 60.0,
        pressure: 1015.0,
        sunrise: 1_705_302_900_000,
        sunset: 1_705_332_600_000,
        temp,
        uvi: 1.2,
        visibility: Some(10_000.0),
        weather: Conditions {
            icon: "01d".to_string(),
            description: description.to_string(),
            main: "Clear".to_string(),
        },
        wind_deg: 180.0,
        wind_gust: None,
        wind_speed: 2.5,
        observed_at: 1_705_320_000_000,
        timezone: "Europe/Berlin".to_string(),
        units: Units::Metric,
    }
}

/// Clock pinned to 2024-01-15 12:00 UTC
pub fn fixed_clock() -> Clock {
    Arc::new(|| -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .and_then(|utc| utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).single())
            .expect("valid fixed time")
    })
}

/// Geocoder answering from a table, counting every call
#[derive(Default)]
pub struct FakeGeocoder {
    places: HashMap<String, Coordinate>,
    place_names: Vec<(Coordinate, String)>,
    pub forward_calls: AtomicUsize,
    pub reverse_calls: AtomicUsize,
    pub queries: std::sync::Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `query` is matched against the percent-encoded form the controller sends
    pub fn with_place(mut self, query: &str, coordinate: Coordinate) -> Self {
        self.places.insert(query.to_string(), coordinate);
        self
    }

    pub fn with_place_name(mut self, coordinate: Coordinate, place_name: &str) -> Self {
        self.place_names.push((coordinate, place_name.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst) + self.reverse_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodingProvider for FakeGeocoder {
    async fn geocode(&self, query: &str) -> weather_page::Result<Coordinate> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        self.places
            .get(query)
            .copied()
            .ok_or_else(|| WeatherPageError::no_results(query))
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> weather_page::Result<PlaceDescriptor> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        self.place_names
            .iter()
            .find(|(c, _)| *c == coordinate)
            .map(|(c, name)| PlaceDescriptor::new(name.clone(), *c))
            .ok_or_else(|| WeatherPageError::http_status("Failed Reverse Geocoding :(", 404))
    }
}

/// A weather answer that waits for the test to release it
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl Gate {
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

enum Answer {
    Snapshot(WeatherSnapshot),
    Status(u16),
}

/// Weather provider answering per coordinate, optionally held behind a gate
#[derive(Default)]
pub struct FakeWeather {
    answers: Vec<(Coordinate, Answer, Option<(Arc<Notify>, Arc<Notify>)>)>,
    pub calls: AtomicUsize,
}

impl FakeWeather {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, coordinate: Coordinate, snapshot: WeatherSnapshot) -> Self {
        self.answers.push((coordinate, Answer::Snapshot(snapshot), None));
        self
    }

    pub fn with_gated_snapshot(
        mut self,
        coordinate: Coordinate,
        snapshot: WeatherSnapshot,
        gate: &Gate,
    ) -> Self {
        self.answers.push((
            coordinate,
            Answer::Snapshot(snapshot),
            Some((gate.entered.clone(), gate.release.clone())),
        ));
        self
    }

    pub fn with_status(mut self, coordinate: Coordinate, status: u16) -> Self {
        self.answers.push((coordinate, Answer::Status(status), None));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn get_weather(
        &self,
        coordinate: Coordinate,
        _units: Units,
    ) -> weather_page::Result<WeatherSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some((_, answer, gate)) = self.answers.iter().find(|(c, _, _)| *c == coordinate)
        else {
            return Err(WeatherPageError::malformed("no weather for this coordinate"));
        };

        if let Some((entered, release)) = gate {
            entered.notify_one();
            release.notified().await;
        }

        match answer {
            Answer::Snapshot(snapshot) => Ok(snapshot.clone()),
            Answer::Status(status) => Err(WeatherPageError::http_status(
                "Something went wrong getting weather data!",
                *status,
            )),
        }
    }
}
