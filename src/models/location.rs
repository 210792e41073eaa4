//! Coordinate and place models

use serde::{Deserialize, Serialize};

use crate::WeatherPageError;

/// A (latitude, longitude) pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a coordinate from the provider's `[longitude, latitude]` ordering
    #[must_use]
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Create a coordinate after range-checking both components
    pub fn checked(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherPageError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherPageError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Format as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Result of a reverse geocode
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceDescriptor {
    /// Comma-delimited hierarchical name as returned by the provider
    pub place_name: String,
    pub coordinate: Coordinate,
}

impl PlaceDescriptor {
    /// Shown when the place name is too short to carry a city segment
    pub const UNKNOWN_CITY: &'static str = "Unknown";

    #[must_use]
    pub fn new(place_name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            place_name: place_name.into(),
            coordinate,
        }
    }

    /// The display city: the third comma segment of the place name
    #[must_use]
    pub fn city(&self) -> &str {
        city_from_place_name(&self.place_name)
    }
}

/// Extract the third comma-delimited segment of a place name.
///
/// Names with fewer than three segments (or an empty third one) yield
/// [`PlaceDescriptor::UNKNOWN_CITY`].
#[must_use]
pub fn city_from_place_name(place_name: &str) -> &str {
    place_name
        .split(',')
        .nth(2)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .unwrap_or(PlaceDescriptor::UNKNOWN_CITY)
}

/// Capitalize the first character and lower-case the rest, for search labels
#[must_use]
pub fn capitalize_label(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
