//! Forward and reverse geocoding against the Mapbox places API

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::http::{JsonFetcher, decode};
use crate::models::{Coordinate, PlaceDescriptor};
use crate::{Result, WeatherPageError};

const GEOCODE_ERROR_LABEL: &str = "Failed Geocoding!";
const REVERSE_GEOCODE_ERROR_LABEL: &str = "Failed Reverse Geocoding :(";

/// Text place names to coordinates and back
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Resolve a free-text place name to the best matching coordinate.
    ///
    /// `query` goes into the request path as-is. Reserved URL characters
    /// must be escaped by the caller.
    async fn geocode(&self, query: &str) -> Result<Coordinate>;

    /// Resolve a coordinate to the provider's place descriptor
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<PlaceDescriptor>;
}

/// Mapbox geocoding client
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    fetcher: JsonFetcher,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `[longitude, latitude]`
    center: Option<[f64; 2]>,
    place_name: Option<String>,
}

impl MapboxGeocoder {
    pub fn new(
        fetcher: JsonFetcher,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn forward_url(&self, query: &str) -> String {
        format!(
            "{}/{}.json?access_token={}",
            self.base_url, query, self.access_token
        )
    }

    fn reverse_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/{},{}.json?access_token={}",
            self.base_url, coordinate.longitude, coordinate.latitude, self.access_token
        )
    }

    fn first_feature(collection: FeatureCollection, query: &str) -> Result<Feature> {
        collection.features.into_iter().next().ok_or_else(|| {
            warn!("No results found for '{}'", query);
            WeatherPageError::no_results(query)
        })
    }
}

#[async_trait]
impl GeocodingProvider for MapboxGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Coordinate> {
        info!("Geocoding location: '{}'", query);

        let body = self
            .fetcher
            .fetch_json(&self.forward_url(query), GEOCODE_ERROR_LABEL)
            .await?;
        let collection: FeatureCollection = decode(body, "geocoding response")?;
        debug!("Geocoding returned {} features", collection.features.len());

        let feature = Self::first_feature(collection, query)?;
        let center = feature
            .center
            .ok_or_else(|| WeatherPageError::malformed("geocoding feature has no center"))?;

        let coordinate = Coordinate::from_lon_lat(center);
        info!(
            "Found location for '{}': {}",
            query,
            coordinate.format_coordinates()
        );
        Ok(coordinate)
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<PlaceDescriptor> {
        info!(
            "Reverse geocoding coordinates: {}",
            coordinate.format_coordinates()
        );

        let body = self
            .fetcher
            .fetch_json(&self.reverse_url(coordinate), REVERSE_GEOCODE_ERROR_LABEL)
            .await?;
        let collection: FeatureCollection = decode(body, "reverse geocoding response")?;

        let feature = Self::first_feature(collection, &coordinate.format_coordinates())?;
        let place_name = feature.place_name.ok_or_else(|| {
            WeatherPageError::malformed("reverse geocoding feature has no place_name")
        })?;

        info!("Reverse geocoded to: {}", place_name);
        Ok(PlaceDescriptor::new(place_name, coordinate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geocoder() -> MapboxGeocoder {
        MapboxGeocoder::new(
            JsonFetcher::new(),
            "https://api.mapbox.com/geocoding/v5/mapbox.places/",
            "pk.test",
        )
    }

    #[test]
    fn test_forward_url_interpolates_query_verbatim() {
        assert_eq!(
            geocoder().forward_url("Berlin"),
            "https://api.mapbox.com/geocoding/v5/mapbox.places/Berlin.json?access_token=pk.test"
        );
    }

    #[test]
    fn test_reverse_url_uses_lon_lat_order() {
        let url = geocoder().reverse_url(Coordinate::new(52.52, 13.405));
        assert_eq!(
            url,
            "https://api.mapbox.com/geocoding/v5/mapbox.places/13.405,52.52.json?access_token=pk.test"
        );
    }

    #[test]
    fn test_first_feature_on_empty_collection() {
        let collection = FeatureCollection {
            features: Vec::new(),
        };
        let err = MapboxGeocoder::first_feature(collection, "atlantis").unwrap_err();
        assert!(matches!(err, WeatherPageError::NoResults { query } if query == "atlantis"));
    }
}
