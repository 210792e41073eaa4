//! One-shot "where am I" capability
//!
//! The page has no GPS of its own: the position is either reported by the
//! browser, pinned in configuration, or unavailable.

use async_trait::async_trait;
use tracing::debug;

use crate::models::Coordinate;
use crate::{Result, WeatherPageError};

#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Resolve the device position, or fail with
    /// [`WeatherPageError::GeolocationDenied`]
    async fn current_position(&self) -> Result<Coordinate>;
}

/// Always answers with the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinate);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinate> {
        Ok(self.0)
    }
}

/// Always fails, e.g. when the user declined the permission prompt
#[derive(Debug, Clone)]
pub struct UnavailableGeolocator {
    reason: String,
}

impl UnavailableGeolocator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Geolocator for UnavailableGeolocator {
    async fn current_position(&self) -> Result<Coordinate> {
        Err(WeatherPageError::GeolocationDenied(self.reason.clone()))
    }
}

/// Position as reported by a client, with an optional configured fallback
#[derive(Debug, Clone, Default)]
pub struct ReportedPosition {
    pub reported: Option<Coordinate>,
    /// Why the client could not report a position, if it said so
    pub denial: Option<String>,
    pub fallback: Option<Coordinate>,
}

#[async_trait]
impl Geolocator for ReportedPosition {
    async fn current_position(&self) -> Result<Coordinate> {
        if let Some(coordinate) = self.reported {
            return Ok(coordinate);
        }
        if let Some(fallback) = self.fallback {
            debug!(
                "No reported position, using configured location {}",
                fallback.format_coordinates()
            );
            return Ok(fallback);
        }
        Err(WeatherPageError::GeolocationDenied(
            self.denial
                .clone()
                .unwrap_or_else(|| "no position reported".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reported_position_wins() {
        let position = ReportedPosition {
            reported: Some(Coordinate::new(1.0, 2.0)),
            denial: None,
            fallback: Some(Coordinate::new(3.0, 4.0)),
        };
        assert_eq!(
            position.current_position().await.unwrap(),
            Coordinate::new(1.0, 2.0)
        );
    }

    #[tokio::test]
    async fn test_fallback_used_when_nothing_reported() {
        let position = ReportedPosition {
            denial: Some("User denied Geolocation".to_string()),
            fallback: Some(Coordinate::new(3.0, 4.0)),
            ..Default::default()
        };
        assert_eq!(
            position.current_position().await.unwrap(),
            Coordinate::new(3.0, 4.0)
        );
    }

    #[tokio::test]
    async fn test_denial_without_fallback() {
        let position = ReportedPosition {
            denial: Some("User denied Geolocation".to_string()),
            ..Default::default()
        };
        let err = position.current_position().await.unwrap_err();
        assert!(matches!(err, WeatherPageError::GeolocationDenied(reason) if reason.contains("denied")));
    }

    #[tokio::test]
    async fn test_unavailable_always_fails() {
        let err = UnavailableGeolocator::new("no device")
            .current_position()
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
    }
}
