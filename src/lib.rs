//! Weather page
//!
//! Locates the user (or takes a searched city), resolves a place name through
//! Mapbox, fetches current conditions from the OpenWeather One Call API and
//! renders them into the regions of an HTML page.

pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod geocoding;
pub mod geolocation;
pub mod http;
pub mod models;
pub mod telemetry;
pub mod view;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::AppConfig;
pub use controller::{FlowOutcome, PageController, PageState, SequencePolicy};
pub use error::{ErrorKind, WeatherPageError};
pub use format::{Formatter, Locale};
pub use geocoding::{GeocodingProvider, MapboxGeocoder};
pub use geolocation::{FixedGeolocator, Geolocator, ReportedPosition, UnavailableGeolocator};
pub use http::JsonFetcher;
pub use models::{Coordinate, PlaceDescriptor, Units, WeatherSnapshot};
pub use view::{HtmlPage, Region, ViewPort};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherPageError>;
