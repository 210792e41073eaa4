//! Data models for the weather page
//!
//! All values are request-scoped: built per fetch and dropped after render.
//! - Location: coordinates, place descriptors and label helpers
//! - Weather: the normalized weather snapshot

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinate, PlaceDescriptor, capitalize_label, city_from_place_name};
pub use weather::{Conditions, Units, WeatherSnapshot};
