//! Core data models and provider clients for vaporwair
//!
//! This module contains the location and call-record types shared by the
//! orchestrator and the cache, plus one client per remote provider.

pub mod air;
pub mod location;
pub mod weather;

pub use air::{AirClient, AirError, AirForecast, AirReading};
pub use location::{LocationError, LocationResolver};
pub use weather::{WeatherClient, WeatherError, WeatherForecast};

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of decimal places kept when normalizing coordinates
pub const COORDINATE_PRECISION: usize = 4;

/// A resolved user location
///
/// Latitude and longitude are normalized with [`normalize_degrees`] before
/// construction, so two lookups of the same place compare exactly equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// City reported by the geolocation provider
    pub city: String,
    /// Postal code reported by the geolocation provider
    pub postal_code: String,
}

impl Coordinates {
    /// Creates coordinates, normalizing latitude and longitude
    pub fn new(
        latitude: f64,
        longitude: f64,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            latitude: normalize_degrees(latitude),
            longitude: normalize_degrees(longitude),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Whether both coordinates point at the same place.
    ///
    /// Only latitude and longitude take part; the labels are informational.
    pub fn same_location(&self, other: &Coordinates) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

/// Truncates a coordinate to [`COORDINATE_PRECISION`] decimal places.
///
/// Cuts the shortest decimal rendering of `value` after the kept digits, so
/// 34.0308 is not pulled down to 34.0307 by binary rounding and 34.0308996 is
/// not rounded up to 34.0309.
pub fn normalize_degrees(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let rendered = value.to_string();
    let end = match rendered.find('.') {
        Some(dot) => (dot + 1 + COORDINATE_PRECISION).min(rendered.len()),
        None => return value,
    };
    rendered[..end].parse().unwrap_or(value)
}

/// The most recent successful forecast acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// When the forecasts were fetched
    pub timestamp: DateTime<Utc>,
    /// Where the forecasts were fetched for
    pub coordinates: Coordinates,
}

impl CallRecord {
    pub fn new(timestamp: DateTime<Utc>, coordinates: Coordinates) -> Self {
        Self {
            timestamp,
            coordinates,
        }
    }

    /// Time elapsed since the record was written; records from the future count as new
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether the cached forecasts are young enough to be served without a network call
    pub fn is_fresh(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        self.age(now) < timeout
    }
}
