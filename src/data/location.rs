//! IP geolocation client
//!
//! Resolves the user's approximate location from their public IP address via
//! ip-api.com and normalizes it into [`Coordinates`].

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::Coordinates;
use crate::fetch::{FetchError, Fetcher};

/// Geolocation endpoint; answers for the caller's own IP address
pub const IP_API_ADDRESS: &str = "http://ip-api.com/json";

/// Default timeout for the geolocation call
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when resolving the current location
#[derive(Debug, Error)]
pub enum LocationError {
    /// HTTP request failed or timed out
    #[error("The geolocation service could not be reached: {0}")]
    Fetch(#[from] FetchError),

    /// Failed to parse JSON response
    #[error("Failed to parse geolocation response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The provider answered but could not place the caller
    #[error("The geolocation service could not resolve your coordinates: {0}")]
    Failed(String),
}

/// Response body from ip-api.com
#[derive(Debug, Deserialize)]
struct GeoData {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    city: String,
    #[serde(default)]
    zip: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

/// Client for the IP geolocation provider
#[derive(Debug, Clone)]
pub struct LocationResolver {
    fetcher: Arc<dyn Fetcher>,
    address: String,
    timeout: Duration,
}

impl LocationResolver {
    /// Creates a resolver for the default endpoint
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            address: IP_API_ADDRESS.to_string(),
            timeout: LOCATION_TIMEOUT,
        }
    }

    /// Overrides the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves the caller's current coordinates
    pub async fn resolve(&self) -> Result<Coordinates, LocationError> {
        let body = self.fetcher.fetch(&self.address, self.timeout, false).await?;
        let coordinates = parse_response(&body)?;
        debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "location resolved"
        );
        Ok(coordinates)
    }
}

/// Parses an ip-api.com body into normalized coordinates
fn parse_response(body: &[u8]) -> Result<Coordinates, LocationError> {
    let data: GeoData = serde_json::from_slice(body)?;

    if data.status == "fail" {
        return Err(LocationError::Failed(
            data.message.unwrap_or_else(|| "unknown reason".to_string()),
        ));
    }

    Ok(Coordinates::new(data.lat, data.lon, data.city, data.zip))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_RESPONSE: &str = r#"{
        "status": "success",
        "country": "United States",
        "countryCode": "US",
        "region": "CA",
        "regionName": "California",
        "city": "Santa Monica",
        "zip": "90401",
        "lat": 34.030899,
        "lon": -118.4730,
        "timezone": "America/Los_Angeles",
        "isp": "Example ISP",
        "org": "Example Org",
        "as": "AS0000 Example",
        "query": "203.0.113.7"
    }"#;

    #[test]
    fn test_parse_success_normalizes_coordinates() {
        let coordinates = parse_response(SUCCESS_RESPONSE.as_bytes()).expect("Should parse");

        assert_eq!(coordinates.latitude, 34.0308);
        assert_eq!(coordinates.longitude, -118.473);
        assert_eq!(coordinates.city, "Santa Monica");
        assert_eq!(coordinates.postal_code, "90401");
    }

    #[test]
    fn test_parse_fail_status_is_error() {
        let body = r#"{"status": "fail", "message": "reserved range", "query": "127.0.0.1"}"#;

        match parse_response(body.as_bytes()) {
            Err(LocationError::Failed(message)) => assert_eq!(message, "reserved range"),
            other => panic!("Expected Failed error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_fail_without_message() {
        let body = r#"{"status": "fail"}"#;
        let err = parse_response(body.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("unknown reason"));
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = parse_response(b"{ invalid json }");
        assert!(matches!(result, Err(LocationError::Parse(_))));
    }
}
