//! Dark Sky weather API client
//!
//! This module provides functionality to fetch a full forecast (current
//! conditions, hourly and daily series, alerts) from the Dark Sky API and parse
//! it into our WeatherForecast structure. The provider answers with a gzip
//! encoded body, which the client inflates before decoding.

use std::sync::Arc;
use std::time::Duration;

use async_compression::tokio::bufread::GzipDecoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncReadExt;

use super::Coordinates;
use crate::fetch::{FetchError, Fetcher};

/// Base URL for the Dark Sky API
pub const DARK_SKY_ADDRESS: &str = "https://api.darksky.net/forecast/";

/// Default timeout for forecast calls; payloads are large
pub const FORECAST_TIMEOUT: Duration = Duration::from_secs(10);

/// Leading bytes of every gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed or timed out
    #[error("Weather request failed: {0}")]
    Fetch(#[from] FetchError),

    /// The gzip body could not be inflated
    #[error("Failed to decompress weather response: {0}")]
    Decompress(#[source] std::io::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single observation or prediction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataPoint {
    /// Unix time the point refers to
    pub time: i64,
    pub summary: String,
    pub icon: String,
    pub sunrise_time: i64,
    pub sunset_time: i64,
    pub precip_intensity: f64,
    pub precip_intensity_max: f64,
    pub precip_intensity_max_time: i64,
    /// Probability of precipitation, 0 to 1
    pub precip_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precip_type: Option<String>,
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_min_time: i64,
    pub temperature_max: f64,
    pub temperature_max_time: i64,
    pub apparent_temperature: f64,
    pub dew_point: f64,
    /// Relative humidity, 0 to 1
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_bearing: f64,
    pub cloud_cover: f64,
    pub uv_index: f64,
    pub visibility: f64,
    pub ozone: f64,
    pub moon_phase: f64,
}

/// A series of data points with a summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataBlock {
    pub summary: String,
    pub icon: String,
    pub data: Vec<DataPoint>,
}

/// A severe weather warning issued for the location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub title: String,
    pub description: String,
    pub time: i64,
    pub expires: i64,
    pub uri: String,
}

/// Metadata about the request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    /// Unit system the values are expressed in, e.g. "us" or "si"
    pub units: String,
    pub sources: Vec<String>,
}

/// Complete forecast for one location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherForecast {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    /// Offset from UTC in hours
    pub offset: f64,
    pub currently: DataPoint,
    pub minutely: DataBlock,
    pub hourly: DataBlock,
    pub daily: DataBlock,
    pub alerts: Vec<Alert>,
    pub flags: Flags,
}

/// Client for fetching forecasts from the Dark Sky API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    fetcher: Arc<dyn Fetcher>,
    api_key: String,
    units: String,
    timeout: Duration,
}

impl WeatherClient {
    /// Create a new WeatherClient for the given key and unit system
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        api_key: impl Into<String>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            api_key: api_key.into(),
            units: units.into(),
            timeout: FORECAST_TIMEOUT,
        }
    }

    /// Overrides the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the request URL for the given coordinates
    pub fn build_url(&self, coordinates: &Coordinates) -> String {
        DARK_SKY_ADDRESS.to_string()
            + &self.api_key
            + "/"
            + &coordinates.latitude.to_string()
            + ","
            + &coordinates.longitude.to_string()
            + "?units="
            + &self.units
    }

    /// Fetch the forecast for the given coordinates
    ///
    /// # Returns
    /// * `Ok(WeatherForecast)` - Forecast for the location
    /// * `Err(WeatherError)` - If the request, decompression or parsing fails
    pub async fn fetch_forecast(
        &self,
        coordinates: &Coordinates,
    ) -> Result<WeatherForecast, WeatherError> {
        let url = self.build_url(coordinates);
        let body = self.fetcher.fetch(&url, self.timeout, true).await?;
        let body = decompress(body).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Inflates a gzip body; anything without the gzip header is passed through
async fn decompress(body: Vec<u8>) -> Result<Vec<u8>, WeatherError> {
    if !body.starts_with(&GZIP_MAGIC) {
        return Ok(body);
    }

    let mut decoder = GzipDecoder::new(body.as_slice());
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .await
        .map_err(WeatherError::Decompress)?;
    Ok(inflated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::bufread::GzipEncoder;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const FIXTURE: &str = include_str!("../../tests/fixtures/darksky.json");

    /// Fetcher that answers every request with the same body
    #[derive(Debug)]
    struct FixedFetcher {
        body: Vec<u8>,
        requests: Mutex<Vec<(String, bool)>>,
    }

    impl FixedFetcher {
        fn new(body: Vec<u8>) -> Arc<Self> {
            Arc::new(Self {
                body,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Fetcher for FixedFetcher {
        async fn fetch(
            &self,
            url: &str,
            _timeout: Duration,
            compressed: bool,
        ) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push((url.to_string(), compressed));
            Ok(self.body.clone())
        }
    }

    async fn gzip(raw: &[u8]) -> Vec<u8> {
        let mut encoder = GzipEncoder::new(raw);
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await.unwrap();
        compressed
    }

    fn coordinates() -> Coordinates {
        Coordinates::new(34.0308, -118.473, "Santa Monica", "90401")
    }

    #[test]
    fn test_build_url() {
        let client = WeatherClient::new(FixedFetcher::new(Vec::new()), "KEY", "auto");
        assert_eq!(
            client.build_url(&coordinates()),
            "https://api.darksky.net/forecast/KEY/34.0308,-118.473?units=auto"
        );
    }

    #[test]
    fn test_parse_fixture() {
        let forecast: WeatherForecast =
            serde_json::from_str(FIXTURE).expect("Failed to parse fixture");

        assert_eq!(forecast.timezone, "America/Los_Angeles");
        assert_eq!(forecast.offset, -7.0);
        assert!((forecast.currently.temperature - 71.6).abs() < 0.01);
        assert_eq!(forecast.hourly.data.len(), 3);
        assert_eq!(forecast.daily.data.len(), 2);
        assert_eq!(forecast.daily.data[0].precip_type.as_deref(), Some("rain"));
        assert_eq!(forecast.daily.data[1].precip_type, None);
        assert_eq!(forecast.alerts.len(), 1);
        assert_eq!(forecast.flags.units, "us");
        assert!(forecast.minutely.data.is_empty(), "missing blocks default to empty");
    }

    #[tokio::test]
    async fn test_fetch_forecast_inflates_gzip_body() {
        let fetcher = FixedFetcher::new(gzip(FIXTURE.as_bytes()).await);
        let client = WeatherClient::new(fetcher.clone(), "KEY", "us");

        let forecast = client
            .fetch_forecast(&coordinates())
            .await
            .expect("Should decode gzip body");

        assert_eq!(forecast.latitude, 34.0308);
        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].1, "weather calls ask for compressed transfer");
    }

    #[tokio::test]
    async fn test_fetch_forecast_accepts_plain_body() {
        let fetcher = FixedFetcher::new(FIXTURE.as_bytes().to_vec());
        let client = WeatherClient::new(fetcher, "KEY", "us");
        let forecast = client.fetch_forecast(&coordinates()).await.expect("Should decode");
        assert_eq!(forecast.hourly.data.len(), 3);
    }

    #[tokio::test]
    async fn test_truncated_gzip_body_is_decompress_error() {
        let mut body = gzip(FIXTURE.as_bytes()).await;
        body.truncate(body.len() / 2);
        let client = WeatherClient::new(FixedFetcher::new(body), "KEY", "us");

        let result = client.fetch_forecast(&coordinates()).await;
        assert!(matches!(result, Err(WeatherError::Decompress(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let fetcher = FixedFetcher::new(b"{ invalid json }".to_vec());
        let client = WeatherClient::new(fetcher, "KEY", "us");
        let result = client.fetch_forecast(&coordinates()).await;
        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }

    #[test]
    fn test_weather_forecast_serialization_roundtrip() {
        let forecast: WeatherForecast =
            serde_json::from_str(FIXTURE).expect("Failed to parse fixture");

        let json = serde_json::to_string(&forecast).expect("Failed to serialize WeatherForecast");
        let deserialized: WeatherForecast =
            serde_json::from_str(&json).expect("Failed to deserialize WeatherForecast");

        assert_eq!(deserialized, forecast);
    }
}
