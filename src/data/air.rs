//! AirNow air quality API client
//!
//! Fetches the per-pollutant air quality forecast for a location and date.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::weather::FORECAST_TIMEOUT;
use super::Coordinates;
use crate::fetch::{FetchError, Fetcher};

/// Base URL for the AirNow latitude/longitude forecast endpoint
pub const AIR_NOW_ADDRESS: &str = "http://www.airnowapi.org/aq/forecast/latLong/?format=application/json&";

/// Search radius around the coordinates, in miles
const SEARCH_DISTANCE_MILES: u32 = 25;

/// Errors that can occur when fetching air quality data
#[derive(Debug, Error)]
pub enum AirError {
    /// HTTP request failed or timed out
    #[error("Air quality request failed: {0}")]
    Fetch(#[from] FetchError),

    /// Failed to parse JSON response
    #[error("Failed to parse air quality response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// AQI category reported alongside a reading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Category {
    pub number: i32,
    pub name: String,
}

/// A forecast for a single pollutant on a single date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AirReading {
    pub date_issue: String,
    pub date_forecast: String,
    pub reporting_area: String,
    pub state_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Pollutant, e.g. "O3" or "PM2.5"
    pub parameter_name: String,
    #[serde(rename = "AQI")]
    pub aqi: i32,
    pub category: Category,
    pub action_day: bool,
    pub discussion: String,
}

/// Readings ordered by forecast date, as returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirForecast(pub Vec<AirReading>);

impl AirForecast {
    pub fn readings(&self) -> &[AirReading] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Client for fetching forecasts from the AirNow API
#[derive(Debug, Clone)]
pub struct AirClient {
    fetcher: Arc<dyn Fetcher>,
    api_key: String,
    timeout: Duration,
}

impl AirClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, api_key: impl Into<String>) -> Self {
        Self {
            fetcher,
            api_key: api_key.into(),
            timeout: FORECAST_TIMEOUT,
        }
    }

    /// Overrides the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the request URL for the given coordinates and date
    pub fn build_url(&self, coordinates: &Coordinates, date: NaiveDate) -> String {
        AIR_NOW_ADDRESS.to_string()
            + "latitude="
            + &coordinates.latitude.to_string()
            + "&longitude="
            + &coordinates.longitude.to_string()
            + "&date="
            + &date.format("%Y-%m-%d").to_string()
            + "&distance="
            + &SEARCH_DISTANCE_MILES.to_string()
            + "&API_KEY="
            + &self.api_key
    }

    /// Fetch the air quality forecast issued on `date` for the given coordinates
    pub async fn fetch_forecast(
        &self,
        coordinates: &Coordinates,
        date: NaiveDate,
    ) -> Result<AirForecast, AirError> {
        let url = self.build_url(coordinates, date);
        let body = self.fetcher.fetch(&url, self.timeout, false).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
