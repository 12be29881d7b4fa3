//! User configuration and run settings
//!
//! The config file holds the provider API keys and is required: without it no
//! forecast can be requested. `Settings` gathers the timing knobs the
//! orchestrator runs with, derived from the config and CLI overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::data::location::LOCATION_TIMEOUT;
use crate::data::weather::FORECAST_TIMEOUT;

/// Default unit system requested from the weather provider
const DEFAULT_UNITS: &str = "auto";

/// Default age, in minutes, under which cached forecasts are served as-is
pub const DEFAULT_FRESHNESS_MINUTES: u64 = 5;

/// Errors that can occur when loading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config file exists yet
    #[error("Could not find config file at {}", .0.display())]
    Missing(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file does not contain the expected JSON
    #[error("The config file {} does not contain valid JSON: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Instruction telling the user how to create a working config file
    pub fn hint(&self) -> String {
        let path = match self {
            ConfigError::Missing(path) => path,
            ConfigError::Unreadable { path, .. } => path,
            ConfigError::Invalid { path, .. } => path,
        };
        format!(
            concat!(
                "Create {} containing:\n",
                "{{\n",
                "  \"weather_api_key\": \"<Dark Sky key>\",\n",
                "  \"air_api_key\": \"<AirNow key>\"\n",
                "}}"
            ),
            path.display()
        )
    }
}

/// API keys and preferences stored on disk
///
/// Example JSON:
/// ```json
/// { "weather_api_key": "...", "air_api_key": "...", "units": "us" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(alias = "darkskyapikey")]
    pub weather_api_key: String,

    #[serde(alias = "airnowapikey")]
    pub air_api_key: String,

    /// Unit system passed to the weather provider
    #[serde(default = "default_units")]
    pub units: String,

    /// Overrides how long cached forecasts stay fresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness_minutes: Option<u64>,
}

fn default_units() -> String {
    DEFAULT_UNITS.to_string()
}

impl Config {
    /// Load config from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing(path.to_path_buf()))
            }
            Err(source) => {
                return Err(ConfigError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Timing settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Cached forecasts younger than this are served without a network call
    pub freshness: Duration,
    /// Timeout for the geolocation call
    pub location_timeout: Duration,
    /// Timeout for each forecast call
    pub forecast_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            freshness: Duration::from_secs(DEFAULT_FRESHNESS_MINUTES * 60),
            location_timeout: LOCATION_TIMEOUT,
            forecast_timeout: FORECAST_TIMEOUT,
        }
    }
}

impl Settings {
    /// Builds settings from the config file, letting a CLI value win
    pub fn resolve(config: &Config, freshness_override: Option<u64>) -> Self {
        let minutes = freshness_override
            .or(config.freshness_minutes)
            .unwrap_or(DEFAULT_FRESHNESS_MINUTES);

        Self {
            freshness: Duration::from_secs(minutes.saturating_mul(60)),
            ..Default::default()
        }
    }
}
