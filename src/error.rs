//! Application-level errors
//!
//! Everything fatal to a run ends up here; recoverable conditions are logged
//! where they happen and never reach this type.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::data::{AirError, LocationError, WeatherError};
use crate::race::TaskError;

/// A condition that ends the run with a non-zero exit
#[derive(Debug, Error)]
pub enum AppError {
    /// No home directory to keep the config and cache in
    #[error("Could not determine your home directory")]
    HomeDirectory,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Failed to fetch the weather forecast: {0}")]
    Weather(#[from] WeatherError),

    #[error("Failed to fetch the air quality forecast: {0}")]
    Air(#[from] AirError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("Failed to write the report: {0}")]
    Output(#[from] io::Error),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// What the user can do about it, when there is something to do
    pub fn hint(&self) -> Option<String> {
        match self {
            AppError::HomeDirectory => {
                Some("Pass --home <DIR> to choose a storage directory.".to_string())
            }
            AppError::Config(err) => Some(err.hint()),
            AppError::Location(_) => {
                Some("Check your network connection and try again.".to_string())
            }
            _ => None,
        }
    }
}
