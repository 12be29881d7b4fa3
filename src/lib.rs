//! vaporwair library
//!
//! Weather and air quality forecasts for the caller's current location, with
//! an on-disk cache that spares network calls on repeated runs. The binary is
//! a thin wrapper around [`orchestrator::Orchestrator`]; the modules are
//! exposed for integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod fetch;
pub mod orchestrator;
pub mod race;
pub mod report;
