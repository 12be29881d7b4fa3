//! Cache module for storing forecasts and call metadata on disk
//!
//! The store keeps exactly one generation of data: the last call record and
//! the two forecasts fetched in that same cycle. The orchestrator decides from
//! the record's age whether the forecasts can be served without a network call.

mod manager;

pub use manager::{CacheError, CacheStore, AIR_FILE, CALL_RECORD_FILE, CONFIG_FILE, WEATHER_FILE};
