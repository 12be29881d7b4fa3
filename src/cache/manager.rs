//! Cache store for persisting forecasts and call metadata to disk
//!
//! Provides a `CacheStore` that keeps the last call record, both forecast
//! payloads and the user's config as JSON files in one per-user directory.

use directories::BaseDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::data::{AirForecast, CallRecord, WeatherForecast};

/// Name of the storage directory under the user's home
const STORE_DIR_NAME: &str = ".vaporwair";

pub const CONFIG_FILE: &str = "config.json";
pub const CALL_RECORD_FILE: &str = "last-call.json";
pub const WEATHER_FILE: &str = "weather-forecast.json";
pub const AIR_FILE: &str = "air-forecast.json";

/// Reasons a cached value could not be loaded
#[derive(Debug, Error)]
pub enum CacheError {
    /// Nothing has been stored under this name yet
    #[error("No cached file at {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but does not hold the expected JSON
    #[error("Cached file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and writes the files of one storage directory
///
/// Files live in `~/.vaporwair/` unless another directory is given. Every
/// save goes through a temporary file and a rename, so a concurrent or later
/// reader sees either the previous file or the complete new one.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where all files are stored
    dir: PathBuf,
}

impl CacheStore {
    /// Creates a CacheStore in the user's home directory
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let base_dirs = BaseDirs::new()?;
        let dir = base_dirs.home_dir().join(STORE_DIR_NAME);
        Some(Self { dir })
    }

    /// Creates a CacheStore with a custom directory
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The directory this store reads from and writes to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to a file in the store
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Ensures the storage directory exists
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Reads the user's config; unlike cached data a failure here is fatal to the caller
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        Config::load(&self.path(CONFIG_FILE))
    }

    pub fn load_call_record(&self) -> Result<CallRecord, CacheError> {
        self.read(CALL_RECORD_FILE)
    }

    pub fn save_call_record(&self, record: &CallRecord) -> io::Result<()> {
        self.write(CALL_RECORD_FILE, record)
    }

    pub fn load_weather(&self) -> Result<WeatherForecast, CacheError> {
        self.read(WEATHER_FILE)
    }

    pub fn save_weather(&self, forecast: &WeatherForecast) -> io::Result<()> {
        self.write(WEATHER_FILE, forecast)
    }

    /// Deletes the cached weather forecast; a missing file is not an error
    pub fn remove_weather(&self) -> io::Result<()> {
        self.remove(WEATHER_FILE)
    }

    pub fn load_air(&self) -> Result<AirForecast, CacheError> {
        self.read(AIR_FILE)
    }

    pub fn save_air(&self, forecast: &AirForecast) -> io::Result<()> {
        self.write(AIR_FILE, forecast)
    }

    /// Deletes the cached air forecast; a missing file is not an error
    pub fn remove_air(&self) -> io::Result<()> {
        self.remove(AIR_FILE)
    }

    /// Serializes `data` to `name`, replacing any previous content
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation, serialization or file writing fails
    fn write<T: Serialize>(&self, name: &str, data: &T) -> io::Result<()> {
        self.ensure_dir()?;

        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let path = self.path(name);
        let staging = self.path(&format!(".{}.tmp", name));
        fs::write(&staging, json)?;
        fs::rename(&staging, &path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            e
        })
    }

    /// Reads and deserializes `name`
    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T, CacheError> {
        let path = self.path(name);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(CacheError::NotFound(path)),
            Err(source) => return Err(CacheError::Unreadable { path, source }),
        };

        serde_json::from_slice(&content).map_err(|source| CacheError::Corrupt { path, source })
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        match fs::remove_file(self.path(name)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Coordinates;
    use chrono::Utc;
    use tempfile::TempDir;

    const WEATHER_FIXTURE: &str = include_str!("../../tests/fixtures/darksky.json");
    const AIR_FIXTURE: &str = include_str!("../../tests/fixtures/airnow.json");

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    fn record() -> CallRecord {
        CallRecord::new(
            Utc::now(),
            Coordinates::new(34.0308, -118.473, "Santa Monica", "90401"),
        )
    }

    #[test]
    fn test_call_record_roundtrip() {
        let (store, _temp_dir) = create_test_store();
        let original = record();

        store.save_call_record(&original).expect("Save should succeed");
        let loaded = store.load_call_record().expect("Should load record");

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_weather_roundtrip() {
        let (store, _temp_dir) = create_test_store();
        let original: WeatherForecast = serde_json::from_str(WEATHER_FIXTURE).unwrap();

        store.save_weather(&original).expect("Save should succeed");
        let loaded = store.load_weather().expect("Should load weather");

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_air_roundtrip() {
        let (store, _temp_dir) = create_test_store();
        let original: AirForecast = serde_json::from_str(AIR_FIXTURE).unwrap();

        store.save_air(&original).expect("Save should succeed");
        let loaded = store.load_air().expect("Should load air");

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let (store, _temp_dir) = create_test_store();

        assert!(matches!(store.load_call_record(), Err(CacheError::NotFound(_))));
        assert!(matches!(store.load_weather(), Err(CacheError::NotFound(_))));
        assert!(matches!(store.load_air(), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_load_corrupt_file_is_corrupt() {
        let (store, temp_dir) = create_test_store();
        fs::write(temp_dir.path().join(CALL_RECORD_FILE), "{ not json").unwrap();

        assert!(matches!(store.load_call_record(), Err(CacheError::Corrupt { .. })));
    }

    #[test]
    fn test_save_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("store");
        let store = CacheStore::with_dir(nested_path.clone());

        store.save_call_record(&record()).expect("Save should succeed");

        assert!(nested_path.join(CALL_RECORD_FILE).exists());
        assert!(!nested_path.join(format!(".{}.tmp", CALL_RECORD_FILE)).exists());
    }

    #[test]
    fn test_overwrite_existing_record() {
        let (store, _temp_dir) = create_test_store();
        let first = record();
        let second = CallRecord::new(
            Utc::now(),
            Coordinates::new(40.7128, -74.006, "New York", "10007"),
        );

        store.save_call_record(&first).unwrap();
        store.save_call_record(&second).unwrap();

        assert_eq!(store.load_call_record().unwrap(), second);
    }

    #[test]
    fn test_remove_weather_and_air() {
        let (store, _temp_dir) = create_test_store();
        store.save_air(&AirForecast::default()).unwrap();

        store.remove_air().expect("Remove should succeed");
        store.remove_weather().expect("Removing a missing file is fine");

        assert!(matches!(store.load_air(), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_failed_save_leaves_no_staging_file() {
        let (store, temp_dir) = create_test_store();
        fs::create_dir(temp_dir.path().join(WEATHER_FILE)).unwrap();

        assert!(store.save_weather(&WeatherForecast::default()).is_err());
        assert!(!temp_dir.path().join(".weather-forecast.json.tmp").exists());
    }

    #[test]
    fn test_new_uses_home_directory() {
        if let Some(store) = CacheStore::new() {
            assert!(store.dir().ends_with(STORE_DIR_NAME));
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }
}
