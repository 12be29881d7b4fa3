//! One fetch cycle: decide between the cache and the network, race the
//! forecast calls against location resolution, render, persist.
//!
//! The cycle starts from the last call record:
//!
//! - fresh record: the cached forecasts are rendered, nothing touches the network
//! - no record: resolve the location, then fetch both forecasts for it
//! - stale record: fetch both forecasts for the previous coordinates while
//!   the location resolves. If the location is unchanged the optimistic pair
//!   is used as-is; otherwise it is discarded and a new pair is fetched.
//!
//! Persistence writes the weather and air forecasts before the call record,
//! so a record never points at forecasts older than itself.

use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::cache::{CacheError, CacheStore};
use crate::config::{Config, Settings};
use crate::data::{
    AirClient, AirError, AirForecast, CallRecord, Coordinates, LocationError, LocationResolver,
    WeatherClient, WeatherError, WeatherForecast,
};
use crate::error::AppError;
use crate::fetch::Fetcher;
use crate::race::{self, Pending};
use crate::report::Renderer;

/// Which path a cycle took
#[derive(Debug, Clone, PartialEq)]
pub enum Cycle {
    /// Served from the cache without any network call
    Cached,
    /// No previous record; fetched for the resolved location
    FirstRun(Coordinates),
    /// Stale record at an unchanged location; the optimistic pair was kept
    Confirmed(Coordinates),
    /// Stale record at a new location; the optimistic pair was discarded
    Relocated(Coordinates),
}

impl Cycle {
    /// Coordinates the forecasts were fetched for, if any were fetched
    pub fn coordinates(&self) -> Option<&Coordinates> {
        match self {
            Cycle::Cached => None,
            Cycle::FirstRun(coordinates)
            | Cycle::Confirmed(coordinates)
            | Cycle::Relocated(coordinates) => Some(coordinates),
        }
    }
}

/// In-flight weather and air calls for one set of coordinates
struct ForecastPair {
    weather: Pending<Result<WeatherForecast, WeatherError>>,
    air: Pending<Result<AirForecast, AirError>>,
}

impl ForecastPair {
    async fn join(self) -> Result<(WeatherForecast, AirForecast), AppError> {
        let (weather, air) = race::join_both(self.weather, self.air).await?;
        Ok((weather?, air?))
    }

    fn discard(self) {
        let weather = self.weather.discard();
        let air = self.air.discard();
        debug!(?weather, ?air, "optimistic forecasts discarded");
    }
}

/// Runs fetch cycles against one storage directory
#[derive(Debug)]
pub struct Orchestrator {
    store: CacheStore,
    locator: LocationResolver,
    weather: WeatherClient,
    air: AirClient,
    renderer: Renderer,
    settings: Settings,
}

impl Orchestrator {
    pub fn new(
        store: CacheStore,
        fetcher: Arc<dyn Fetcher>,
        config: &Config,
        settings: Settings,
        renderer: Renderer,
    ) -> Self {
        Self {
            store,
            locator: LocationResolver::new(fetcher.clone()).with_timeout(settings.location_timeout),
            weather: WeatherClient::new(fetcher.clone(), &config.weather_api_key, &config.units)
                .with_timeout(settings.forecast_timeout),
            air: AirClient::new(fetcher, &config.air_api_key)
                .with_timeout(settings.forecast_timeout),
            renderer,
            settings,
        }
    }

    /// Runs one cycle as of now
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<Cycle, AppError> {
        self.run_at(Utc::now(), out).await
    }

    /// Runs one cycle as of `now`, writing the report to `out`
    pub async fn run_at<W: Write>(
        &self,
        now: DateTime<Utc>,
        out: &mut W,
    ) -> Result<Cycle, AppError> {
        let record = match self.store.load_call_record() {
            Ok(record) => Some(record),
            Err(CacheError::NotFound(_)) => {
                info!("no previous call record");
                None
            }
            Err(err) => {
                warn!(error = %err, "ignoring unreadable call record");
                None
            }
        };

        match record {
            Some(record) if record.is_fresh(now, self.settings.freshness) => {
                debug!(age = ?record.age(now), "serving cached forecasts");
                self.serve_cached(out)?;
                Ok(Cycle::Cached)
            }
            Some(record) => self.race(record, now, out).await,
            None => self.first_run(now, out).await,
        }
    }

    fn serve_cached<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let weather = cached("weather", self.store.load_weather());
        let air = cached("air", self.store.load_air());

        self.renderer.render(out, weather.as_ref(), air.as_ref())?;
        Ok(())
    }

    async fn first_run<W: Write>(
        &self,
        now: DateTime<Utc>,
        out: &mut W,
    ) -> Result<Cycle, AppError> {
        let coordinates = resolve(self.spawn_location()).await?;
        let (weather, air) = self.spawn_pair(&coordinates, now).join().await?;

        self.finish(out, &coordinates, now, &weather, &air)?;
        Ok(Cycle::FirstRun(coordinates))
    }

    async fn race<W: Write>(
        &self,
        record: CallRecord,
        now: DateTime<Utc>,
        out: &mut W,
    ) -> Result<Cycle, AppError> {
        let location = self.spawn_location();
        let optimistic = self.spawn_pair(&record.coordinates, now);

        let confirmed = match resolve(location).await {
            Ok(coordinates) => coordinates,
            Err(err) => {
                optimistic.discard();
                return Err(err);
            }
        };

        if confirmed.same_location(&record.coordinates) {
            debug!("location unchanged, keeping optimistic forecasts");
            let (weather, air) = optimistic.join().await?;
            self.finish(out, &confirmed, now, &weather, &air)?;
            return Ok(Cycle::Confirmed(confirmed));
        }

        info!(
            from_latitude = record.coordinates.latitude,
            from_longitude = record.coordinates.longitude,
            to_latitude = confirmed.latitude,
            to_longitude = confirmed.longitude,
            "location changed, refetching forecasts"
        );
        optimistic.discard();

        let (weather, air) = self.spawn_pair(&confirmed, now).join().await?;
        self.finish(out, &confirmed, now, &weather, &air)?;
        Ok(Cycle::Relocated(confirmed))
    }

    fn spawn_location(&self) -> Pending<Result<Coordinates, LocationError>> {
        let locator = self.locator.clone();
        Pending::spawn("location", async move { locator.resolve().await })
    }

    fn spawn_pair(&self, coordinates: &Coordinates, now: DateTime<Utc>) -> ForecastPair {
        let date = air_date(now);

        let client = self.weather.clone();
        let target = coordinates.clone();
        let weather =
            Pending::spawn("weather", async move { client.fetch_forecast(&target).await });

        let client = self.air.clone();
        let target = coordinates.clone();
        let air = Pending::spawn("air", async move { client.fetch_forecast(&target, date).await });

        ForecastPair { weather, air }
    }

    /// Renders freshly fetched forecasts, then stores them
    fn finish<W: Write>(
        &self,
        out: &mut W,
        coordinates: &Coordinates,
        now: DateTime<Utc>,
        weather: &WeatherForecast,
        air: &AirForecast,
    ) -> Result<(), AppError> {
        let rendered = self
            .renderer
            .render_location(out, coordinates)
            .and_then(|()| self.renderer.render(out, Some(weather), Some(air)));

        self.persist(coordinates, now, weather, air);
        Ok(rendered?)
    }

    fn persist(
        &self,
        coordinates: &Coordinates,
        now: DateTime<Utc>,
        weather: &WeatherForecast,
        air: &AirForecast,
    ) {
        if let Err(err) = self.store.save_weather(weather) {
            warn!(error = %err, "failed to cache weather forecast");
            if let Err(err) = self.store.remove_weather() {
                warn!(error = %err, "failed to remove stale weather forecast");
            }
        }

        if let Err(err) = self.store.save_air(air) {
            warn!(error = %err, "failed to cache air quality forecast");
            if let Err(err) = self.store.remove_air() {
                warn!(error = %err, "failed to remove stale air quality forecast");
            }
        }

        if let Err(err) = self.store.save_call_record(&CallRecord::new(now, coordinates.clone())) {
            warn!(error = %err, "failed to save call record");
        }
    }
}

/// Waits for the location task
async fn resolve(
    location: Pending<Result<Coordinates, LocationError>>,
) -> Result<Coordinates, AppError> {
    Ok(location.join().await??)
}

/// Unwraps a cache read, logging why a half is missing
fn cached<T>(name: &str, loaded: Result<T, CacheError>) -> Option<T> {
    match loaded {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(forecast = name, error = %err, "cached forecast unavailable");
            None
        }
    }
}

/// AirNow forecasts are keyed by the user's local calendar date
fn air_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}
