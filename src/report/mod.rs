//! Console reports
//!
//! A `Renderer` turns a weather/air forecast pair into text for one of the
//! report modes picked on the command line. Either half may be missing, for
//! example when a cached file could not be read; the report then says so in
//! place of that section.

mod air_quality;
mod hourly;
mod summary;
mod week;

use std::io::{self, Write};

use chrono::{DateTime, FixedOffset};
use tabwriter::TabWriter;

use crate::data::{AirForecast, AirReading, Coordinates, WeatherForecast};

/// Which report to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Today at a glance: temperatures, AQI, precipitation, sun times
    #[default]
    Summary,
    /// The next twelve hours
    Hourly,
    /// The next seven days
    Week,
    /// Air quality readings by date and pollutant
    AirQuality,
}

/// Formats forecasts for the console
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    mode: ReportMode,
}

impl Renderer {
    pub fn new(mode: ReportMode) -> Self {
        Self { mode }
    }

    /// Prints the location a fresh forecast was fetched for
    pub fn render_location<W: Write>(
        &self,
        out: &mut W,
        coordinates: &Coordinates,
    ) -> io::Result<()> {
        writeln!(
            out,
            "{} {} | {}, {}",
            coordinates.city, coordinates.postal_code, coordinates.latitude, coordinates.longitude
        )
    }

    /// Prints the selected report
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        weather: Option<&WeatherForecast>,
        air: Option<&AirForecast>,
    ) -> io::Result<()> {
        match self.mode {
            ReportMode::Summary => summary::render(out, weather, air),
            ReportMode::Hourly => match weather {
                Some(weather) => hourly::render(out, weather),
                None => weather_unavailable(out),
            },
            ReportMode::Week => match weather {
                Some(weather) => week::render(out, weather),
                None => weather_unavailable(out),
            },
            ReportMode::AirQuality => match air {
                Some(air) => air_quality::render(out, air),
                None => air_unavailable(out),
            },
        }
    }
}

/// Highest-AQI reading among those for the nearest forecast date
///
/// Ties go to the reading listed first. Returns `None` for an empty forecast.
pub fn headline(forecast: &AirForecast) -> Option<&AirReading> {
    let readings = forecast.readings();
    let nearest = &readings.first()?.date_forecast;

    readings
        .iter()
        .take_while(|reading| &reading.date_forecast == nearest)
        .fold(None, |best: Option<&AirReading>, reading| match best {
            Some(current) if current.aqi >= reading.aqi => Some(current),
            _ => Some(reading),
        })
}

fn weather_unavailable<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Weather forecast unavailable.")
}

fn air_unavailable<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Air quality forecast unavailable.")
}

/// Unit labels for the unit system a forecast was requested in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Units {
    temperature: &'static str,
    wind: &'static str,
    intensity: &'static str,
}

impl Units {
    fn for_system(system: &str) -> Self {
        if system.eq_ignore_ascii_case("us") {
            Self {
                temperature: "°F",
                wind: "mph",
                intensity: "in/h",
            }
        } else {
            Self {
                temperature: "°C",
                wind: "m/s",
                intensity: "mm/h",
            }
        }
    }

    fn of(forecast: &WeatherForecast) -> Self {
        Self::for_system(&forecast.flags.units)
    }
}

/// Minimum width of every column except the last
const MIN_WIDTH: usize = 10;

/// Spaces between columns
const PADDING: usize = 2;

/// Aligns tab-separated cells into left-aligned columns
///
/// Text after the last tab of a line is not padded. Callers must `flush`.
fn columns<W: Write>(out: W) -> TabWriter<W> {
    TabWriter::new(out).minwidth(MIN_WIDTH).padding(PADDING)
}

/// Report section heading
fn title(text: &str) -> String {
    format!("-- {} --", text.to_uppercase())
}

/// Provider summaries are inconsistently punctuated
fn add_period(text: &str) -> String {
    if text.is_empty() || text.ends_with('.') {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

fn percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Converts a unix timestamp into the forecast's local time
fn local_time(forecast: &WeatherForecast, unix: i64) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt((forecast.offset * 3600.0).round() as i32)?;
    Some(DateTime::from_timestamp(unix, 0)?.with_timezone(&offset))
}

/// `HH:MM` in the forecast's local time
fn clock(forecast: &WeatherForecast, unix: i64) -> String {
    local_time(forecast, unix)
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
