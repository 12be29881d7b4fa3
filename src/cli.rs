//! Command-line interface parsing for vaporwair
//!
//! The report flags are mutually exclusive; with none of them the summary
//! report is printed.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::report::ReportMode;

#[derive(Parser, Debug)]
#[command(name = "vaporwair")]
#[command(about = "Weather and air quality forecast for where you are")]
#[command(version)]
#[command(group(ArgGroup::new("report").args(["hourly", "week", "air"])))]
pub struct Cli {
    /// Show the forecast for the next twelve hours
    #[arg(short = 'H', long)]
    pub hourly: bool,

    /// Show the forecast for the next seven days
    #[arg(short, long)]
    pub week: bool,

    /// Show the air quality forecast
    #[arg(short, long)]
    pub air: bool,

    /// Directory holding config.json and the cached forecasts
    ///
    /// Defaults to ~/.vaporwair
    #[arg(long, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Serve cached forecasts younger than this many minutes
    #[arg(long, value_name = "MINUTES")]
    pub max_age: Option<u64>,
}

impl Cli {
    /// The report selected by the flags
    pub fn report_mode(&self) -> ReportMode {
        if self.hourly {
            ReportMode::Hourly
        } else if self.week {
            ReportMode::Week
        } else if self.air {
            ReportMode::AirQuality
        } else {
            ReportMode::Summary
        }
    }
}
