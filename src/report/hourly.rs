//! Hour-by-hour report

use std::io::{self, Write};

use super::{add_period, clock, columns, percent, title, Units};
use crate::data::WeatherForecast;

/// Hours shown in the table
const HOURS: usize = 12;

pub(super) fn render<W: Write>(out: &mut W, weather: &WeatherForecast) -> io::Result<()> {
    let units = Units::of(weather);

    writeln!(out, "{}", title("Hourly Summary"))?;
    writeln!(out, "{}", add_period(&weather.hourly.summary))?;
    writeln!(out)?;

    let mut table = columns(out);
    writeln!(table, "Hour\tTemp\tFeels Like\tPrecip\tIntensity\tWind")?;
    writeln!(table, "----\t----\t----------\t------\t---------\t----")?;

    for hour in weather.hourly.data.iter().take(HOURS) {
        writeln!(
            table,
            "{}\t{:.0} {}\t{:.0} {}\t{:.0} %\t{:.3} {}\t{:.0} {}",
            clock(weather, hour.time),
            hour.temperature.round(),
            units.temperature,
            hour.apparent_temperature.round(),
            units.temperature,
            percent(hour.precip_probability).round(),
            hour.precip_intensity,
            units.intensity,
            hour.wind_speed.round(),
            units.wind,
        )?;
    }

    table.flush()
}
