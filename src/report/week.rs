//! Seven-day report

use std::io::{self, Write};

use super::{add_period, columns, local_time, percent, title, Units};
use crate::data::WeatherForecast;

/// Days shown in the table
const DAYS: usize = 7;

/// Separates the weekly summary from the table
const SEPARATOR: &str = "+++";

pub(super) fn render<W: Write>(out: &mut W, weather: &WeatherForecast) -> io::Result<()> {
    let units = Units::of(weather);

    writeln!(out, "{}", title("Weekly Summary"))?;
    writeln!(out, "{}", add_period(&weather.daily.summary))?;
    writeln!(out, "{}", SEPARATOR)?;

    let mut table = columns(out);
    writeln!(table, "Day\tMin\tMax\tPrecip\tType\tHumidity\tWind")?;
    writeln!(table, "---\t---\t---\t------\t----\t--------\t----")?;

    for day in weather.daily.data.iter().take(DAYS) {
        let weekday = local_time(weather, day.time)
            .map(|time| time.format("%a").to_string())
            .unwrap_or_else(|| "---".to_string());

        writeln!(
            table,
            "{}\t{:.0} {}\t{:.0} {}\t{:.0} %\t{}\t{:.0} %\t{:.0} {}",
            weekday,
            day.temperature_min.round(),
            units.temperature,
            day.temperature_max.round(),
            units.temperature,
            percent(day.precip_probability).round(),
            day.precip_type.as_deref().unwrap_or("-"),
            percent(day.humidity).round(),
            day.wind_speed.round(),
            units.wind,
        )?;
    }

    table.flush()
}
