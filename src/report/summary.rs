//! Default report: today at a glance

use std::io::{self, Write};

use super::{
    add_period, air_unavailable, clock, columns, headline, percent, weather_unavailable, Units,
};
use crate::data::{AirForecast, WeatherForecast};

/// Label and value of one summary line
type Row = (&'static str, String);

pub(super) fn render<W: Write>(
    out: &mut W,
    weather: Option<&WeatherForecast>,
    air: Option<&AirForecast>,
) -> io::Result<()> {
    let mut rows = Vec::new();

    match weather {
        Some(weather) => weather_rows(&mut rows, weather),
        None => weather_unavailable(out)?,
    }

    match air.map(headline) {
        Some(Some(reading)) => rows.push((
            "Air Quality Index:",
            format!(
                "{} {} {}",
                reading.aqi, reading.parameter_name, reading.category.name
            ),
        )),
        Some(None) => rows.push(("Air Quality Index:", "no readings".to_string())),
        None => air_unavailable(out)?,
    }

    if let Some(weather) = weather {
        sun_rows(&mut rows, weather);
    }

    let mut table = columns(out);
    for (label, value) in rows {
        writeln!(table, "{}\t{}", label, value)?;
    }
    table.flush()
}

fn weather_rows(rows: &mut Vec<Row>, weather: &WeatherForecast) {
    let units = Units::of(weather);
    let current = &weather.currently;

    rows.push(("This week:", add_period(&weather.daily.summary)));
    rows.push(("Currently:", add_period(&current.summary)));
    rows.push((
        "Current Temperature:",
        format!("{:.0} {}", current.temperature.round(), units.temperature),
    ));

    if let Some(today) = weather.daily.data.first() {
        rows.push((
            "Min Temperature:",
            format!(
                "{:.0} {} at {}",
                today.temperature_min.round(),
                units.temperature,
                clock(weather, today.temperature_min_time)
            ),
        ));
        rows.push((
            "Max Temperature:",
            format!(
                "{:.0} {} at {}",
                today.temperature_max.round(),
                units.temperature,
                clock(weather, today.temperature_max_time)
            ),
        ));
        rows.push(("Humidity:", format!("{:.0} %", percent(today.humidity).round())));
    }

    rows.push((
        "Windspeed:",
        format!("{:.0} {}", current.wind_speed.round(), units.wind),
    ));
}

/// UV, precipitation and sun times, printed after the AQI line
fn sun_rows(rows: &mut Vec<Row>, weather: &WeatherForecast) {
    rows.push(("UV Index:", format!("{}", weather.currently.uv_index)));

    let Some(today) = weather.daily.data.first() else {
        return;
    };

    let precipitation = percent(today.precip_probability).round();
    rows.push(("Precipitation:", format!("{:.0} %", precipitation)));
    if precipitation > 0.0 {
        if let Some(kind) = &today.precip_type {
            rows.push(("Precip Type:", kind.clone()));
        }
    }

    rows.push(("Sunrise:", clock(weather, today.sunrise_time)));
    rows.push(("Sunset:", clock(weather, today.sunset_time)));
}
