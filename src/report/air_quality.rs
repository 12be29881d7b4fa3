//! Air quality report, one table per forecast date

use std::io::{self, Write};

use super::{columns, title};
use crate::data::AirForecast;

pub(super) fn render<W: Write>(out: &mut W, air: &AirForecast) -> io::Result<()> {
    writeln!(out, "{}", title("Air Quality Forecast"))?;

    if air.is_empty() {
        return writeln!(out, "No readings reported for this location.");
    }

    let readings = air.readings();
    let mut start = 0;
    while start < readings.len() {
        let date = &readings[start].date_forecast;
        let len = readings[start..]
            .iter()
            .take_while(|reading| &reading.date_forecast == date)
            .count();

        writeln!(out)?;
        writeln!(out, "{}", date.trim())?;
        writeln!(out, "==========")?;

        let mut table = columns(&mut *out);
        writeln!(table, "Type\tAQI\tCategory\tDescription")?;
        writeln!(table, "----\t---\t--------\t-----------")?;
        for reading in &readings[start..start + len] {
            writeln!(
                table,
                "{}\t{}\t{}\t{}",
                reading.parameter_name, reading.aqi, reading.category.number, reading.category.name
            )?;
        }
        table.flush()?;

        start += len;
    }

    Ok(())
}
