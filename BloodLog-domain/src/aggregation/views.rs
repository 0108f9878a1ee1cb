use chrono::{Datelike, NaiveDate, TimeZone};

use crate::entities::reading::Reading;
use crate::timestamp::local_month;

/// Readings taken in `year`/`month`, judged in `tz`
pub fn filter_month<Tz: TimeZone>(readings: &[Reading], year: i32, month: u32, tz: &Tz) -> Vec<Reading> {
    readings
        .iter()
        .filter(|reading| {
            reading
                .instant()
                .map(|instant| local_month(instant, tz) == (year, month))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// The newest `limit` readings, newest first. Undated readings sort last.
pub fn recent(readings: &[Reading], limit: usize) -> Vec<Reading> {
    let mut sorted: Vec<&Reading> = readings.iter().collect();
    sorted.sort_by(|a, b| b.instant().cmp(&a.instant()));
    sorted.into_iter().take(limit).cloned().collect()
}

/// Years offered by the history picker: this year and the `span - 1` before it
pub fn history_years(today: NaiveDate, span: u32) -> Vec<i32> {
    let year = today.year();
    (0..span as i32).map(|offset| year - offset).collect()
}
