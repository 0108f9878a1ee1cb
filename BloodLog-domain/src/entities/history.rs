use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::reading::{DisplayReading, Reading};

/// Mean values over one run of readings in the history list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HistoryBatch {
    /// Unrounded means
    pub mean_systolic: f64,
    pub mean_diastolic: f64,
    pub mean_pulse: f64,

    /// Number of readings that contributed
    pub count: usize,
}

impl HistoryBatch {
    /// Means rounded for display, as `(systolic, diastolic, pulse)`
    pub fn rounded(&self) -> (f64, f64, f64) {
        (
            self.mean_systolic.round(),
            self.mean_diastolic.round(),
            self.mean_pulse.round(),
        )
    }
}

/// One row of the history list: a reading or the summary closing its batch
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    Reading(Reading),
    Summary(HistoryBatch),
}

impl HistoryEntry {
    pub fn is_summary(&self) -> bool {
        matches!(self, HistoryEntry::Summary(_))
    }
}

/// History row as served to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryRow {
    Reading {
        reading: DisplayReading,
    },
    Summary {
        systolic: f64,
        diastolic: f64,
        pulse: f64,
        count: usize,
    },
}

/// One day of chart data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SeriesPoint {
    pub day: NaiveDate,
    pub systolic: f64,
    pub diastolic: f64,
    pub pulse: f64,
}

impl SeriesPoint {
    /// `MM-DD` axis label
    pub fn label(&self) -> String {
        self.day.format("%m-%d").to_string()
    }
}

/// Dashboard view: latest readings plus the chart for the selected range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Dashboard {
    /// Chart window in days
    pub range_days: u32,

    /// Newest readings first
    pub recent: Vec<DisplayReading>,

    /// Daily means, oldest first
    pub series: Vec<SeriesPoint>,
}
