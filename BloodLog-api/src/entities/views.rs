use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use blood_log_domain::entities::{Dashboard, DisplayReading, HistoryRow, MedicalRecord, SeriesPoint};

/// Query parameters selecting a chart window
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// Window in days: 7, 14 or 30 (default: 7)
    pub range: Option<u32>,
}

impl RangeQuery {
    pub const DEFAULT_RANGE: u32 = 7;

    pub fn range_days(&self) -> u32 {
        self.range.unwrap_or(Self::DEFAULT_RANGE)
    }
}

/// Query parameters selecting a history month
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Calendar year (default: current year)
    pub year: Option<i32>,

    /// Month 1-12 (default: current month)
    pub month: Option<u32>,
}

/// One labelled day on the chart
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ChartPoint {
    /// `MM-DD` axis label
    pub label: String,
    pub day: NaiveDate,
    pub systolic: f64,
    pub diastolic: f64,
    pub pulse: f64,
}

impl From<&SeriesPoint> for ChartPoint {
    fn from(point: &SeriesPoint) -> Self {
        Self {
            label: point.label(),
            day: point.day,
            systolic: point.systolic,
            diastolic: point.diastolic,
            pulse: point.pulse,
        }
    }
}

/// Chart data for one window
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChartResponse {
    pub range_days: u32,
    /// Oldest day first
    pub points: Vec<ChartPoint>,
}

impl ChartResponse {
    pub fn new(range_days: u32, series: &[SeriesPoint]) -> Self {
        Self {
            range_days,
            points: series.iter().map(ChartPoint::from).collect(),
        }
    }
}

/// Dashboard: latest readings and the chart
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub range_days: u32,
    /// Newest first
    pub recent: Vec<DisplayReading>,
    pub chart: Vec<ChartPoint>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            range_days: dashboard.range_days,
            chart: dashboard.series.iter().map(ChartPoint::from).collect(),
            recent: dashboard.recent,
        }
    }
}

/// Batched history of one month
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub year: i32,
    pub month: u32,
    /// Readings newest first, each run closed by a summary row
    pub rows: Vec<HistoryRow>,
}

/// Years offered by the history picker
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct YearsResponse {
    /// Current year first
    pub years: Vec<i32>,
}

/// Reading list after a change, as refreshed from the collaborator
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingListResponse {
    pub total: usize,
    /// Newest first
    pub readings: Vec<DisplayReading>,
}

/// Medical visit records
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MedicalListResponse {
    pub total: usize,
    /// Newest visit first
    pub records: Vec<MedicalRecord>,
}

impl From<Vec<MedicalRecord>> for MedicalListResponse {
    fn from(records: Vec<MedicalRecord>) -> Self {
        Self {
            total: records.len(),
            records,
        }
    }
}
