// Public entities for the BloodLog API
// Request and response bodies that cross the HTTP boundary

// Error bodies and their status codes
pub mod common;

// Dashboard, chart, history and medical views
pub mod views;

pub use common::ErrorResponse;
pub use views::{
    ChartPoint, ChartResponse, DashboardResponse, HistoryQuery, HistoryResponse, MedicalListResponse,
    RangeQuery, ReadingListResponse, YearsResponse,
};
