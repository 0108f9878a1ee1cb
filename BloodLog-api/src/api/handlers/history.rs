use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Datelike;
use tracing::{info, instrument};

use blood_log_domain::aggregation::history_years;

use crate::api::state::AppState;
use crate::entities::{ErrorResponse, HistoryQuery, HistoryResponse, YearsResponse};

/// Number of years offered by the history picker
pub const HISTORY_YEAR_SPAN: u32 = 6;

/// Readings of one month, grouped into runs with their means
#[utoipa::path(
    get,
    path = "/api/v1/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Batched month", body = HistoryResponse),
        (status = 400, description = "Invalid month", body = ErrorResponse),
        (status = 401, description = "Signed out", body = ErrorResponse),
        (status = 502, description = "Collaborator failure", body = ErrorResponse)
    ),
    tag = "readings"
)]
#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ErrorResponse> {
    let today = state.now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    info!("History requested for {}-{:02}", year, month);

    let rows = state.service.history(year, month, state.tz).await?;
    Ok(Json(HistoryResponse { year, month, rows }))
}

/// Years offered by the history picker
#[utoipa::path(
    get,
    path = "/api/v1/history/years",
    responses(
        (status = 200, description = "Current year first", body = YearsResponse),
        (status = 401, description = "Signed out", body = ErrorResponse)
    ),
    tag = "readings"
)]
#[instrument(skip(state))]
pub async fn get_history_years(State(state): State<AppState>) -> Json<YearsResponse> {
    Json(YearsResponse {
        years: history_years(state.now().date_naive(), HISTORY_YEAR_SPAN),
    })
}
