use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{info, instrument};

use crate::api::state::AppState;
use crate::entities::{ChartResponse, DashboardResponse, ErrorResponse, RangeQuery};

/// Latest readings and the chart for the selected window.
///
/// Refreshes the reading cache from the collaborator first.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    params(RangeQuery),
    responses(
        (status = 200, description = "Dashboard view", body = DashboardResponse),
        (status = 400, description = "Unsupported range", body = ErrorResponse),
        (status = 401, description = "Signed out", body = ErrorResponse),
        (status = 502, description = "Collaborator failure", body = ErrorResponse)
    ),
    tag = "readings"
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<DashboardResponse>, ErrorResponse> {
    let range_days = query.range_days();
    info!("Dashboard requested for {} days", range_days);

    let dashboard = state.service.dashboard(range_days, state.now()).await?;
    Ok(Json(dashboard.into()))
}

/// Chart for another window over the readings already loaded
#[utoipa::path(
    get,
    path = "/api/v1/chart",
    params(RangeQuery),
    responses(
        (status = 200, description = "Daily means, oldest first", body = ChartResponse),
        (status = 400, description = "Unsupported range", body = ErrorResponse),
        (status = 401, description = "Signed out", body = ErrorResponse)
    ),
    tag = "readings"
)]
#[instrument(skip(state))]
pub async fn get_chart(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ChartResponse>, ErrorResponse> {
    let range_days = query.range_days();
    let series = state.service.chart(range_days, state.now())?;
    Ok(Json(ChartResponse::new(range_days, &series)))
}
