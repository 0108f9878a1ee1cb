use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use blood_log_domain::aggregation::recent;
use blood_log_domain::entities::conversions::convert_to_display_reading;
use blood_log_domain::entities::{Reading, ReadingForm};

use crate::api::state::AppState;
use crate::entities::{ErrorResponse, ReadingListResponse};

fn reading_list(readings: &[Reading]) -> ReadingListResponse {
    ReadingListResponse {
        total: readings.len(),
        readings: recent(readings, readings.len())
            .iter()
            .map(convert_to_display_reading)
            .collect(),
    }
}

/// Record a new reading
#[utoipa::path(
    post,
    path = "/api/v1/readings",
    request_body = ReadingForm,
    responses(
        (status = 201, description = "Saved; the refreshed list", body = ReadingListResponse),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
        (status = 401, description = "Signed out", body = ErrorResponse),
        (status = 502, description = "Collaborator failure", body = ErrorResponse)
    ),
    tag = "readings"
)]
#[instrument(skip(state))]
pub async fn create_reading(
    State(state): State<AppState>,
    Json(form): Json<ReadingForm>,
) -> Result<(StatusCode, Json<ReadingListResponse>), ErrorResponse> {
    info!("Creating reading for {}", form.date);
    let readings = state.service.create_reading(form).await?;
    Ok((StatusCode::CREATED, Json(reading_list(&readings))))
}

/// Replace an existing reading
#[utoipa::path(
    put,
    path = "/api/v1/readings/{id}",
    params(("id" = String, Path, description = "Reading id")),
    request_body = ReadingForm,
    responses(
        (status = 200, description = "Saved; the refreshed list", body = ReadingListResponse),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
        (status = 404, description = "Unknown reading", body = ErrorResponse),
        (status = 401, description = "Signed out", body = ErrorResponse)
    ),
    tag = "readings"
)]
#[instrument(skip(state))]
pub async fn update_reading(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ReadingForm>,
) -> Result<Json<ReadingListResponse>, ErrorResponse> {
    let readings = state.service.update_reading(&id, form).await?;
    Ok(Json(reading_list(&readings)))
}

/// Delete a reading
#[utoipa::path(
    delete,
    path = "/api/v1/readings/{id}",
    params(("id" = String, Path, description = "Reading id")),
    responses(
        (status = 200, description = "Deleted; the refreshed list", body = ReadingListResponse),
        (status = 404, description = "Unknown reading", body = ErrorResponse),
        (status = 401, description = "Signed out", body = ErrorResponse)
    ),
    tag = "readings"
)]
#[instrument(skip(state))]
pub async fn delete_reading(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReadingListResponse>, ErrorResponse> {
    let readings = state.service.delete_reading(&id).await?;
    Ok(Json(reading_list(&readings)))
}
