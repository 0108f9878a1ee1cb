use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use blood_log_domain::entities::MedicalForm;

use crate::api::state::AppState;
use crate::entities::{ErrorResponse, MedicalListResponse};

/// Request body limit for the medical form; a 5 MiB image grows by a third in base64
pub const MEDICAL_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Medical visit records, newest first
#[utoipa::path(
    get,
    path = "/api/v1/medical",
    responses(
        (status = 200, description = "Visit records", body = MedicalListResponse),
        (status = 401, description = "Signed out", body = ErrorResponse),
        (status = 502, description = "Collaborator failure", body = ErrorResponse)
    ),
    tag = "medical"
)]
#[instrument(skip(state))]
pub async fn list_medical_records(
    State(state): State<AppState>,
) -> Result<Json<MedicalListResponse>, ErrorResponse> {
    let records = state.service.medical_records().await?;
    Ok(Json(records.into()))
}

/// Record a visit, optionally with a report image
#[utoipa::path(
    post,
    path = "/api/v1/medical",
    request_body = MedicalForm,
    responses(
        (status = 201, description = "Saved; the refreshed list", body = MedicalListResponse),
        (status = 400, description = "Invalid form or attachment", body = ErrorResponse),
        (status = 401, description = "Signed out", body = ErrorResponse),
        (status = 502, description = "Collaborator failure", body = ErrorResponse)
    ),
    tag = "medical"
)]
#[instrument(skip_all)]
pub async fn create_medical_record(
    State(state): State<AppState>,
    Json(form): Json<MedicalForm>,
) -> Result<(StatusCode, Json<MedicalListResponse>), ErrorResponse> {
    info!(
        check_date = %form.check_date,
        attachment = form.attachment.is_some(),
        "Creating medical record"
    );
    let records = state.service.add_medical_record(form).await?;
    Ok((StatusCode::CREATED, Json(records.into())))
}

/// Delete a visit record
#[utoipa::path(
    delete,
    path = "/api/v1/medical/{id}",
    params(("id" = String, Path, description = "Medical record id")),
    responses(
        (status = 200, description = "Deleted; the refreshed list", body = MedicalListResponse),
        (status = 404, description = "Unknown record", body = ErrorResponse),
        (status = 401, description = "Signed out", body = ErrorResponse)
    ),
    tag = "medical"
)]
#[instrument(skip(state))]
pub async fn delete_medical_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MedicalListResponse>, ErrorResponse> {
    let records = state.service.delete_medical_record(&id).await?;
    Ok(Json(records.into()))
}
