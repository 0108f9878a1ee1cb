use axum::{extract::State, Json};
use tracing::{info, instrument};
use validator::Validate;

use blood_log_domain::auth::{LoginRequest, SessionStatus};
use blood_log_domain::entities::forms::describe_validation_errors;
use blood_log_domain::services::ServiceError;

use crate::api::state::AppState;
use crate::entities::ErrorResponse;

fn session_status(state: &AppState) -> SessionStatus {
    SessionStatus {
        signed_in: state.service.is_signed_in(),
        user_id: state.service.user_id().to_string(),
    }
}

/// Sign in with the collaborator account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionStatus),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Credentials refused", body = ErrorResponse),
        (status = 502, description = "Collaborator unreachable", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionStatus>, ErrorResponse> {
    info!(username = %request.username, "Login requested");
    request
        .validate()
        .map_err(|errors| ErrorResponse::validation_error(describe_validation_errors(&errors)))?;

    match state.service.login(&request.username, &request.password).await {
        Ok(()) => Ok(Json(session_status(&state))),
        Err(ServiceError::Unauthorized(msg)) => Err(ErrorResponse::invalid_credentials(msg)),
        Err(other) => Err(other.into()),
    }
}

/// Sign out and forget the stored secret
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Signed out", body = SessionStatus),
        (status = 500, description = "Secret could not be removed", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<Json<SessionStatus>, ErrorResponse> {
    state.service.logout().await?;
    info!("Session closed");
    Ok(Json(session_status(&state)))
}

/// Whether a session is active
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionStatus)
    ),
    tag = "auth"
)]
#[instrument(skip(state))]
pub async fn session(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(session_status(&state))
}
