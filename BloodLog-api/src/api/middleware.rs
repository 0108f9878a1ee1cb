use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::entities::ErrorResponse;

/// Reject data requests while no API secret is stored
pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.service.is_signed_in() {
        return next.run(request).await;
    }

    debug!("Rejecting {} {}: signed out", request.method(), request.uri().path());
    ErrorResponse::signed_out("Please sign in first").into_response()
}
