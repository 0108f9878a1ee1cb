use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use blood_log_domain::services::ServiceError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a not found error response
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    /// Create a validation error response
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// The session is gone; the client must show the login screen
    pub fn signed_out(message: impl Into<String>) -> Self {
        Self::new("signed_out", message)
    }

    /// Username or password refused by the collaborator
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new("invalid_credentials", message)
    }

    /// The collaborator failed or refused the request
    pub fn collaborator_error(message: impl Into<String>) -> Self {
        Self::new("collaborator_error", message)
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred")
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "signed_out" | "invalid_credentials" => StatusCode::UNAUTHORIZED,
            "collaborator_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::validation_error(msg),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Unauthorized(msg) => {
                warn!("Request ended the session: {}", msg);
                Self::signed_out("Your session has ended, please sign in again")
            }
            ServiceError::Collaborator(msg) => {
                warn!("Collaborator error: {}", msg);
                Self::collaborator_error(msg)
            }
            ServiceError::Internal(msg) => {
                error!("Internal error: {}", msg);
                Self::internal_error()
            }
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST, "validation_error"),
            (ServiceError::NotFound("r9".into()), StatusCode::NOT_FOUND, "not_found"),
            (ServiceError::Unauthorized("revoked".into()), StatusCode::UNAUTHORIZED, "signed_out"),
            (ServiceError::Collaborator("down".into()), StatusCode::BAD_GATEWAY, "collaborator_error"),
            (ServiceError::Internal("poisoned".into()), StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        ];

        for (err, status, code) in cases {
            let body = ErrorResponse::from(err);
            assert_eq!(body.status(), status);
            assert_eq!(body.error, code);
        }
    }

    #[test]
    fn test_collaborator_message_is_kept() {
        let body = ErrorResponse::from(ServiceError::Collaborator("Sheet is read only".into()));
        assert_eq!(body.message, "Sheet is read only");

        // internal details stay in the log
        let body = ErrorResponse::from(ServiceError::Internal("lock poisoned".into()));
        assert_eq!(body.message, "An unexpected error occurred");
    }
}
