//! Session handling for BloodLog
//!
//! The collaborator issues the API secret; this module only describes the
//! login exchange and logs session events.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

// Include logging module
pub mod logging;

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LoginRequest {
    /// Collaborator account name
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Current session state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SessionStatus {
    /// Whether an API secret is stored
    pub signed_in: bool,
    /// Collaborator user the secret is used with
    pub user_id: String,
}
