use serde::{Deserialize, Serialize};

use crate::repository::RepositoryError;

/// Uniform response envelope returned by every collaborator action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,

    pub data: Option<T>,

    #[serde(default)]
    pub message: Option<String>,

    /// Only present on a successful `login`
    #[serde(default, rename = "apiSecret")]
    pub api_secret: Option<String>,
}

/// Markers the collaborator uses when it rejects the caller's credential.
/// The deployed script answers in Traditional Chinese ("權限" = permission).
const PERMISSION_MARKERS: [&str; 4] = ["權限", "permission", "unauthorized", "forbidden"];

/// Whether a rejection message reports a credential or permission problem
pub fn is_permission_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    PERMISSION_MARKERS.iter().any(|marker| lowered.contains(marker))
}

impl<T> ApiEnvelope<T> {
    /// Build a successful envelope
    pub fn ok(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            message: None,
            api_secret: None,
        }
    }

    /// Build a rejected envelope
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            api_secret: None,
        }
    }

    /// Turn the envelope into its payload, classifying rejections
    pub fn into_result(self) -> Result<Self, RepositoryError> {
        if self.success {
            return Ok(self);
        }

        let message = self.message.unwrap_or_else(|| "request rejected".to_string());
        if is_permission_message(&message) {
            Err(RepositoryError::Unauthorized(message))
        } else {
            Err(RepositoryError::Rejected(message))
        }
    }
}

/// API secret plus the user it was issued for, attached to every non-login action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub api_secret: String,
    pub user_id: String,
}

/// Outgoing action request: `{ "action": ..., <body fields>, "apiSecret", "userId" }`
#[derive(Debug, Serialize)]
pub struct ActionRequest<'a, B: Serialize> {
    pub action: &'a str,

    #[serde(flatten)]
    pub body: B,

    #[serde(rename = "apiSecret", skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<&'a str>,

    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

impl<'a, B: Serialize> ActionRequest<'a, B> {
    /// Request that carries the caller's credential
    pub fn authenticated(action: &'a str, body: B, credential: &'a Credential) -> Self {
        Self {
            action,
            body,
            api_secret: Some(credential.api_secret.as_str()),
            user_id: Some(credential.user_id.as_str()),
        }
    }

    /// Request sent without a credential (only `login`)
    pub fn anonymous(action: &'a str, body: B) -> Self {
        Self {
            action,
            body,
            api_secret: None,
            user_id: None,
        }
    }
}
