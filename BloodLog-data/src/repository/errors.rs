use std::sync::PoisonError;
use thiserror::Error;

/// Error type for collaborator operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The request never produced a usable response
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not a valid envelope
    #[error("Decode error: {0}")]
    Decode(String),

    /// The collaborator answered `success: false`
    #[error("Collaborator rejected the request: {0}")]
    Rejected(String),

    /// The collaborator refused the credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No API secret is stored, so the request was not sent
    #[error("Not signed in")]
    MissingCredential,

    /// Not found error
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Invalid collaborator configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential file could not be read or written
    #[error("Credential storage error: {0}")]
    Storage(String),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),
}

impl RepositoryError {
    /// Whether this error must end the session
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, RepositoryError::Unauthorized(_) | RepositoryError::MissingCredential)
    }
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RepositoryError::Decode(error.to_string())
        } else {
            RepositoryError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(error: serde_json::Error) -> Self {
        RepositoryError::Decode(error.to_string())
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(error: std::io::Error) -> Self {
        RepositoryError::Storage(error.to_string())
    }
}
