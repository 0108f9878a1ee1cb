//! Storage for the API secret handed out by the collaborator at login.
//!
//! The secret lives in memory and, when a path is configured, in a small JSON
//! file so the session survives a restart.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::repository::RepositoryError;

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    api_secret: String,
}

/// Process-wide holder of the current API secret. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    path: Option<PathBuf>,
    secret: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Store backed by a file; an existing file restores the previous session
    pub fn with_file(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let secret = Self::load(&path)?;
        if secret.is_some() {
            debug!("Restored stored API secret from {}", path.display());
        }

        Ok(Self {
            path: Some(path),
            secret: Arc::new(RwLock::new(secret)),
        })
    }

    fn load(path: &Path) -> Result<Option<String>, RepositoryError> {
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(path)?;
        match serde_json::from_str::<StoredCredential>(&text) {
            Ok(stored) if !stored.api_secret.is_empty() => Ok(Some(stored.api_secret)),
            Ok(_) => Ok(None),
            Err(e) => {
                warn!("Ignoring unreadable credential file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Current secret, if signed in
    pub fn get(&self) -> Result<Option<String>, RepositoryError> {
        Ok(self.secret.read()?.clone())
    }

    /// Whether a secret is stored
    pub fn is_signed_in(&self) -> bool {
        self.secret.read().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Replace the stored secret
    pub fn set(&self, api_secret: &str) -> Result<(), RepositoryError> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let body = serde_json::to_string(&StoredCredential {
                api_secret: api_secret.to_string(),
            })?;
            fs::write(path, body)?;
        }

        *self.secret.write()? = Some(api_secret.to_string());
        Ok(())
    }

    /// Forget the secret
    pub fn clear(&self) -> Result<(), RepositoryError> {
        *self.secret.write()? = None;

        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
