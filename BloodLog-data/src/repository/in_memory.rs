use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::models::{BloodRecord, BloodRecordPayload, Credential, MedicalRecordPayload, MedicalRecordRow};
use super::collaborator::CollaboratorTrait;
use super::errors::RepositoryError;

/// Message the deployed collaborator sends when the secret is wrong
const PERMISSION_DENIED: &str = "權限不足：API secret 無效";

#[derive(Debug, Default)]
struct State {
    blood_records: Vec<BloodRecord>,
    medical_records: Vec<MedicalRecordRow>,
    issued_secret: Option<String>,
    offline: bool,
    reject_writes: Option<String>,
}

/// In-process collaborator used for offline runs and tests.
///
/// Behaves like the remote script: issues a secret on login, checks it on every
/// other action, assigns ids and keeps rows in insertion order. Clones share
/// the same storage.
#[derive(Debug, Clone)]
pub struct InMemoryCollaborator {
    username: String,
    password: String,
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryCollaborator {
    fn default() -> Self {
        Self::new("admin", "admin")
    }
}

impl InMemoryCollaborator {
    /// Create an empty collaborator accepting the given login
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Preload blood pressure records
    pub fn with_blood_records(self, records: Vec<BloodRecord>) -> Result<Self, RepositoryError> {
        self.state.lock()?.blood_records.extend(records);
        Ok(self)
    }

    /// Preload medical visit records
    pub fn with_medical_records(self, records: Vec<MedicalRecordRow>) -> Result<Self, RepositoryError> {
        self.state.lock()?.medical_records.extend(records);
        Ok(self)
    }

    /// Issue a secret up front, as if `login` had already happened
    pub fn with_issued_secret(self, secret: impl Into<String>) -> Result<Self, RepositoryError> {
        self.state.lock()?.issued_secret = Some(secret.into());
        Ok(self)
    }

    /// Simulate the endpoint being unreachable
    pub fn set_offline(&self, offline: bool) -> Result<(), RepositoryError> {
        self.state.lock()?.offline = offline;
        Ok(())
    }

    /// Make every write action fail with the given rejection message
    pub fn reject_writes(&self, message: Option<String>) -> Result<(), RepositoryError> {
        self.state.lock()?.reject_writes = message;
        Ok(())
    }

    /// Forget the issued secret, so the next authenticated call is refused
    pub fn revoke_secret(&self) -> Result<(), RepositoryError> {
        self.state.lock()?.issued_secret = None;
        Ok(())
    }

    /// Snapshot of the stored blood pressure records
    pub fn blood_records(&self) -> Result<Vec<BloodRecord>, RepositoryError> {
        Ok(self.state.lock()?.blood_records.clone())
    }

    fn authorize(state: &State, credential: &Credential) -> Result<(), RepositoryError> {
        if state.offline {
            return Err(RepositoryError::Network("collaborator unreachable".to_string()));
        }
        match &state.issued_secret {
            Some(secret) if *secret == credential.api_secret => Ok(()),
            _ => Err(RepositoryError::Unauthorized(PERMISSION_DENIED.to_string())),
        }
    }

    fn authorize_write(state: &State, credential: &Credential) -> Result<(), RepositoryError> {
        Self::authorize(state, credential)?;
        match &state.reject_writes {
            Some(message) => Err(RepositoryError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollaboratorTrait for InMemoryCollaborator {
    async fn login(&self, username: &str, password: &str) -> Result<String, RepositoryError> {
        let mut state = self.state.lock()?;
        if state.offline {
            return Err(RepositoryError::Network("collaborator unreachable".to_string()));
        }
        if username != self.username || password != self.password {
            return Err(RepositoryError::Rejected("帳號或密碼錯誤".to_string()));
        }

        let secret = state
            .issued_secret
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        debug!("Issued in-memory API secret for {}", username);
        Ok(secret)
    }

    async fn fetch_blood_records(&self, credential: &Credential) -> Result<Vec<BloodRecord>, RepositoryError> {
        let state = self.state.lock()?;
        Self::authorize(&state, credential)?;
        Ok(state.blood_records.clone())
    }

    async fn add_blood_record(
        &self,
        credential: &Credential,
        payload: &BloodRecordPayload,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        Self::authorize_write(&state, credential)?;

        let id = Uuid::new_v4().to_string();
        debug!("Storing blood record in memory: id={}", id);
        state.blood_records.push(payload.to_record(id));
        Ok(())
    }

    async fn update_blood_record(
        &self,
        credential: &Credential,
        payload: &BloodRecordPayload,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        Self::authorize_write(&state, credential)?;

        let id = payload
            .id
            .clone()
            .ok_or_else(|| RepositoryError::NotFound("update without a record id".to_string()))?;
        let slot = state
            .blood_records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        *slot = payload.to_record(id);
        Ok(())
    }

    async fn delete_blood_record(&self, credential: &Credential, id: &str) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        Self::authorize_write(&state, credential)?;

        let before = state.blood_records.len();
        state.blood_records.retain(|record| record.id != id);
        if state.blood_records.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn fetch_medical_records(&self, credential: &Credential) -> Result<Vec<MedicalRecordRow>, RepositoryError> {
        let state = self.state.lock()?;
        Self::authorize(&state, credential)?;
        Ok(state.medical_records.clone())
    }

    async fn add_medical_record(
        &self,
        credential: &Credential,
        payload: &MedicalRecordPayload,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        Self::authorize_write(&state, credential)?;

        let id = Uuid::new_v4().to_string();
        // Stand-in for the drive link the real collaborator returns after upload
        let report_image_url = payload
            .file_name
            .as_ref()
            .filter(|_| payload.file_data.is_some())
            .map(|name| format!("memory://reports/{}/{}", id, name));

        state.medical_records.push(MedicalRecordRow {
            id,
            check_date: Value::from(payload.check_date),
            report_image_url,
        });
        Ok(())
    }

    async fn delete_medical_record(&self, credential: &Credential, id: &str) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        Self::authorize_write(&state, credential)?;

        let before = state.medical_records.len();
        state.medical_records.retain(|record| record.id != id);
        if state.medical_records.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
