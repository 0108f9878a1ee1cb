use async_trait::async_trait;

use crate::models::{BloodRecord, BloodRecordPayload, Credential, MedicalRecordPayload, MedicalRecordRow};
use super::errors::RepositoryError;

/// Operations offered by the remote collaborator.
///
/// Every method except `login` requires the caller's credential. Implementations
/// report a refused credential as [`RepositoryError::Unauthorized`]; deciding
/// what to do about it is left to the caller.
#[async_trait]
pub trait CollaboratorTrait: Send + Sync {
    /// Exchange username and password for an API secret
    async fn login(&self, username: &str, password: &str) -> Result<String, RepositoryError>;

    /// Fetch every blood pressure record
    async fn fetch_blood_records(&self, credential: &Credential) -> Result<Vec<BloodRecord>, RepositoryError>;

    /// Add a blood pressure record
    async fn add_blood_record(
        &self,
        credential: &Credential,
        payload: &BloodRecordPayload,
    ) -> Result<(), RepositoryError>;

    /// Replace the record with the payload's id
    async fn update_blood_record(
        &self,
        credential: &Credential,
        payload: &BloodRecordPayload,
    ) -> Result<(), RepositoryError>;

    /// Delete a blood pressure record by id
    async fn delete_blood_record(&self, credential: &Credential, id: &str) -> Result<(), RepositoryError>;

    /// Fetch every medical visit record
    async fn fetch_medical_records(&self, credential: &Credential) -> Result<Vec<MedicalRecordRow>, RepositoryError>;

    /// Add a medical visit record, uploading the attachment if present
    async fn add_medical_record(
        &self,
        credential: &Credential,
        payload: &MedicalRecordPayload,
    ) -> Result<(), RepositoryError>;

    /// Delete a medical visit record by id
    async fn delete_medical_record(&self, credential: &Credential, id: &str) -> Result<(), RepositoryError>;
}
