use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, warn};

use crate::models::{
    ActionRequest, ApiEnvelope, BloodRecord, BloodRecordPayload, Credential, MedicalRecordPayload,
    MedicalRecordRow,
};
use super::collaborator::CollaboratorTrait;
use super::errors::RepositoryError;

/// Content type the collaborator expects; a plain-text body avoids a CORS preflight
const CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// Collaborator reached over HTTP through its single action endpoint
#[derive(Debug, Clone)]
pub struct RemoteCollaborator {
    client: Client,
    endpoint: String,
}

impl RemoteCollaborator {
    /// Create a collaborator client for the given endpoint URL
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, RepositoryError> {
        let endpoint = endpoint.trim().to_string();

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(RepositoryError::Config(format!(
                "collaborator URL must start with http:// or https://, got: {}",
                endpoint
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepositoryError::Config(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one action and decode the envelope
    async fn post_action<B, T>(&self, request: &ActionRequest<'_, B>) -> Result<ApiEnvelope<T>, RepositoryError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        debug!("Posting collaborator action: {}", request.action);

        let body = serde_json::to_string(request)?;
        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Collaborator action {} failed: {}", request.action, e);
                RepositoryError::from(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        let envelope: ApiEnvelope<T> = serde_json::from_str(&text).map_err(|e| {
            warn!("Collaborator returned an unreadable body (HTTP {}): {}", status, e);
            RepositoryError::Decode(format!("HTTP {}: {}", status, e))
        })?;

        envelope.into_result()
    }

    async fn post_authenticated<B, T>(
        &self,
        action: &str,
        body: B,
        credential: &Credential,
    ) -> Result<ApiEnvelope<T>, RepositoryError>
    where
        B: Serialize + Send + Sync,
        T: DeserializeOwned + Send,
    {
        let request = ActionRequest::authenticated(action, body, credential);
        self.post_action(&request).await
    }
}

#[async_trait]
impl CollaboratorTrait for RemoteCollaborator {
    async fn login(&self, username: &str, password: &str) -> Result<String, RepositoryError> {
        let request = ActionRequest::anonymous("login", json!({ "username": username, "password": password }));
        let envelope: ApiEnvelope<Value> = self.post_action(&request).await?;

        envelope
            .api_secret
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| RepositoryError::Decode("login succeeded without an apiSecret".to_string()))
    }

    async fn fetch_blood_records(&self, credential: &Credential) -> Result<Vec<BloodRecord>, RepositoryError> {
        let envelope: ApiEnvelope<Vec<BloodRecord>> =
            self.post_authenticated("getBloodRecords", Map::new(), credential).await?;
        let records = envelope.data.unwrap_or_default();
        debug!("Fetched {} blood records", records.len());
        Ok(records)
    }

    async fn add_blood_record(
        &self,
        credential: &Credential,
        payload: &BloodRecordPayload,
    ) -> Result<(), RepositoryError> {
        let _: ApiEnvelope<Value> = self.post_authenticated("addBloodRecord", payload, credential).await?;
        Ok(())
    }

    async fn update_blood_record(
        &self,
        credential: &Credential,
        payload: &BloodRecordPayload,
    ) -> Result<(), RepositoryError> {
        if payload.id.is_none() {
            return Err(RepositoryError::NotFound("update without a record id".to_string()));
        }
        let _: ApiEnvelope<Value> = self.post_authenticated("updateBloodRecord", payload, credential).await?;
        Ok(())
    }

    async fn delete_blood_record(&self, credential: &Credential, id: &str) -> Result<(), RepositoryError> {
        let _: ApiEnvelope<Value> = self
            .post_authenticated("deleteBloodRecord", json!({ "id": id }), credential)
            .await?;
        Ok(())
    }

    async fn fetch_medical_records(&self, credential: &Credential) -> Result<Vec<MedicalRecordRow>, RepositoryError> {
        let envelope: ApiEnvelope<Vec<MedicalRecordRow>> =
            self.post_authenticated("getMedicalRecords", Map::new(), credential).await?;
        let records = envelope.data.unwrap_or_default();
        debug!("Fetched {} medical records", records.len());
        Ok(records)
    }

    async fn add_medical_record(
        &self,
        credential: &Credential,
        payload: &MedicalRecordPayload,
    ) -> Result<(), RepositoryError> {
        let _: ApiEnvelope<Value> = self.post_authenticated("addMedicalRecord", payload, credential).await?;
        Ok(())
    }

    async fn delete_medical_record(&self, credential: &Credential, id: &str) -> Result<(), RepositoryError> {
        let _: ApiEnvelope<Value> = self
            .post_authenticated("deleteMedicalRecord", json!({ "id": id }), credential)
            .await?;
        Ok(())
    }
}
