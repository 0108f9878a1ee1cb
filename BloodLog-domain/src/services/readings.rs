use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use validator::Validate;

use blood_log_data::credentials::CredentialStore;
use blood_log_data::models::Credential;
use blood_log_data::repository::{CollaboratorTrait, RepositoryError};

use crate::aggregation::{aggregate_series, batch, filter_month, recent};
use crate::auth::logging::{log_failed_login, log_forced_sign_out, log_logout, log_successful_login};
use crate::entities::conversions;
use crate::entities::forms::describe_validation_errors;
use crate::entities::{Dashboard, HistoryRow, MedicalForm, MedicalRecord, Reading, ReadingForm, SeriesPoint};

/// Number of readings listed on the dashboard
pub const DASHBOARD_RECENT_LIMIT: usize = 10;

/// Chart windows offered by the dashboard
pub const SUPPORTED_RANGES: [u32; 3] = [7, 14, 30];

const ACTION_LOGIN: &str = "login";
const ACTION_FETCH_READINGS: &str = "getBloodRecords";
const ACTION_ADD_READING: &str = "addBloodRecord";
const ACTION_UPDATE_READING: &str = "updateBloodRecord";
const ACTION_DELETE_READING: &str = "deleteBloodRecord";
const ACTION_FETCH_MEDICAL: &str = "getMedicalRecords";
const ACTION_ADD_MEDICAL: &str = "addMedicalRecord";
const ACTION_DELETE_MEDICAL: &str = "deleteMedicalRecord";

/// Reading service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The session ended; the user must sign in again
    #[error("Signed out: {0}")]
    Unauthorized(String),

    /// The collaborator failed or refused the request
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Outcome of the most recent request to the collaborator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CollaboratorContact {
    /// Nothing has been sent yet
    #[default]
    Untried,
    /// The collaborator answered, whether or not it accepted the request
    Reachable,
    /// The request failed in transport or the answer was unreadable
    Unreachable(String),
}

impl<T> From<PoisonError<T>> for ServiceError {
    fn from(error: PoisonError<T>) -> Self {
        ServiceError::Internal(error.to_string())
    }
}

/// Trait for reading service operations
#[async_trait]
pub trait ReadingServiceTrait: Send + Sync {
    /// Exchange username and password for a stored API secret
    async fn login(&self, username: &str, password: &str) -> Result<(), ServiceError>;

    /// Drop the stored secret and the cached readings
    async fn logout(&self) -> Result<(), ServiceError>;

    /// Whether an API secret is stored
    fn is_signed_in(&self) -> bool;

    /// Collaborator user id attached to every request
    fn user_id(&self) -> &str;

    /// How the last collaborator request went
    fn last_contact(&self) -> CollaboratorContact;

    /// Fetch every reading and replace the cache
    async fn refresh_readings(&self) -> Result<Vec<Reading>, ServiceError>;

    /// Current cache contents
    fn cached_readings(&self) -> Result<Vec<Reading>, ServiceError>;

    /// Add a reading, then refresh
    async fn create_reading(&self, form: ReadingForm) -> Result<Vec<Reading>, ServiceError>;

    /// Replace a reading, then refresh
    async fn update_reading(&self, id: &str, form: ReadingForm) -> Result<Vec<Reading>, ServiceError>;

    /// Delete a reading, then refresh
    async fn delete_reading(&self, id: &str) -> Result<Vec<Reading>, ServiceError>;

    /// Refresh and build the dashboard for a chart window ending at `now`
    async fn dashboard(&self, range_days: u32, now: DateTime<FixedOffset>) -> Result<Dashboard, ServiceError>;

    /// Refresh and build the batched history of one month
    async fn history(&self, year: i32, month: u32, tz: FixedOffset) -> Result<Vec<HistoryRow>, ServiceError>;

    /// Chart series over the cached readings
    fn chart(&self, range_days: u32, now: DateTime<FixedOffset>) -> Result<Vec<SeriesPoint>, ServiceError>;

    /// Fetch medical visit records, newest first
    async fn medical_records(&self) -> Result<Vec<MedicalRecord>, ServiceError>;

    /// Add a medical visit record and return the updated list
    async fn add_medical_record(&self, form: MedicalForm) -> Result<Vec<MedicalRecord>, ServiceError>;

    /// Delete a medical visit record and return the updated list
    async fn delete_medical_record(&self, id: &str) -> Result<Vec<MedicalRecord>, ServiceError>;
}

/// View-state controller over the collaborator.
///
/// Owns the reading cache. Each mutation holds `mutation` until the refresh that
/// follows it has swapped the cache, so an older fetch can never land after a
/// newer one.
pub struct ReadingService<C: CollaboratorTrait> {
    collaborator: C,
    credentials: CredentialStore,
    user_id: String,
    cache: RwLock<Vec<Reading>>,
    mutation: Mutex<()>,
    contact: RwLock<CollaboratorContact>,
}

impl<C: CollaboratorTrait> ReadingService<C> {
    /// Create a new reading service
    pub fn new(collaborator: C, credentials: CredentialStore, user_id: impl Into<String>) -> Self {
        Self {
            collaborator,
            credentials,
            user_id: user_id.into(),
            cache: RwLock::new(Vec::new()),
            mutation: Mutex::new(()),
            contact: RwLock::new(CollaboratorContact::Untried),
        }
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    /// Credential for the next request; a missing secret ends the session
    /// before anything is sent
    fn credential(&self, action: &str) -> Result<Credential, ServiceError> {
        let secret = self
            .credentials
            .get()
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        match secret {
            Some(api_secret) => Ok(Credential {
                api_secret,
                user_id: self.user_id.clone(),
            }),
            None => Err(self.map_repo_error(action, RepositoryError::MissingCredential)),
        }
    }

    fn note_contact(&self, contact: CollaboratorContact) {
        match self.contact.write() {
            Ok(mut last) => *last = contact,
            Err(e) => error!("Failed to record collaborator contact: {}", e),
        }
    }

    fn force_sign_out(&self, action: &str, reason: &str) {
        if let Err(e) = self.credentials.clear() {
            error!("Failed to clear stored API secret: {}", e);
        }
        match self.cache.write() {
            Ok(mut cache) => cache.clear(),
            Err(e) => error!("Failed to clear reading cache: {}", e),
        }
        log_forced_sign_out(&self.user_id, action, reason);
    }

    /// Map repository errors to service errors, ending the session on
    /// authorization failures
    fn map_repo_error(&self, action: &str, err: RepositoryError) -> ServiceError {
        match &err {
            RepositoryError::Network(_) | RepositoryError::Decode(_) => {
                self.note_contact(CollaboratorContact::Unreachable(err.to_string()))
            }
            RepositoryError::Unauthorized(_) | RepositoryError::Rejected(_) | RepositoryError::NotFound(_) => {
                self.note_contact(CollaboratorContact::Reachable)
            }
            _ => {}
        }

        if err.is_authorization_failure() {
            let reason = err.to_string();
            self.force_sign_out(action, &reason);
            return ServiceError::Unauthorized(reason);
        }

        warn!(action, "Collaborator request failed: {}", err);
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::Rejected(msg) => ServiceError::Collaborator(msg),
            RepositoryError::Network(_) | RepositoryError::Decode(_) => {
                ServiceError::Collaborator(err.to_string())
            }
            other => ServiceError::Internal(other.to_string()),
        }
    }

    fn validate_reading_form(&self, form: &ReadingForm) -> Result<(), ServiceError> {
        form.validate()
            .map_err(|errors| ServiceError::Validation(describe_validation_errors(&errors)))
    }

    fn validate_medical_form(&self, form: &MedicalForm) -> Result<(), ServiceError> {
        form.validate()
            .map_err(|errors| ServiceError::Validation(describe_validation_errors(&errors)))
    }

    fn validate_range(&self, range_days: u32) -> Result<(), ServiceError> {
        if SUPPORTED_RANGES.contains(&range_days) {
            Ok(())
        } else {
            Err(ServiceError::Validation(format!(
                "Chart range must be one of {:?} days",
                SUPPORTED_RANGES
            )))
        }
    }

    /// Fetch and swap the cache; the caller holds `mutation`
    async fn refresh_locked(&self) -> Result<Vec<Reading>, ServiceError> {
        let credential = self.credential(ACTION_FETCH_READINGS)?;
        let records = self
            .collaborator
            .fetch_blood_records(&credential)
            .await
            .map_err(|e| self.map_repo_error(ACTION_FETCH_READINGS, e))?;

        self.note_contact(CollaboratorContact::Reachable);

        let readings: Vec<Reading> = records.iter().map(conversions::convert_to_domain_reading).collect();
        debug!("Fetched {} readings from collaborator", readings.len());

        *self.cache.write()? = readings.clone();
        Ok(readings)
    }

    async fn fetch_medical(&self) -> Result<Vec<MedicalRecord>, ServiceError> {
        let credential = self.credential(ACTION_FETCH_MEDICAL)?;
        let rows = self
            .collaborator
            .fetch_medical_records(&credential)
            .await
            .map_err(|e| self.map_repo_error(ACTION_FETCH_MEDICAL, e))?;

        self.note_contact(CollaboratorContact::Reachable);

        let mut records: Vec<MedicalRecord> = rows.iter().map(conversions::convert_to_domain_medical).collect();
        records.sort_by(|a, b| b.check_date.cmp(&a.check_date));
        Ok(records)
    }
}

#[async_trait]
impl<C: CollaboratorTrait> ReadingServiceTrait for ReadingService<C> {
    async fn login(&self, username: &str, password: &str) -> Result<(), ServiceError> {
        let api_secret = match self.collaborator.login(username, password).await {
            Ok(secret) => {
                self.note_contact(CollaboratorContact::Reachable);
                secret
            }
            Err(e) => {
                log_failed_login(username, &e.to_string());
                return Err(match e {
                    RepositoryError::Rejected(msg) | RepositoryError::Unauthorized(msg) => {
                        self.note_contact(CollaboratorContact::Reachable);
                        ServiceError::Unauthorized(msg)
                    }
                    other => self.map_repo_error(ACTION_LOGIN, other),
                });
            }
        };

        self.credentials
            .set(&api_secret)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        log_successful_login(username);
        Ok(())
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        self.credentials
            .clear()
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.cache.write()?.clear();
        log_logout(&self.user_id);
        Ok(())
    }

    fn is_signed_in(&self) -> bool {
        self.credentials.is_signed_in()
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn last_contact(&self) -> CollaboratorContact {
        match self.contact.read() {
            Ok(last) => last.clone(),
            Err(e) => CollaboratorContact::Unreachable(e.to_string()),
        }
    }

    async fn refresh_readings(&self) -> Result<Vec<Reading>, ServiceError> {
        let _guard = self.mutation.lock().await;
        self.refresh_locked().await
    }

    fn cached_readings(&self) -> Result<Vec<Reading>, ServiceError> {
        Ok(self.cache.read()?.clone())
    }

    async fn create_reading(&self, form: ReadingForm) -> Result<Vec<Reading>, ServiceError> {
        self.validate_reading_form(&form)?;
        let payload = conversions::convert_to_data_blood_payload(&form, None)
            .map_err(ServiceError::Validation)?;

        let _guard = self.mutation.lock().await;
        let credential = self.credential(ACTION_ADD_READING)?;
        self.collaborator
            .add_blood_record(&credential, &payload)
            .await
            .map_err(|e| self.map_repo_error(ACTION_ADD_READING, e))?;

        info!("Reading saved for {}", payload.date);
        self.refresh_locked().await
    }

    async fn update_reading(&self, id: &str, form: ReadingForm) -> Result<Vec<Reading>, ServiceError> {
        if id.trim().is_empty() {
            return Err(ServiceError::Validation("Reading id is required".to_string()));
        }
        self.validate_reading_form(&form)?;
        let payload = conversions::convert_to_data_blood_payload(&form, Some(id.to_string()))
            .map_err(ServiceError::Validation)?;

        let _guard = self.mutation.lock().await;
        let credential = self.credential(ACTION_UPDATE_READING)?;
        self.collaborator
            .update_blood_record(&credential, &payload)
            .await
            .map_err(|e| self.map_repo_error(ACTION_UPDATE_READING, e))?;

        info!("Reading {} updated", id);
        self.refresh_locked().await
    }

    async fn delete_reading(&self, id: &str) -> Result<Vec<Reading>, ServiceError> {
        if id.trim().is_empty() {
            return Err(ServiceError::Validation("Reading id is required".to_string()));
        }
        let _guard = self.mutation.lock().await;
        let credential = self.credential(ACTION_DELETE_READING)?;
        self.collaborator
            .delete_blood_record(&credential, id)
            .await
            .map_err(|e| self.map_repo_error(ACTION_DELETE_READING, e))?;

        info!("Reading {} deleted", id);
        self.refresh_locked().await
    }

    async fn dashboard(&self, range_days: u32, now: DateTime<FixedOffset>) -> Result<Dashboard, ServiceError> {
        self.validate_range(range_days)?;
        let readings = self.refresh_readings().await?;

        let recent = recent(&readings, DASHBOARD_RECENT_LIMIT)
            .iter()
            .map(conversions::convert_to_display_reading)
            .collect();
        let series = aggregate_series(&readings, range_days, &now);

        Ok(Dashboard {
            range_days,
            recent,
            series,
        })
    }

    async fn history(&self, year: i32, month: u32, tz: FixedOffset) -> Result<Vec<HistoryRow>, ServiceError> {
        if !(1..=12).contains(&month) {
            return Err(ServiceError::Validation(format!("Invalid month: {}", month)));
        }
        let readings = self.refresh_readings().await?;

        let month_readings = filter_month(&readings, year, month, &tz);
        Ok(batch(&month_readings, &tz)
            .iter()
            .map(conversions::convert_to_history_row)
            .collect())
    }

    fn chart(&self, range_days: u32, now: DateTime<FixedOffset>) -> Result<Vec<SeriesPoint>, ServiceError> {
        self.validate_range(range_days)?;
        let readings = self.cache.read()?;
        Ok(aggregate_series(&readings, range_days, &now))
    }

    async fn medical_records(&self) -> Result<Vec<MedicalRecord>, ServiceError> {
        self.fetch_medical().await
    }

    async fn add_medical_record(&self, form: MedicalForm) -> Result<Vec<MedicalRecord>, ServiceError> {
        self.validate_medical_form(&form)?;
        let payload = conversions::convert_to_data_medical_payload(&form);

        let credential = self.credential(ACTION_ADD_MEDICAL)?;
        self.collaborator
            .add_medical_record(&credential, &payload)
            .await
            .map_err(|e| self.map_repo_error(ACTION_ADD_MEDICAL, e))?;

        info!("Medical record saved for {}", form.check_date);
        self.fetch_medical().await
    }

    async fn delete_medical_record(&self, id: &str) -> Result<Vec<MedicalRecord>, ServiceError> {
        if id.trim().is_empty() {
            return Err(ServiceError::Validation("Medical record id is required".to_string()));
        }
        let credential = self.credential(ACTION_DELETE_MEDICAL)?;
        self.collaborator
            .delete_medical_record(&credential, id)
            .await
            .map_err(|e| self.map_repo_error(ACTION_DELETE_MEDICAL, e))?;

        info!("Medical record {} deleted", id);
        self.fetch_medical().await
    }
}
