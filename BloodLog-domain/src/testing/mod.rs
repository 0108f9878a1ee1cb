// Testing utilities for the domain layer
// This module is only available when the "mock" feature is enabled

use serde_json::{json, Value};

use blood_log_data::credentials::CredentialStore;
use blood_log_data::models::{BloodRecord, MedicalRecordRow};
use blood_log_data::repository::RepositoryError;

// Re-export the in-memory collaborator from the data layer
pub use blood_log_data::repository::InMemoryCollaborator;

use crate::services::ReadingService;

/// Login accepted by the fixture collaborator
pub const MOCK_USERNAME: &str = "admin";
pub const MOCK_PASSWORD: &str = "admin";

/// Secret already issued by the fixture collaborator
pub const MOCK_SECRET: &str = "mock-api-secret";

/// Collaborator user id used by the fixtures
pub const MOCK_USER_ID: &str = "admin-user-001";

/// Build a stored row the way the collaborator returns it
pub fn blood_record(id: &str, date: Value, first: (u16, u16, u16), second: Option<(u16, u16, u16)>) -> BloodRecord {
    let (sbp_2, dbp_2, pulse_2) = match second {
        Some((s, d, p)) => (json!(s), json!(d), json!(p)),
        None => (json!(""), json!(""), json!("")),
    };

    BloodRecord {
        id: id.to_string(),
        date,
        time_slot: Some("morning".to_string()),
        sbp_1: json!(first.0),
        dbp_1: json!(first.1),
        pulse_1: json!(first.2),
        sbp_2,
        dbp_2,
        pulse_2,
    }
}

/// A few weeks of readings in March 2024, one with a repeat measurement
pub fn sample_blood_records() -> Vec<BloodRecord> {
    vec![
        blood_record("r1", json!("2024-03-20"), (118, 76, 66), None),
        blood_record("r2", json!("2024-03-19"), (132, 86, 72), Some((128, 84, 70))),
        blood_record("r3", json!("2024-03-12"), (142, 92, 80), None),
        blood_record("r4", json!("2024-03-11"), (124, 78, 68), None),
        blood_record("r5", json!("2024-02-28"), (121, 79, 64), None),
    ]
}

/// One medical visit with a report image
pub fn sample_medical_records() -> Vec<MedicalRecordRow> {
    vec![MedicalRecordRow {
        id: "m1".to_string(),
        check_date: json!("2024-03-01"),
        report_image_url: Some("memory://reports/m1/report.png".to_string()),
    }]
}

/// Fixture collaborator seeded with the sample records and an issued secret
pub fn mock_collaborator() -> Result<InMemoryCollaborator, RepositoryError> {
    InMemoryCollaborator::new(MOCK_USERNAME, MOCK_PASSWORD)
        .with_issued_secret(MOCK_SECRET)?
        .with_blood_records(sample_blood_records())?
        .with_medical_records(sample_medical_records())
}

/// Reading service over the fixture collaborator, not yet signed in
pub fn create_mock_reading_service() -> Result<ReadingService<InMemoryCollaborator>, RepositoryError> {
    Ok(ReadingService::new(mock_collaborator()?, CredentialStore::in_memory(), MOCK_USER_ID))
}

/// Reading service over the fixture collaborator with the secret already stored
pub fn create_signed_in_reading_service() -> Result<ReadingService<InMemoryCollaborator>, RepositoryError> {
    let credentials = CredentialStore::in_memory();
    credentials.set(MOCK_SECRET)?;
    Ok(ReadingService::new(mock_collaborator()?, credentials, MOCK_USER_ID))
}
