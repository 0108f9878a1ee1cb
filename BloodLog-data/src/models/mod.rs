pub mod blood_record;
pub mod envelope;
pub mod medical_record;

pub use blood_record::{BloodRecord, BloodRecordPayload};
pub use envelope::{ActionRequest, ApiEnvelope, Credential};
pub use medical_record::{MedicalRecordPayload, MedicalRecordRow};

use serde::{Deserialize, Deserializer};

/// Accept an identifier the collaborator may send either as a string or a number
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
