use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Medical visit record as stored by the collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecordRow {
    #[serde(deserialize_with = "super::string_or_number", default)]
    pub id: String,

    /// Epoch milliseconds, numeric string or date string
    #[serde(default)]
    pub check_date: Value,

    /// Link to the uploaded report image, if any
    #[serde(default)]
    pub report_image_url: Option<String>,
}

/// Body of an `addMedicalRecord` action
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordPayload {
    #[serde(rename = "check_date")]
    pub check_date: i64,

    /// Base64 image content without the data-URL prefix
    pub file_data: Option<String>,

    pub file_name: Option<String>,

    pub mime_type: Option<String>,
}
