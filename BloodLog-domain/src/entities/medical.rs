use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Medical visit with an optional scanned report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MedicalRecord {
    pub id: String,

    /// `YYYY-MM-DD` label of the visit
    pub day: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_image_url: Option<String>,
}
