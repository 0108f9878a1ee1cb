use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Blood pressure record as stored by the collaborator.
///
/// The collaborator is a spreadsheet-backed script, so numeric columns come back
/// as numbers or strings depending on how the row was written. Those columns are
/// kept as raw JSON here and coerced by the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloodRecord {
    /// Identifier assigned by the collaborator
    #[serde(deserialize_with = "super::string_or_number", default)]
    pub id: String,

    /// Epoch milliseconds, numeric string or date string
    #[serde(default)]
    pub date: Value,

    /// "morning" or "evening"
    #[serde(default)]
    pub time_slot: Option<String>,

    /// First systolic measurement
    #[serde(default)]
    pub sbp_1: Value,

    /// First diastolic measurement
    #[serde(default)]
    pub dbp_1: Value,

    /// First pulse measurement
    #[serde(default)]
    pub pulse_1: Value,

    /// Repeat systolic measurement, empty when not taken
    #[serde(default)]
    pub sbp_2: Value,

    /// Repeat diastolic measurement
    #[serde(default)]
    pub dbp_2: Value,

    /// Repeat pulse measurement
    #[serde(default)]
    pub pulse_2: Value,
}

/// Body of an `addBloodRecord` / `updateBloodRecord` action
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BloodRecordPayload {
    /// Present on update, ignored by the collaborator on add
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Epoch milliseconds of the reading day
    pub date: i64,

    pub time_slot: String,

    pub sbp_1: u16,
    pub dbp_1: u16,
    pub pulse_1: u16,

    #[serde(serialize_with = "empty_when_none")]
    pub sbp_2: Option<u16>,
    #[serde(serialize_with = "empty_when_none")]
    pub dbp_2: Option<u16>,
    #[serde(serialize_with = "empty_when_none")]
    pub pulse_2: Option<u16>,
}

// The collaborator clears a column when it receives an empty string
fn empty_when_none<S>(value: &Option<u16>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_u16(*v),
        None => serializer.serialize_str(""),
    }
}

impl BloodRecordPayload {
    /// Build the stored row the collaborator would produce for this payload
    pub fn to_record(&self, id: String) -> BloodRecord {
        let opt = |v: Option<u16>| v.map(Value::from).unwrap_or_else(|| Value::from(""));
        BloodRecord {
            id,
            date: Value::from(self.date),
            time_slot: Some(self.time_slot.clone()),
            sbp_1: Value::from(self.sbp_1),
            dbp_1: Value::from(self.dbp_1),
            pulse_1: Value::from(self.pulse_1),
            sbp_2: opt(self.sbp_2),
            dbp_2: opt(self.dbp_2),
            pulse_2: opt(self.pulse_2),
        }
    }
}
