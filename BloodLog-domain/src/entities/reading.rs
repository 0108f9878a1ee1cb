use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::timestamp::ParsedTimestamp;

/// Time of day a reading was taken
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Evening,
}

impl TimeSlot {
    /// Wire value; anything that is not "morning" is stored as evening
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("morning") => TimeSlot::Morning,
            _ => TimeSlot::Evening,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Evening => "evening",
        }
    }
}

/// One systolic/diastolic/pulse measurement.
///
/// Values are `f64` because the collaborator's columns are loosely typed; a
/// column that is not a number becomes NaN rather than an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Measurement {
    pub systolic: f64,
    pub diastolic: f64,
    pub pulse: f64,
}

impl Measurement {
    pub fn new(systolic: f64, diastolic: f64, pulse: f64) -> Self {
        Self { systolic, diastolic, pulse }
    }

    /// All three values are real numbers
    pub fn is_finite(&self) -> bool {
        self.systolic.is_finite() && self.diastolic.is_finite() && self.pulse.is_finite()
    }
}

/// Blood pressure log entry
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Identifier assigned by the collaborator
    pub id: String,

    /// When the reading was taken
    pub date: ParsedTimestamp,

    pub time_slot: TimeSlot,

    /// First measurement, always taken
    pub first: Measurement,

    /// Repeat measurement; `None` whenever the repeat systolic is missing or not positive
    pub second: Option<Measurement>,
}

impl Reading {
    /// The instant of the reading, if its date parsed
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.date.instant()
    }
}

/// Per-metric average of the measurements taken on one occasion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct EffectiveReading {
    pub systolic: f64,
    pub diastolic: f64,
    pub pulse: f64,
}

impl EffectiveReading {
    pub fn is_finite(&self) -> bool {
        self.systolic.is_finite() && self.diastolic.is_finite() && self.pulse.is_finite()
    }
}

/// Blood pressure severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    /// Below every threshold
    Normal,
    /// Systolic 120-129 with diastolic below 80
    Elevated,
    /// Systolic 130-139 or diastolic 80-89
    Stage1,
    /// Systolic 140+ or diastolic 90+
    Stage2,
}

impl StatusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLevel::Normal => "normal",
            StatusLevel::Elevated => "elevated",
            StatusLevel::Stage1 => "stage1",
            StatusLevel::Stage2 => "stage2",
        }
    }

    /// Class name of the status light shown next to a reading
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusLevel::Normal => "status-normal",
            StatusLevel::Elevated => "status-elevated",
            StatusLevel::Stage1 => "status-stage1",
            StatusLevel::Stage2 => "status-stage2",
        }
    }
}

impl std::fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reading ready for presentation: effective values plus its status light
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DisplayReading {
    pub id: String,

    /// `YYYY-MM-DD` label of the reading's UTC date
    pub day: String,

    /// Instant of the reading, absent when the stored date is unreadable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    pub time_slot: TimeSlot,

    /// Averaged (or single) values shown in the list
    pub effective: EffectiveReading,

    pub status: StatusLevel,

    pub status_class: String,

    /// Raw values as entered, for the edit form
    pub first: Measurement,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<Measurement>,
}
