use blood_log_data::models::{BloodRecord, BloodRecordPayload, MedicalRecordPayload, MedicalRecordRow};
use chrono::{DateTime, Utc};

use crate::aggregation::{classify, normalize};
use crate::entities::forms::{MedicalForm, ReadingForm};
use crate::entities::history::{HistoryEntry, HistoryRow};
use crate::entities::medical::MedicalRecord;
use crate::entities::reading::{DisplayReading, Measurement, Reading, TimeSlot};
use crate::timestamp::{coerce_measurement, form_date_millis, parse_timestamp};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

fn measurement_value(raw: &serde_json::Value) -> f64 {
    coerce_measurement(raw).unwrap_or(f64::NAN)
}

/// Convert a stored row into a domain reading.
///
/// The repeat measurement exists only when its systolic column coerces to a
/// positive number; a zero or blank systolic discards the whole repeat.
pub fn convert_to_domain_reading(record: &BloodRecord) -> Reading {
    let first = Measurement::new(
        measurement_value(&record.sbp_1),
        measurement_value(&record.dbp_1),
        measurement_value(&record.pulse_1),
    );

    let second = match coerce_measurement(&record.sbp_2) {
        Some(systolic) if systolic > 0.0 => Some(Measurement::new(
            systolic,
            measurement_value(&record.dbp_2),
            measurement_value(&record.pulse_2),
        )),
        _ => None,
    };

    Reading {
        id: record.id.clone(),
        date: parse_timestamp(&record.date),
        time_slot: TimeSlot::from_wire(record.time_slot.as_deref()),
        first,
        second,
    }
}

/// Convert a validated form into the collaborator payload.
///
/// Fails only when the form was not validated first.
pub fn convert_to_data_blood_payload(
    form: &ReadingForm,
    id: Option<String>,
) -> Result<BloodRecordPayload, String> {
    let (sbp_1, dbp_1, pulse_1) = match (form.sbp_1, form.dbp_1, form.pulse_1) {
        (Some(s), Some(d), Some(p)) => (s, d, p),
        _ => return Err("Please enter at least the first measurement".to_string()),
    };

    Ok(BloodRecordPayload {
        id,
        date: form_date_millis(form.date),
        time_slot: form.time_slot.as_str().to_string(),
        sbp_1,
        dbp_1,
        pulse_1,
        sbp_2: form.sbp_2,
        dbp_2: form.dbp_2,
        pulse_2: form.pulse_2,
    })
}

/// Convert a validated medical form into the collaborator payload
pub fn convert_to_data_medical_payload(form: &MedicalForm) -> MedicalRecordPayload {
    let attachment = form.attachment.as_ref();
    MedicalRecordPayload {
        check_date: form_date_millis(form.check_date),
        file_data: attachment.map(|a| a.payload().trim().to_string()),
        file_name: attachment.map(|a| a.file_name.clone()),
        mime_type: attachment.map(|a| a.mime_type.clone()),
    }
}

fn day_label(instant: Option<DateTime<Utc>>) -> String {
    instant
        .map(|i| i.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Convert a stored medical row into a domain record
pub fn convert_to_domain_medical(row: &MedicalRecordRow) -> MedicalRecord {
    let check_date = parse_timestamp(&row.check_date).instant();
    MedicalRecord {
        id: row.id.clone(),
        day: day_label(check_date),
        check_date,
        report_image_url: row
            .report_image_url
            .clone()
            .filter(|url| !url.trim().is_empty()),
    }
}

/// Project a reading for presentation: effective values plus status light
pub fn convert_to_display_reading(reading: &Reading) -> DisplayReading {
    let effective = normalize(reading);
    let status = classify(effective.systolic, effective.diastolic);
    let date = reading.instant();

    DisplayReading {
        id: reading.id.clone(),
        day: day_label(date),
        date,
        time_slot: reading.time_slot,
        effective,
        status,
        status_class: status.css_class().to_string(),
        first: reading.first,
        second: reading.second,
    }
}

/// Project a history entry for presentation, rounding batch means
pub fn convert_to_history_row(entry: &HistoryEntry) -> HistoryRow {
    match entry {
        HistoryEntry::Reading(reading) => HistoryRow::Reading {
            reading: convert_to_display_reading(reading),
        },
        HistoryEntry::Summary(batch) => {
            let (systolic, diastolic, pulse) = batch.rounded();
            HistoryRow::Summary {
                systolic,
                diastolic,
                pulse,
                count: batch.count,
            }
        }
    }
}
