//! Input forms for new readings and medical visits, with their validation rules

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::reading::TimeSlot;

/// Largest report image the collaborator accepts
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// New or edited blood pressure reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[validate(schema(function = "validate_second_measurement"))]
pub struct ReadingForm {
    /// Day of the reading
    pub date: NaiveDate,

    pub time_slot: TimeSlot,

    #[validate(
        required(message = "Please enter at least the first systolic value"),
        range(min = 40, max = 300, message = "Systolic must be between 40 and 300")
    )]
    pub sbp_1: Option<u16>,

    #[validate(
        required(message = "Please enter at least the first diastolic value"),
        range(min = 20, max = 200, message = "Diastolic must be between 20 and 200")
    )]
    pub dbp_1: Option<u16>,

    #[validate(
        required(message = "Please enter at least the first pulse value"),
        range(min = 20, max = 250, message = "Pulse must be between 20 and 250")
    )]
    pub pulse_1: Option<u16>,

    #[serde(default)]
    #[validate(range(min = 40, max = 300, message = "Systolic must be between 40 and 300"))]
    pub sbp_2: Option<u16>,

    #[serde(default)]
    #[validate(range(min = 20, max = 200, message = "Diastolic must be between 20 and 200"))]
    pub dbp_2: Option<u16>,

    #[serde(default)]
    #[validate(range(min = 20, max = 250, message = "Pulse must be between 20 and 250"))]
    pub pulse_2: Option<u16>,
}

fn validate_second_measurement(form: &ReadingForm) -> Result<(), ValidationError> {
    let given = [form.sbp_2, form.dbp_2, form.pulse_2].iter().filter(|v| v.is_some()).count();
    if given != 0 && given != 3 {
        let mut error = ValidationError::new("incomplete_second_measurement");
        error.message = Some("The second measurement needs systolic, diastolic and pulse".into());
        return Err(error);
    }
    Ok(())
}

/// Report image attached to a medical visit
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Attachment {
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,

    #[validate(custom = "validate_image_mime")]
    pub mime_type: String,

    /// Base64 content, with or without a `data:...;base64,` prefix
    #[validate(custom = "validate_image_data")]
    pub data: String,
}

impl Attachment {
    /// Base64 payload without any data-URL prefix
    pub fn payload(&self) -> &str {
        match self.data.split_once(";base64,") {
            Some((_, rest)) => rest,
            None => self.data.as_str(),
        }
    }
}

fn validate_image_mime(mime: &str) -> Result<(), ValidationError> {
    if mime.starts_with("image/") {
        Ok(())
    } else {
        let mut error = ValidationError::new("not_an_image");
        error.message = Some("Only image files can be attached".into());
        Err(error)
    }
}

fn validate_image_data(data: &str) -> Result<(), ValidationError> {
    let payload = data.split_once(";base64,").map(|(_, rest)| rest).unwrap_or(data);
    let decoded = STANDARD.decode(payload.trim()).map_err(|_| {
        let mut error = ValidationError::new("invalid_base64");
        error.message = Some("Attachment is not valid base64".into());
        error
    })?;

    if decoded.len() > MAX_ATTACHMENT_BYTES {
        let mut error = ValidationError::new("too_large");
        error.message = Some("Image is too large, please choose one under 5MB".into());
        return Err(error);
    }
    Ok(())
}

/// New medical visit record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MedicalForm {
    /// Day of the visit
    pub check_date: NaiveDate,

    #[serde(default)]
    #[validate]
    pub attachment: Option<Attachment>,
}

/// Flatten validator output into one readable line, nested fields included
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts = Vec::new();
    collect_messages("", errors, &mut parts);
    parts.sort();
    parts.join("; ")
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, parts: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = match (prefix.is_empty(), *field) {
            (_, "__all__") => prefix.to_string(),
            (true, field) => field.to_string(),
            (false, field) => format!("{}.{}", prefix, field),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|err| match &err.message {
                        Some(msg) => msg.to_string(),
                        None => format!("Invalid {}", path),
                    })
                    .collect();
                if path.is_empty() {
                    parts.push(messages.join(", "));
                } else {
                    parts.push(format!("{}: {}", path, messages.join(", ")));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(&path, nested, parts),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(&format!("{}[{}]", path, index), nested, parts);
                }
            }
        }
    }
}
