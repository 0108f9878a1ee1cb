//! Timestamp parsing shared by every aggregation function.
//!
//! The collaborator stores dates as epoch milliseconds, but older rows hold
//! numeric strings or plain date strings. [`parse_timestamp`] is the one place
//! those shapes are understood; everything downstream works on
//! [`ParsedTimestamp`] and never sees a half-parsed value.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::Value;

/// Result of parsing a stored date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// A real instant
    Valid(DateTime<Utc>),
    /// Missing, empty or unreadable
    Malformed,
}

impl ParsedTimestamp {
    /// The instant, if valid
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            ParsedTimestamp::Valid(instant) => Some(*instant),
            ParsedTimestamp::Malformed => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedTimestamp::Valid(_))
    }
}

fn from_millis(millis: i64) -> ParsedTimestamp {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(instant) => ParsedTimestamp::Valid(instant),
        None => ParsedTimestamp::Malformed,
    }
}

fn from_float_millis(millis: f64) -> ParsedTimestamp {
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return ParsedTimestamp::Malformed;
    }
    from_millis(millis.trunc() as i64)
}

/// Parse a stored date: epoch milliseconds (number or numeric string), an
/// RFC 3339 date-time, or a `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_timestamp(raw: &Value) -> ParsedTimestamp {
    match raw {
        Value::Number(n) => match n.as_i64() {
            Some(millis) => from_millis(millis),
            None => n.as_f64().map(from_float_millis).unwrap_or(ParsedTimestamp::Malformed),
        },
        Value::String(s) => parse_timestamp_str(s),
        _ => ParsedTimestamp::Malformed,
    }
}

/// String form of [`parse_timestamp`]
pub fn parse_timestamp_str(raw: &str) -> ParsedTimestamp {
    let raw = raw.trim();
    if raw.is_empty() {
        return ParsedTimestamp::Malformed;
    }

    if let Ok(millis) = raw.parse::<i64>() {
        return from_millis(millis);
    }
    if let Ok(millis) = raw.parse::<f64>() {
        return from_float_millis(millis);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return ParsedTimestamp::Valid(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return ParsedTimestamp::Valid(date.and_time(NaiveTime::MIN).and_utc());
    }

    ParsedTimestamp::Malformed
}

/// Coerce a loosely typed measurement column to a number.
///
/// Numbers pass through, numeric strings are parsed, empty strings and nulls
/// are absent, and anything else becomes NaN so it can never satisfy a
/// threshold.
pub fn coerce_measurement(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().parse::<f64>().unwrap_or(f64::NAN)),
        Value::Null => None,
        _ => Some(f64::NAN),
    }
}

/// Local midnight of the calendar day containing `instant`
pub fn start_of_day<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let local = instant.with_timezone(tz);
    let midnight = local.date_naive().and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Midnight skipped by a DST jump: the day starts an hour later
        None => tz
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .map(|start| start.with_timezone(&Utc))
            .unwrap_or(instant),
    }
}

/// Calendar day containing `instant` in `tz`
pub fn local_day<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// `(year, month)` of `instant` in `tz`
pub fn local_month<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> (i32, u32) {
    let day = local_day(instant, tz);
    (day.year(), day.month())
}

/// Epoch milliseconds of midnight UTC for a form date, the way a browser
/// converts an `<input type="date">` value
pub fn form_date_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}
