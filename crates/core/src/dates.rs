//! Date formatting helpers shared by dashboards and due-date forms.
//!
//! Three shapes circulate: ISO-8601 timestamps with millisecond precision
//! (`2025-03-01T10:30:00.000Z`, what the API emits), datetime-local form
//! values (`2025-03-01T10:30`, minute precision), and `dd/mm/yyyy` display
//! strings. All conversions are in UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// `chrono` format of a datetime-local form value.
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// `dd/mm/yyyy`, or an empty string when there is no date.
pub fn format_date_for_display(value: Option<Timestamp>) -> String {
    value
        .map(|ts| ts.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

/// Render a timestamp the way the API emits it.
pub fn to_iso(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 / ISO-8601 timestamp into UTC.
pub fn parse_iso(value: &str) -> Result<Timestamp, CoreError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::Validation(format!("Invalid timestamp '{value}': {e}")))
}

/// Turn an ISO timestamp into a datetime-local form value.
///
/// Empty input yields an empty string.
pub fn format_datetime_for_input(iso: &str) -> Result<String, CoreError> {
    if iso.trim().is_empty() {
        return Ok(String::new());
    }
    Ok(parse_iso(iso)?.format(INPUT_FORMAT).to_string())
}

/// Turn a datetime-local form value back into an ISO timestamp.
///
/// Empty input yields an empty string.
pub fn convert_input_to_iso(input: &str) -> Result<String, CoreError> {
    if input.trim().is_empty() {
        return Ok(String::new());
    }
    Ok(to_iso(parse_input(input)?))
}

/// Parse a datetime-local form value as UTC.
pub fn parse_input(input: &str) -> Result<Timestamp, CoreError> {
    NaiveDateTime::parse_from_str(input.trim(), INPUT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| CoreError::Validation(format!("Invalid date/time '{input}': {e}")))
}

/// Accept either a full ISO timestamp or a datetime-local form value.
pub fn parse_due_date(value: &str) -> Result<Timestamp, CoreError> {
    parse_iso(value).or_else(|_| parse_input(value))
}
