//! ISO-8601 date/timestamp conversion at the wire boundary.
//!
//! CDES documents come from many producers, so parsing is lenient about the
//! shape of a timestamp while formatting is always canonical:
//! - Date: `YYYY-MM-DD`, a trailing time part is ignored on input
//! - Timestamp: RFC 3339 with offset; naive timestamps are read as UTC and
//!   a bare date is read as midnight UTC. Output is `YYYY-MM-DDTHH:MM:SS[.f]Z`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Error type for ISO-8601 parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    pub message: String,
}

impl std::fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeParseError {}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO-8601 calendar date.
pub fn parse_date_iso8601(date_str: &str) -> Result<NaiveDate, DateTimeParseError> {
    let s = date_str.trim();
    // Accept full timestamps where a date is expected; keep the date part.
    let date_part = match s.get(..10) {
        Some(prefix) if s.len() > 10 && matches!(s.as_bytes()[10], b'T' | b't' | b' ') => prefix,
        _ => s,
    };

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| DateTimeParseError {
        message: format!("Invalid ISO-8601 date {:?}: {}", date_str, e),
    })
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date_iso8601(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses an ISO-8601 timestamp into UTC.
pub fn parse_timestamp_iso8601(ts_str: &str) -> Result<DateTime<Utc>, DateTimeParseError> {
    let s = ts_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if s.len() == 10 {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(midnight.and_utc());
            }
        }
    }

    Err(DateTimeParseError {
        message: format!("Invalid ISO-8601 timestamp: {:?}", ts_str),
    })
}

/// Formats a UTC timestamp as RFC 3339 with a `Z` suffix, omitting zero
/// fractional seconds.
pub fn format_timestamp_iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
