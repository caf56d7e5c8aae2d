//! Utility modules for CDES.

pub mod datetime;

pub use datetime::{
    format_date_iso8601, format_timestamp_iso8601, parse_date_iso8601, parse_timestamp_iso8601,
    DateTimeParseError,
};
