//! Field-level access to CDES wire maps.
//!
//! [`MapWriter`] only ever inserts keys for present, non-default values, so
//! encoded maps never carry nulls or empty collections. [`MapReader`] wraps
//! a borrowed map and turns missing or mistyped fields into [`DecodeError`]s.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Number, Value};

use crate::error::DecodeError;
use crate::util::{
    format_date_iso8601, format_timestamp_iso8601, parse_date_iso8601, parse_timestamp_iso8601,
};

/// A JSON object as exchanged on the wire.
pub type WireMap = Map<String, Value>;

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding a wire map.
///
/// Every accessor takes the wire key as a `&'static str` so errors can name
/// the offending field without allocating.
#[derive(Debug, Clone, Copy)]
pub struct MapReader<'a> {
    map: &'a WireMap,
    context: &'static str,
}

impl<'a> MapReader<'a> {
    /// Creates a reader over a map; `context` names the record for errors.
    pub fn new(map: &'a WireMap, context: &'static str) -> Self {
        Self { map, context }
    }

    /// Creates a reader over a value that must be a JSON object.
    pub fn from_value(value: &'a Value, context: &'static str) -> Result<Self, DecodeError> {
        value
            .as_object()
            .map(|map| Self::new(map, context))
            .ok_or(DecodeError::NotAnObject { context })
    }

    /// Returns the raw value for a key, treating `null` as absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Reads a required string.
    pub fn required_str(&self, key: &'static str) -> Result<String, DecodeError> {
        self.opt_str(key)?.ok_or(DecodeError::MissingField {
            field: key,
            context: self.context,
        })
    }

    /// Reads an optional string.
    pub fn opt_str(&self, key: &'static str) -> Result<Option<String>, DecodeError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(invalid(key, "a string")),
        }
    }

    /// Reads an optional number.
    pub fn opt_f64(&self, key: &'static str) -> Result<Option<f64>, DecodeError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| invalid(key, "a number")),
        }
    }

    /// Reads an optional signed 32-bit integer.
    pub fn opt_i32(&self, key: &'static str) -> Result<Option<i32>, DecodeError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| invalid(key, "a 32-bit integer")),
        }
    }

    /// Reads an optional unsigned 32-bit integer.
    pub fn opt_u32(&self, key: &'static str) -> Result<Option<u32>, DecodeError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| invalid(key, "a non-negative 32-bit integer")),
        }
    }

    /// Reads a boolean flag; absent means false.
    pub fn flag(&self, key: &'static str) -> Result<bool, DecodeError> {
        match self.get(key) {
            None => Ok(false),
            Some(v) => v.as_bool().ok_or_else(|| invalid(key, "a boolean")),
        }
    }

    /// Reads a list of strings; absent means empty.
    pub fn str_list(&self, key: &'static str) -> Result<Vec<String>, DecodeError> {
        self.array(key)?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(String::from)
                    .ok_or_else(|| invalid(key, "an array of strings"))
            })
            .collect()
    }

    /// Reads an enum through its total wire conversion.
    pub fn enum_or_default<T>(&self, key: &'static str) -> Result<T, DecodeError>
    where
        T: Default + for<'s> From<&'s str>,
    {
        Ok(self.opt_str(key)?.map(|s| T::from(s.as_str())).unwrap_or_default())
    }

    /// Reads an optional ISO-8601 date.
    pub fn date(&self, key: &'static str) -> Result<Option<NaiveDate>, DecodeError> {
        self.opt_str(key)?
            .map(|s| {
                parse_date_iso8601(&s).map_err(|e| DecodeError::InvalidDate {
                    field: key,
                    value: s.clone(),
                    message: e.message,
                })
            })
            .transpose()
    }

    /// Reads an optional ISO-8601 timestamp.
    pub fn timestamp(&self, key: &'static str) -> Result<Option<DateTime<Utc>>, DecodeError> {
        self.opt_str(key)?
            .map(|s| {
                parse_timestamp_iso8601(&s).map_err(|e| DecodeError::InvalidDate {
                    field: key,
                    value: s.clone(),
                    message: e.message,
                })
            })
            .transpose()
    }

    /// Reads an optional nested object.
    pub fn object(&self, key: &'static str) -> Result<Option<&'a WireMap>, DecodeError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v.as_object().map(Some).ok_or_else(|| invalid(key, "an object")),
        }
    }

    /// Reads an array; absent means empty.
    pub fn array(&self, key: &'static str) -> Result<&'a [Value], DecodeError> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(invalid(key, "an array")),
        }
    }

    /// Reads an array whose elements must all be objects.
    pub fn objects(&self, key: &'static str) -> Result<Vec<&'a WireMap>, DecodeError> {
        self.array(key)?
            .iter()
            .map(|v| v.as_object().ok_or_else(|| invalid(key, "an array of objects")))
            .collect()
    }
}

fn invalid(field: &'static str, expected: &'static str) -> DecodeError {
    DecodeError::InvalidType { field, expected }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Insert-only writer for wire maps.
///
/// Each `put_*` method silently skips absent, empty, or default values.
#[derive(Debug, Clone, Default)]
pub struct MapWriter {
    map: WireMap,
}

impl MapWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value unconditionally.
    pub fn put(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.map.insert(key.to_string(), value.into());
        self
    }

    /// Inserts a string, skipping empty ones.
    pub fn put_str(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.put(key, value);
        }
        self
    }

    /// Inserts an optional string, skipping `None` and empty strings.
    pub fn put_opt_str(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.put_str(key, value);
        }
        self
    }

    /// Inserts an optional number. Non-finite values cannot be represented
    /// in JSON and are skipped.
    pub fn put_opt_f64(&mut self, key: &str, value: Option<f64>) -> &mut Self {
        if let Some(n) = value.and_then(Number::from_f64) {
            self.put(key, Value::Number(n));
        }
        self
    }

    /// Inserts a number, skipping zero.
    pub fn put_nonzero_f64(&mut self, key: &str, value: f64) -> &mut Self {
        if value != 0.0 {
            self.put_opt_f64(key, Some(value));
        }
        self
    }

    pub fn put_opt_i32(&mut self, key: &str, value: Option<i32>) -> &mut Self {
        if let Some(value) = value {
            self.put(key, value);
        }
        self
    }

    pub fn put_opt_u32(&mut self, key: &str, value: Option<u32>) -> &mut Self {
        if let Some(value) = value {
            self.put(key, value);
        }
        self
    }

    /// Inserts `true`; false is the default and is skipped.
    pub fn put_flag(&mut self, key: &str, value: bool) -> &mut Self {
        if value {
            self.put(key, true);
        }
        self
    }

    /// Inserts a string list, skipping empty lists.
    pub fn put_str_list(&mut self, key: &str, values: &[String]) -> &mut Self {
        if !values.is_empty() {
            self.put(key, values.to_vec());
        }
        self
    }

    /// Inserts an enum's wire string unless it is the default variant.
    pub fn put_enum(&mut self, key: &str, wire: &'static str, is_default: bool) -> &mut Self {
        if !is_default {
            self.put(key, wire);
        }
        self
    }

    pub fn put_date(&mut self, key: &str, value: Option<&NaiveDate>) -> &mut Self {
        if let Some(date) = value {
            self.put(key, format_date_iso8601(date));
        }
        self
    }

    pub fn put_timestamp(&mut self, key: &str, value: Option<&DateTime<Utc>>) -> &mut Self {
        if let Some(ts) = value {
            self.put(key, format_timestamp_iso8601(ts));
        }
        self
    }

    /// Inserts a nested map, skipping empty ones.
    pub fn put_map(&mut self, key: &str, value: WireMap) -> &mut Self {
        if !value.is_empty() {
            self.put(key, Value::Object(value));
        }
        self
    }

    /// Encodes each item and inserts the list, skipping empty lists.
    pub fn put_list<T>(&mut self, key: &str, items: &[T], encode: impl Fn(&T) -> WireMap) -> &mut Self {
        if !items.is_empty() {
            let list: Vec<Value> = items.iter().map(|item| Value::Object(encode(item))).collect();
            self.put(key, list);
        }
        self
    }

    /// Consumes the writer and returns the map.
    pub fn finish(&mut self) -> WireMap {
        std::mem::take(&mut self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_writer_skips_defaults() {
        let map = MapWriter::new()
            .put_opt_str("a", None)
            .put_opt_str("b", Some(""))
            .put_opt_f64("c", None)
            .put_opt_f64("nan", Some(f64::NAN))
            .put_flag("d", false)
            .put_str_list("e", &[])
            .put_enum("f", "unknown", true)
            .put_date("g", None)
            .put_map("h", WireMap::new())
            .finish();
        assert!(map.is_empty());
    }

    #[test]
    fn test_writer_inserts_values() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let map = MapWriter::new()
            .put_str("name", "OG Kush")
            .put_opt_f64("pct", Some(50.0))
            .put_opt_i32("year", Some(1996))
            .put_flag("verified", true)
            .put_str_list("tags", &["kush".to_string()])
            .put_enum("type", "indica", false)
            .put_date("date", Some(&date))
            .finish();
        assert_eq!(
            Value::Object(map),
            json!({
                "name": "OG Kush",
                "pct": 50.0,
                "year": 1996,
                "verified": true,
                "tags": ["kush"],
                "type": "indica",
                "date": "2024-03-09",
            })
        );
    }

    #[test]
    fn test_reader_missing_and_null() {
        let value = json!({ "name": null, "year": 2001 });
        let reader = MapReader::from_value(&value, "test").unwrap();

        let err = reader.required_str("name").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingField);
        assert_eq!(reader.opt_i32("year").unwrap(), Some(2001));
        assert_eq!(reader.opt_str("other").unwrap(), None);
        assert!(!reader.flag("flag").unwrap());
        assert!(reader.str_list("tags").unwrap().is_empty());
    }

    #[test]
    fn test_reader_type_errors() {
        let value = json!({
            "name": 5,
            "flag": "yes",
            "tags": ["a", 1],
            "year": 1.5,
            "date": "not a date",
        });
        let reader = MapReader::from_value(&value, "test").unwrap();

        assert_eq!(reader.opt_str("name").unwrap_err().code(), ErrorCode::InvalidType);
        assert_eq!(reader.flag("flag").unwrap_err().code(), ErrorCode::InvalidType);
        assert_eq!(reader.str_list("tags").unwrap_err().code(), ErrorCode::InvalidType);
        assert_eq!(reader.opt_i32("year").unwrap_err().code(), ErrorCode::InvalidType);
        assert_eq!(reader.date("date").unwrap_err().code(), ErrorCode::InvalidDate);
    }

    #[test]
    fn test_reader_rejects_non_object() {
        let value = json!([1, 2]);
        assert_eq!(
            MapReader::from_value(&value, "profile").unwrap_err(),
            DecodeError::NotAnObject { context: "profile" }
        );
    }
}
