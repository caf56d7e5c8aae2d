//! Error types for CDES decoding, lineage traversal, and reference data.

use std::path::PathBuf;

use thiserror::Error;

/// Error codes shared by the wire decoder and lineage traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Required field missing
    MissingField,
    /// E002: Field present with the wrong JSON type
    InvalidType,
    /// E003: Unparseable ISO-8601 date or timestamp
    InvalidDate,
    /// E004: Lineage tree exceeds traversal limits
    MalformedLineage,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "E001",
            ErrorCode::InvalidType => "E002",
            ErrorCode::InvalidDate => "E003",
            ErrorCode::MalformedLineage => "E004",
        }
    }
}

/// Error while building a record from its wire map.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Missing field ===
    #[error("[E001] required field `{field}` is missing in {context}")]
    MissingField {
        field: &'static str,
        context: &'static str,
    },

    // === E002: Invalid type ===
    #[error("[E002] field `{field}` must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("[E002] {context} must be a JSON object")]
    NotAnObject { context: &'static str },

    // === E003: Invalid date ===
    #[error("[E003] field `{field}` holds invalid ISO-8601 value {value:?}: {message}")]
    InvalidDate {
        field: &'static str,
        value: String,
        message: String,
    },

    // === E004: Malformed lineage ===
    #[error("[E004] lineage nesting exceeds maximum depth {max}")]
    LineageTooDeep { max: usize },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::MissingField { .. } => ErrorCode::MissingField,
            DecodeError::InvalidType { .. } | DecodeError::NotAnObject { .. } => {
                ErrorCode::InvalidType
            }
            DecodeError::InvalidDate { .. } => ErrorCode::InvalidDate,
            DecodeError::LineageTooDeep { .. } => ErrorCode::MalformedLineage,
        }
    }
}

/// Error while walking a lineage tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineageError {
    #[error("[E004] malformed lineage: branch under {root:?} exceeds maximum depth {max}")]
    TooDeep { root: String, max: usize },
}

impl LineageError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::MalformedLineage
    }
}

impl From<LineageError> for DecodeError {
    fn from(err: LineageError) -> Self {
        match err {
            LineageError::TooDeep { max, .. } => DecodeError::LineageTooDeep { max },
        }
    }
}

/// A single finding reported by a record validator.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path}: {message}")]
pub struct FieldError {
    /// JSONPath-style location, e.g. `$.terpenes[2].percentage`.
    pub path: String,
    pub message: String,
    /// The offending value, when there is one to report.
    pub value: Option<serde_json::Value>,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// Error while loading reference data into a [`ReferenceCache`](crate::reference::ReferenceCache).
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("no reference data directory configured (set CDES_DATA_DIR)")]
    NoDataDir,

    #[error("failed to read reference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed reference data: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let missing = DecodeError::MissingField {
            field: "strainName",
            context: "lineage node",
        };
        assert_eq!(missing.code().code(), "E001");
        assert!(missing.to_string().starts_with("[E001]"));

        let deep = LineageError::TooDeep {
            root: "OG Kush".into(),
            max: 64,
        };
        assert_eq!(deep.code(), ErrorCode::MalformedLineage);
        let decode: DecodeError = deep.into();
        assert_eq!(decode, DecodeError::LineageTooDeep { max: 64 });
    }

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new("$.type", "Type must be one of: indica, sativa, hybrid")
            .with_value(serde_json::json!("ruderalis"));
        assert_eq!(
            err.to_string(),
            "$.type: Type must be one of: indica, sativa, hybrid"
        );
        assert_eq!(err.value, Some(serde_json::json!("ruderalis")));
    }
}
