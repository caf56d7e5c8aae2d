//! Provenance records: where a genetics claim came from.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::ConfidenceLevel;

/// Source type assumed when a producer does not say otherwise.
pub const DEFAULT_SOURCE_TYPE: &str = "database";

/// A single data source backing a genetics claim.
///
/// `name` is the natural key: a [`GeneticsProfile`](crate::model::GeneticsProfile)
/// holds at most one source per distinct name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvenanceSource {
    pub name: String,
    /// Free-form kind: database, breeder, lab, community, registry.
    pub source_type: String,
    pub url: Option<String>,
    /// Identifier of the record inside the source.
    pub source_id: Option<String>,
    pub confidence: ConfidenceLevel,
    pub retrieved_at: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,
    pub verified_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl ProvenanceSource {
    /// Creates a source with default type and medium confidence.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: DEFAULT_SOURCE_TYPE.to_string(),
            url: None,
            source_id: None,
            confidence: ConfidenceLevel::Medium,
            retrieved_at: None,
            verified_by: None,
            verified_date: None,
            notes: None,
        }
    }

    pub fn with_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = source_type.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_confidence(mut self, confidence: ConfidenceLevel) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn retrieved_at(mut self, at: DateTime<Utc>) -> Self {
        self.retrieved_at = Some(at);
        self
    }

    pub fn verified(mut self, by: impl Into<String>, on: NaiveDate) -> Self {
        self.verified_by = Some(by.into());
        self.verified_date = Some(on);
        self
    }

    /// Returns true if `self` should replace `existing` for the same name.
    ///
    /// Only a dated candidate can win, and only against an undated or
    /// strictly older entry.
    pub fn supersedes(&self, existing: &ProvenanceSource) -> bool {
        match (self.retrieved_at, existing.retrieved_at) {
            (Some(_), None) => true,
            (Some(new), Some(old)) => new > old,
            (None, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let source = ProvenanceSource::new("SeedFinder");
        assert_eq!(source.source_type, "database");
        assert_eq!(source.confidence, ConfidenceLevel::Medium);
        assert!(source.retrieved_at.is_none());
    }

    #[test]
    fn test_supersedes() {
        let early = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let undated = ProvenanceSource::new("Leafly");
        let old = ProvenanceSource::new("Leafly").retrieved_at(early);
        let new = ProvenanceSource::new("Leafly").retrieved_at(late);

        assert!(new.supersedes(&old));
        assert!(old.supersedes(&undated));
        assert!(!old.supersedes(&new));
        assert!(!new.supersedes(&new.clone()));
        assert!(!undated.supersedes(&old));
        assert!(!undated.supersedes(&undated.clone()));
    }
}
