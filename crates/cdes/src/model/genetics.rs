//! The genetics profile: aggregate root of a strain's breeding data.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use crate::error::LineageError;
use crate::model::lineage::forest_depth;
use crate::model::{
    BreedingTechnique, ConfidenceLevel, GeneticsStability, LineageNode, PhenotypeVariant,
    ProvenanceSource,
};
use crate::parse::{find_separator, normalize_separators, split_parents, GENETICS_SEPARATOR};

/// A competition placing, e.g. first in Indica at the 2019 Emerald Cup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CupWin {
    pub name: String,
    pub year: Option<i32>,
    /// Placing as written ("1st", "2nd").
    pub place: Option<String>,
    pub category: Option<String>,
}

impl CupWin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Everything known about a strain's genetics.
///
/// Profiles come from structured construction, from a wire map
/// ([`decode_genetics_profile`](crate::codec::decode_genetics_profile)), or
/// from breeder notation ([`GeneticsProfile::from_simple`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneticsProfile {
    // Parents
    pub parent_1: Option<String>,
    pub parent_2: Option<String>,
    /// Further parents of a polyhybrid, in notation order.
    pub additional_parents: Vec<String>,
    /// Human-readable lineage; takes precedence over the joined parents.
    pub lineage_text: Option<String>,

    // Origin
    pub breeder: Option<String>,
    pub breeder_url: Option<String>,
    pub original_breeder: Option<String>,
    pub origin_year: Option<i32>,
    pub origin_location: Option<String>,

    // Classification. Percentages may be partial; they need not sum to 100.
    pub indica_pct: Option<f64>,
    pub sativa_pct: Option<f64>,
    pub ruderalis_pct: Option<f64>,

    // Breeding
    pub breeding_technique: BreedingTechnique,
    /// Generation label such as "F1" or "S1".
    pub generation: Option<String>,
    pub stability: GeneticsStability,
    pub is_feminized: bool,
    pub is_autoflower: bool,
    pub is_clone_only: bool,

    // Lineage tree
    pub lineage: Vec<LineageNode>,

    // Phenotypes
    pub phenotypes: Vec<PhenotypeVariant>,
    pub selected_phenotype: Option<String>,

    // Provenance
    pub sources: Vec<ProvenanceSource>,
    pub primary_source: Option<String>,
    pub confidence: ConfidenceLevel,
    pub last_verified: Option<NaiveDate>,

    // Recognition
    pub awards: Vec<String>,
    pub cup_wins: Vec<CupWin>,

    // Free-form
    pub genetic_markers: BTreeMap<String, JsonValue>,
    /// Chemical phenotype label, e.g. "Type I".
    pub chemotype: Option<String>,
    pub metadata: BTreeMap<String, JsonValue>,
    pub tags: Vec<String>,
}

impl GeneticsProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a profile for a simple two-parent cross.
    pub fn cross(parent_1: impl Into<String>, parent_2: impl Into<String>) -> Self {
        Self {
            parent_1: Some(parent_1.into()),
            parent_2: Some(parent_2.into()),
            breeding_technique: BreedingTechnique::Cross,
            ..Default::default()
        }
    }

    /// Builds a profile from breeder notation such as `"GSC x Gelato"`.
    ///
    /// - two parents set `parent_1`/`parent_2`
    /// - more than two also fill `additional_parents` and mark the
    ///   profile polyhybrid
    /// - in both cases `lineage_text` keeps the text with `" x "`/`" X "`
    ///   rewritten to the canonical double space
    /// - text without a separator is kept verbatim as `lineage_text`
    pub fn from_simple(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }

        let mut parents = match find_separator(text) {
            Some(_) => split_parents(text),
            None => Vec::new(),
        };

        if parents.len() < 2 {
            return Self {
                lineage_text: Some(text.to_string()),
                ..Default::default()
            };
        }

        let rest = parents.split_off(2);
        let mut first_two = parents.into_iter();
        let mut profile = Self {
            parent_1: first_two.next(),
            parent_2: first_two.next(),
            lineage_text: Some(normalize_separators(text)),
            ..Default::default()
        };

        if !rest.is_empty() {
            profile.additional_parents = rest;
            profile.breeding_technique = BreedingTechnique::Polyhybrid;
        }

        profile
    }

    /// All named parents: `parent_1`, `parent_2`, then `additional_parents`.
    /// Absent primaries are skipped; order is never changed.
    pub fn get_all_parents(&self) -> Vec<&str> {
        self.parent_1
            .as_deref()
            .into_iter()
            .chain(self.parent_2.as_deref())
            .chain(self.additional_parents.iter().map(String::as_str))
            .collect()
    }

    /// Returns true if any parent or lineage information is present.
    pub fn has_genetics(&self) -> bool {
        self.parent_1.is_some()
            || self.parent_2.is_some()
            || !self.additional_parents.is_empty()
            || !self.lineage.is_empty()
            || self.lineage_text.is_some()
    }

    /// Returns true if more than two parents are named.
    pub fn is_polyhybrid(&self) -> bool {
        self.get_all_parents().len() > 2
            || self.breeding_technique == BreedingTechnique::Polyhybrid
    }

    /// The canonical parent string: `lineage_text` when present, otherwise
    /// the parents joined with the double-space separator.
    pub fn get_parent_string(&self) -> Option<String> {
        if let Some(text) = &self.lineage_text {
            return Some(text.clone());
        }
        let parents = self.get_all_parents();
        (!parents.is_empty()).then(|| parents.join(GENETICS_SEPARATOR))
    }

    /// Number of documented generations.
    ///
    /// 0 with no genetics data, 1 when only the flat parent fields are set,
    /// otherwise the deepest lineage branch (a root counts as 1).
    pub fn get_lineage_depth(&self) -> Result<usize, LineageError> {
        if self.lineage.is_empty() {
            let has_parents = self.parent_1.is_some() || self.parent_2.is_some();
            return Ok(usize::from(has_parents));
        }
        forest_depth(&self.lineage)
    }

    /// Merges a provenance source into the profile.
    ///
    /// Sources are keyed by name. A new name is appended. An existing entry
    /// is replaced in place only by a candidate with a strictly later (or
    /// first-known) retrieval timestamp; otherwise it is left untouched.
    pub fn add_source(&mut self, candidate: ProvenanceSource) {
        match self.sources.iter_mut().find(|s| s.name == candidate.name) {
            None => {
                tracing::debug!(source = %candidate.name, "adding provenance source");
                self.sources.push(candidate);
            }
            Some(existing) => {
                if candidate.supersedes(existing) {
                    tracing::debug!(source = %candidate.name, "replacing stale provenance source");
                    *existing = candidate;
                } else {
                    tracing::trace!(source = %candidate.name, "ignoring older provenance source");
                }
            }
        }
    }

    /// Looks up a source by name.
    pub fn get_source(&self, name: &str) -> Option<&ProvenanceSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// The source named by `primary_source`, if it is in the list.
    pub fn primary(&self) -> Option<&ProvenanceSource> {
        self.primary_source.as_deref().and_then(|name| self.get_source(name))
    }

    /// Appends a phenotype variant.
    pub fn add_phenotype(&mut self, phenotype: PhenotypeVariant) {
        self.phenotypes.push(phenotype);
    }

    /// The phenotype named by `selected_phenotype`, if it is in the list.
    pub fn get_selected_phenotype(&self) -> Option<&PhenotypeVariant> {
        let selected = self.selected_phenotype.as_deref()?;
        self.phenotypes.iter().find(|p| p.phenotype_name == selected)
    }

    /// Finds a lineage node anywhere in the tree by name, ignoring case.
    pub fn find_ancestor(&self, strain_name: &str) -> Option<&LineageNode> {
        self.lineage.iter().find_map(|root| root.find(strain_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_from_simple_two_parents() {
        let profile = GeneticsProfile::from_simple("GSC x Gelato");
        assert_eq!(profile.parent_1.as_deref(), Some("GSC"));
        assert_eq!(profile.parent_2.as_deref(), Some("Gelato"));
        assert_eq!(profile.lineage_text.as_deref(), Some("GSC  Gelato"));
        assert!(profile.additional_parents.is_empty());
        assert_eq!(profile.breeding_technique, BreedingTechnique::Unknown);
    }

    #[test]
    fn test_from_simple_polyhybrid() {
        let profile = GeneticsProfile::from_simple("Hindu Kush x Lemon Thai X Chemdawg");
        assert_eq!(
            profile.get_all_parents(),
            vec!["Hindu Kush", "Lemon Thai X Chemdawg"]
        );

        let profile = GeneticsProfile::from_simple("Hindu Kush x Lemon Thai x Chemdawg");
        assert_eq!(profile.get_all_parents(), vec!["Hindu Kush", "Lemon Thai", "Chemdawg"]);
        assert_eq!(profile.additional_parents, vec!["Chemdawg"]);
        assert_eq!(profile.breeding_technique, BreedingTechnique::Polyhybrid);
        assert_eq!(
            profile.lineage_text.as_deref(),
            Some("Hindu Kush  Lemon Thai  Chemdawg")
        );
        assert!(profile.is_polyhybrid());
    }

    #[test]
    fn test_from_simple_no_separator() {
        let profile = GeneticsProfile::from_simple("Afghani landrace");
        assert_eq!(profile.parent_1, None);
        assert_eq!(profile.lineage_text.as_deref(), Some("Afghani landrace"));
        assert_eq!(profile.get_lineage_depth(), Ok(0));
    }

    #[test]
    fn test_from_simple_empty() {
        assert_eq!(GeneticsProfile::from_simple(""), GeneticsProfile::default());
        assert_eq!(GeneticsProfile::from_simple("   "), GeneticsProfile::default());
    }

    #[test]
    fn test_parent_ordering() {
        let profile = GeneticsProfile {
            parent_2: Some("Durban Poison".into()),
            additional_parents: vec!["Zeta".into(), "Alpha".into()],
            ..Default::default()
        };
        assert_eq!(profile.get_all_parents(), vec!["Durban Poison", "Zeta", "Alpha"]);
    }

    #[test]
    fn test_parent_string() {
        let mut profile = GeneticsProfile::cross("OG Kush", "Durban Poison");
        assert_eq!(profile.get_parent_string().as_deref(), Some("OG Kush  Durban Poison"));

        profile.lineage_text = Some("OG Kush x Durban Poison (Bay cut)".into());
        assert_eq!(
            profile.get_parent_string().as_deref(),
            Some("OG Kush x Durban Poison (Bay cut)")
        );

        assert_eq!(GeneticsProfile::new().get_parent_string(), None);
    }

    #[test]
    fn test_lineage_depth_law() {
        assert_eq!(GeneticsProfile::new().get_lineage_depth(), Ok(0));
        assert_eq!(GeneticsProfile::cross("A", "B").get_lineage_depth(), Ok(1));

        let mut profile = GeneticsProfile::cross("A", "B");
        profile.lineage.push(
            LineageNode::new("A").with_child(
                LineageNode::new("A1")
                    .with_generation(2)
                    .with_child(LineageNode::new("A11").with_generation(3)),
            ),
        );
        profile.lineage.push(LineageNode::new("B"));
        assert_eq!(profile.get_lineage_depth(), Ok(3));
        assert_eq!(profile.find_ancestor("a11").map(|n| n.generation), Some(3));
    }

    #[test]
    fn test_add_source_dedup() {
        let early = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let mut profile = GeneticsProfile::new();
        profile.add_source(ProvenanceSource::new("SeedFinder").retrieved_at(early));
        profile.add_source(ProvenanceSource::new("Leafly"));

        let newer = ProvenanceSource::new("SeedFinder")
            .retrieved_at(late)
            .with_confidence(ConfidenceLevel::High);
        profile.add_source(newer.clone());

        assert_eq!(profile.sources.len(), 2);
        assert_eq!(profile.sources[0], newer);
        assert_eq!(profile.sources[1].name, "Leafly");
    }

    #[test]
    fn test_add_source_keeps_existing() {
        let early = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let mut profile = GeneticsProfile::new();
        let first = ProvenanceSource::new("SeedFinder").retrieved_at(late);
        profile.add_source(first.clone());
        profile.add_source(ProvenanceSource::new("SeedFinder").retrieved_at(early));
        profile.add_source(ProvenanceSource::new("SeedFinder").with_confidence(ConfidenceLevel::Verified));

        assert_eq!(profile.sources, vec![first]);
    }

    #[test]
    fn test_primary_and_selected() {
        let mut profile = GeneticsProfile::new();
        profile.add_source(ProvenanceSource::new("Breeder site"));
        profile.primary_source = Some("Breeder site".into());
        assert_eq!(profile.primary().map(|s| s.name.as_str()), Some("Breeder site"));

        profile.add_phenotype(PhenotypeVariant::new("Wino #4").with_number(4));
        profile.selected_phenotype = Some("Wino #4".into());
        assert!(profile.get_selected_phenotype().is_some());

        profile.selected_phenotype = Some("Wino #5".into());
        assert!(profile.get_selected_phenotype().is_none());
    }
}
