//! Builder API for ergonomic GeneticsProfile construction.
//!
//! Provides a fluent interface for building profiles with lineage trees.
//! Lineage builders fill in generation numbers and default relationships
//! from nesting depth, so the tree stays consistent by construction.
//!
//! # Example
//!
//! ```rust
//! use cdes::model::builder::GeneticsProfileBuilder;
//! use cdes::model::{BreedingTechnique, LineageRelationship};
//!
//! let profile = GeneticsProfileBuilder::new()
//!     .parents("OG Kush", "Durban Poison")
//!     .breeder("DNA Genetics")
//!     .technique(BreedingTechnique::Cross)
//!     .lineage_root("OG Kush", |n| n
//!         .relationship(LineageRelationship::Mother)
//!         .child("Chemdawg", |c| c)
//!         .child("Hindu Kush", |c| c)
//!     )
//!     .lineage_root("Durban Poison", |n| n.relationship(LineageRelationship::Father))
//!     .build();
//!
//! assert_eq!(profile.get_lineage_depth(), Ok(2));
//! ```

use chrono::NaiveDate;

use crate::model::{
    BreedingTechnique, ConfidenceLevel, CupWin, GeneticsProfile, GeneticsStability, LineageNode,
    LineageRelationship, PhenotypeVariant, ProvenanceSource, StrainType,
};

/// Builder for constructing a GeneticsProfile.
#[derive(Debug, Clone, Default)]
pub struct GeneticsProfileBuilder {
    profile: GeneticsProfile,
}

impl GeneticsProfileBuilder {
    /// Creates a builder for an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from breeder notation parsed by [`GeneticsProfile::from_simple`].
    pub fn from_simple(text: &str) -> Self {
        Self {
            profile: GeneticsProfile::from_simple(text),
        }
    }

    // =========================================================================
    // Parents
    // =========================================================================

    /// Sets both primary parents.
    pub fn parents(mut self, parent_1: impl Into<String>, parent_2: impl Into<String>) -> Self {
        self.profile.parent_1 = Some(parent_1.into());
        self.profile.parent_2 = Some(parent_2.into());
        self
    }

    /// Appends a parent after the primaries.
    pub fn additional_parent(mut self, parent: impl Into<String>) -> Self {
        self.profile.additional_parents.push(parent.into());
        self
    }

    /// Sets the human-readable lineage text.
    pub fn lineage_text(mut self, text: impl Into<String>) -> Self {
        self.profile.lineage_text = Some(text.into());
        self
    }

    // =========================================================================
    // Origin & classification
    // =========================================================================

    pub fn breeder(mut self, breeder: impl Into<String>) -> Self {
        self.profile.breeder = Some(breeder.into());
        self
    }

    pub fn original_breeder(mut self, breeder: impl Into<String>) -> Self {
        self.profile.original_breeder = Some(breeder.into());
        self
    }

    /// Sets origin year and location.
    pub fn origin(mut self, year: i32, location: impl Into<String>) -> Self {
        self.profile.origin_year = Some(year);
        self.profile.origin_location = Some(location.into());
        self
    }

    /// Sets the indica/sativa split.
    pub fn split(mut self, indica_pct: f64, sativa_pct: f64) -> Self {
        self.profile.indica_pct = Some(indica_pct);
        self.profile.sativa_pct = Some(sativa_pct);
        self
    }

    pub fn ruderalis(mut self, pct: f64) -> Self {
        self.profile.ruderalis_pct = Some(pct);
        self
    }

    pub fn technique(mut self, technique: BreedingTechnique) -> Self {
        self.profile.breeding_technique = technique;
        self
    }

    /// Sets the generation label, e.g. "F1".
    pub fn generation(mut self, label: impl Into<String>) -> Self {
        self.profile.generation = Some(label.into());
        self
    }

    pub fn stability(mut self, stability: GeneticsStability) -> Self {
        self.profile.stability = stability;
        self
    }

    pub fn feminized(mut self) -> Self {
        self.profile.is_feminized = true;
        self
    }

    pub fn autoflower(mut self) -> Self {
        self.profile.is_autoflower = true;
        self
    }

    pub fn clone_only(mut self) -> Self {
        self.profile.is_clone_only = true;
        self
    }

    // =========================================================================
    // Lineage
    // =========================================================================

    /// Adds a lineage root (a direct parent) using a builder function.
    pub fn lineage_root<F>(mut self, strain_name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(LineageBuilder) -> LineageBuilder,
    {
        let builder = f(LineageBuilder::new(strain_name, 1));
        self.profile.lineage.push(builder.build());
        self
    }

    /// Adds a prebuilt lineage root.
    pub fn lineage_node(mut self, node: LineageNode) -> Self {
        self.profile.lineage.push(node);
        self
    }

    // =========================================================================
    // Phenotypes & provenance
    // =========================================================================

    pub fn phenotype(mut self, phenotype: PhenotypeVariant) -> Self {
        self.profile.phenotypes.push(phenotype);
        self
    }

    /// Adds a phenotype and marks it as the selected one.
    pub fn selected_phenotype(mut self, phenotype: PhenotypeVariant) -> Self {
        self.profile.selected_phenotype = Some(phenotype.phenotype_name.clone());
        self.profile.phenotypes.push(phenotype);
        self
    }

    /// Merges a source with [`GeneticsProfile::add_source`] semantics.
    pub fn source(mut self, source: ProvenanceSource) -> Self {
        self.profile.add_source(source);
        self
    }

    /// Merges a source and names it the primary source.
    pub fn primary_source(mut self, source: ProvenanceSource) -> Self {
        self.profile.primary_source = Some(source.name.clone());
        self.profile.add_source(source);
        self
    }

    pub fn confidence(mut self, confidence: ConfidenceLevel) -> Self {
        self.profile.confidence = confidence;
        self
    }

    pub fn last_verified(mut self, date: NaiveDate) -> Self {
        self.profile.last_verified = Some(date);
        self
    }

    // =========================================================================
    // Recognition & free-form
    // =========================================================================

    pub fn award(mut self, award: impl Into<String>) -> Self {
        self.profile.awards.push(award.into());
        self
    }

    pub fn cup_win(mut self, win: CupWin) -> Self {
        self.profile.cup_wins.push(win);
        self
    }

    pub fn chemotype(mut self, chemotype: impl Into<String>) -> Self {
        self.profile.chemotype = Some(chemotype.into());
        self
    }

    pub fn marker(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.profile.genetic_markers.insert(key.into(), value.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.profile.metadata.insert(key.into(), value.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.profile.tags.push(tag.into());
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Builds the final GeneticsProfile.
    pub fn build(self) -> GeneticsProfile {
        self.profile
    }
}

/// Builder for one lineage node and its ancestors.
///
/// Nested nodes get `generation = parent + 1` and a relationship derived
/// from that generation unless one is set explicitly.
#[derive(Debug, Clone)]
pub struct LineageBuilder {
    node: LineageNode,
}

impl LineageBuilder {
    /// Creates a builder for a node at the given generation.
    pub fn new(strain_name: impl Into<String>, generation: u32) -> Self {
        let node = LineageNode::new(strain_name)
            .with_generation(generation)
            .with_relationship(relationship_for_generation(generation));
        Self { node }
    }

    pub fn relationship(mut self, relationship: LineageRelationship) -> Self {
        self.node.relationship = relationship;
        self
    }

    pub fn strain_id(mut self, id: impl Into<String>) -> Self {
        self.node.strain_id = Some(id.into());
        self
    }

    pub fn contribution(mut self, pct: f64) -> Self {
        self.node.contribution_pct = Some(pct);
        self
    }

    pub fn strain_type(mut self, strain_type: StrainType) -> Self {
        self.node.strain_type = Some(strain_type);
        self
    }

    pub fn breeder(mut self, breeder: impl Into<String>) -> Self {
        self.node.breeder = Some(breeder.into());
        self
    }

    pub fn verified(mut self) -> Self {
        self.node.verified = true;
        self
    }

    pub fn source(mut self, source: ProvenanceSource) -> Self {
        self.node.source = Some(source);
        self
    }

    /// Adds an ancestor one generation further back.
    pub fn child<F>(mut self, strain_name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(LineageBuilder) -> LineageBuilder,
    {
        let builder = f(LineageBuilder::new(strain_name, self.node.generation + 1));
        self.node.children.push(builder.build());
        self
    }

    /// Builds the final LineageNode.
    pub fn build(self) -> LineageNode {
        self.node
    }
}

/// Default relationship for a node `generation` steps back.
fn relationship_for_generation(generation: u32) -> LineageRelationship {
    match generation {
        0 => LineageRelationship::Unknown,
        1 => LineageRelationship::Parent,
        2 => LineageRelationship::Grandparent,
        3 => LineageRelationship::GreatGrandparent,
        _ => LineageRelationship::Ancestor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_builder_basic() {
        let profile = GeneticsProfileBuilder::new()
            .parents("GSC", "Gelato")
            .additional_parent("Zkittlez")
            .breeder("Cookies")
            .split(60.0, 40.0)
            .technique(BreedingTechnique::Polyhybrid)
            .feminized()
            .tag("dessert")
            .build();

        assert_eq!(profile.get_all_parents(), vec!["GSC", "Gelato", "Zkittlez"]);
        assert_eq!(profile.breeder.as_deref(), Some("Cookies"));
        assert_eq!(profile.indica_pct, Some(60.0));
        assert!(profile.is_feminized);
        assert!(!profile.is_autoflower);
        assert_eq!(profile.tags, vec!["dessert"]);
    }

    #[test]
    fn test_lineage_builder_generations() {
        let profile = GeneticsProfileBuilder::new()
            .lineage_root("OG Kush", |n| {
                n.child("Chemdawg", |c| c.child("Chem 91", |g| g.child("Unknown Chem", |a| a)))
            })
            .build();

        let root = &profile.lineage[0];
        assert_eq!(root.generation, 1);
        assert_eq!(root.relationship, LineageRelationship::Parent);

        let grand = &root.children[0];
        assert_eq!(grand.generation, 2);
        assert_eq!(grand.relationship, LineageRelationship::Grandparent);

        let great = &grand.children[0];
        assert_eq!(great.generation, 3);
        assert_eq!(great.relationship, LineageRelationship::GreatGrandparent);
        assert_eq!(great.children[0].relationship, LineageRelationship::Ancestor);

        assert_eq!(profile.get_lineage_depth(), Ok(4));
    }

    #[test]
    fn test_builder_primary_source_and_phenotype() {
        let profile = GeneticsProfileBuilder::from_simple("Zkittlez x Sherb")
            .primary_source(ProvenanceSource::new("Cannarado").with_type("breeder"))
            .source(ProvenanceSource::new("Cannarado"))
            .selected_phenotype(PhenotypeVariant::new("Wino #4").with_number(4))
            .build();

        assert_eq!(profile.sources.len(), 1);
        assert_eq!(profile.primary().map(|s| s.source_type.as_str()), Some("breeder"));
        assert_eq!(profile.get_selected_phenotype().map(|p| p.phenotype_name.as_str()), Some("Wino #4"));
        assert_eq!(profile.parent_1.as_deref(), Some("Zkittlez"));
    }
}
