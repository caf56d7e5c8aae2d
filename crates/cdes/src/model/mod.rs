//! Data model types for CDES.
//!
//! This module contains the record types exchanged under the standard:
//! - Vocabularies (strain type, breeding technique, confidence, ...)
//! - The genetics graph (profiles, lineage trees, phenotypes, provenance)
//! - Strains and flat lab/inventory records
//! - Builders (ergonomic construction)

pub mod builder;
pub mod genetics;
pub mod lineage;
pub mod phenotype;
pub mod provenance;
pub mod records;
pub mod strain;
pub mod vocab;

pub use builder::{GeneticsProfileBuilder, LineageBuilder};
pub use genetics::{CupWin, GeneticsProfile};
pub use lineage::{forest_depth, LineageIter, LineageNode};
pub use phenotype::{PhenotypeVariant, Range};
pub use provenance::{ProvenanceSource, DEFAULT_SOURCE_TYPE};
pub use records::{
    Batch, CannabinoidEntry, CannabinoidProfile, Concentration, Product, TerpeneEntry,
    TerpeneProfile, FIXED_TERPENE_FIELDS,
};
pub use strain::{create_strain_with_genetics, Strain};
pub use vocab::{
    BreedingTechnique, ConcentrationUnit, ConfidenceLevel, GeneticsStability, LineageRelationship,
    ProductCategory, StockLevel, StrainType,
};
