//! CDES v1.0: Cannabis Data Exchange Standard.
//!
//! This crate provides the genetics lineage model, a parser for informal
//! breeder notation, wire-map encoding, and validation for CDES records.
//!
//! # Overview
//!
//! A strain's genetics are captured by a [`GeneticsProfile`]:
//! - **Parents**: ordered primary and additional parents
//! - **Lineage**: a tree of ancestors with relationships and generations
//! - **Phenotypes**: named selections such as "Wino #4"
//! - **Provenance**: sources merged by name, newest retrieval wins
//!
//! # Quick Start
//!
//! ```rust
//! use cdes::{create_strain_with_genetics, StrainType};
//! use cdes::codec::{decode_strain, encode_strain};
//!
//! let strain = create_strain_with_genetics(
//!     "Wino #4",
//!     "Zkittlez x Sherb",
//!     StrainType::Hybrid,
//!     Some("Cannarado"),
//! );
//! assert_eq!(strain.get_parents(), vec!["Zkittlez", "Sherb"]);
//!
//! let map = encode_strain(&strain);
//! let decoded = decode_strain(&map).unwrap();
//! assert_eq!(strain, decoded);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types (GeneticsProfile, LineageNode, Strain, ...)
//! - [`parse`]: Strain-name and genetics-string parsing
//! - [`codec`]: Wire-map encoding/decoding
//! - [`validate`]: Document and profile validation
//! - [`normalize`]: Terpene/cannabinoid/strain-type name normalization
//! - [`reference`]: Terpene reference library cache
//! - [`telemetry`]: In-memory usage telemetry
//! - [`config`]: Environment configuration
//! - [`error`]: Error types
//! - [`limits`]: Traversal limits
//!
//! # Untrusted input
//!
//! Lineage trees are walked iteratively and bounded by
//! [`limits::MAX_LINEAGE_DEPTH`]; decoding rejects deeper trees with
//! error code E004. Text parsers accept any input.

pub mod codec;
pub mod config;
pub mod error;
pub mod limits;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod reference;
pub mod telemetry;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{decode_genetics_profile, encode_genetics_profile};
pub use config::{ReferenceConfig, TelemetryConfig};
pub use error::{DecodeError, ErrorCode, FieldError, LineageError, ReferenceError};
pub use model::{
    create_strain_with_genetics, BreedingTechnique, ConfidenceLevel, CupWin, GeneticsProfile,
    GeneticsProfileBuilder, GeneticsStability, LineageBuilder, LineageNode, LineageRelationship,
    PhenotypeVariant, ProvenanceSource, Range, Strain, StrainType,
};
pub use normalize::{
    is_known_cannabinoid, is_known_terpene, normalize_cannabinoid_name, normalize_strain_type,
    normalize_terpene_name, NormalizedName,
};
pub use parse::{
    bulk_parse_genetics, parse_genetics_line, parse_genetics_text, parse_strain_name, GeneticsLine,
    ParsedName,
};
pub use reference::ReferenceCache;
pub use telemetry::Telemetry;
pub use validate::{
    validate_cannabinoid_profile, validate_coa, validate_genetics_profile, validate_strain,
    validate_terpene_profile, ValidationResult,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CDES version this crate implements.
pub const SPEC_VERSION: &str = codec::CDES_VERSION;
