//! Wire-map encoding/decoding for CDES records.
//!
//! Records travel as JSON objects with camelCase keys. Values equal to
//! their default are never written, and decoding treats an absent key as
//! the default.

pub mod genetics;
pub mod map;
pub mod records;

pub use genetics::{
    decode_cup_win, decode_genetics_profile, decode_genetics_profile_value, decode_lineage_node,
    decode_phenotype, decode_source, encode_cup_win, encode_genetics_profile, encode_lineage_node,
    encode_phenotype, encode_source, CDES_VERSION, GENETICS_SCHEMA,
};
pub use map::{MapReader, MapWriter, WireMap};
pub use records::{
    decode_strain, decode_terpene_entry, decode_terpene_profile, encode_batch,
    encode_cannabinoid_entry, encode_cannabinoid_profile, encode_concentration, encode_product,
    encode_strain, encode_strains, encode_terpene_entry, encode_terpene_profile,
};
