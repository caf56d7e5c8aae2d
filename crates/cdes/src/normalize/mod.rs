//! Name normalization to CDES identifiers.
//!
//! Lab reports spell compounds many ways ("β-Myrcene", "beta_myrcene",
//! "Myrcene"). These functions map raw names onto stable `terpene:*` and
//! `cannabinoid:*` identifiers plus a display name.

use lazy_static::lazy_static;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::StrainType;

const TERPENE_ALIASES: &[(&str, &str)] = &[
    ("beta-myrcene", "terpene:myrcene"),
    ("b-myrcene", "terpene:myrcene"),
    ("myrcene", "terpene:myrcene"),
    ("alpha-pinene", "terpene:alpha-pinene"),
    ("a-pinene", "terpene:alpha-pinene"),
    ("pinene", "terpene:alpha-pinene"),
    ("beta-pinene", "terpene:beta-pinene"),
    ("b-pinene", "terpene:beta-pinene"),
    ("beta-caryophyllene", "terpene:beta-caryophyllene"),
    ("caryophyllene", "terpene:beta-caryophyllene"),
    ("d-limonene", "terpene:limonene"),
    ("limonene", "terpene:limonene"),
    ("alpha-humulene", "terpene:humulene"),
    ("humulene", "terpene:humulene"),
    ("linalool", "terpene:linalool"),
    ("terpinolene", "terpene:terpinolene"),
    ("ocimene", "terpene:ocimene"),
    ("bisabolol", "terpene:bisabolol"),
    ("alpha-bisabolol", "terpene:bisabolol"),
    ("geraniol", "terpene:geraniol"),
    ("eucalyptol", "terpene:eucalyptol"),
    ("1,8-cineole", "terpene:eucalyptol"),
    ("nerolidol", "terpene:nerolidol"),
    ("valencene", "terpene:valencene"),
    ("camphene", "terpene:camphene"),
    ("carene", "terpene:carene"),
];

const CANNABINOID_ALIASES: &[(&str, &str)] = &[
    ("thc", "cannabinoid:thc"),
    ("delta-9-thc", "cannabinoid:thc"),
    ("d9-thc", "cannabinoid:thc"),
    ("thca", "cannabinoid:thca"),
    ("thc-a", "cannabinoid:thca"),
    ("cbd", "cannabinoid:cbd"),
    ("cbda", "cannabinoid:cbda"),
    ("cbd-a", "cannabinoid:cbda"),
    ("cbg", "cannabinoid:cbg"),
    ("cbga", "cannabinoid:cbga"),
    ("cbn", "cannabinoid:cbn"),
    ("cbc", "cannabinoid:cbc"),
    ("thcv", "cannabinoid:thcv"),
    ("cbdv", "cannabinoid:cbdv"),
    ("delta-8-thc", "cannabinoid:delta8-thc"),
    ("d8-thc", "cannabinoid:delta8-thc"),
];

const STRAIN_TYPE_ALIASES: &[(&str, StrainType)] = &[
    ("indica", StrainType::Indica),
    ("ind", StrainType::Indica),
    ("i", StrainType::Indica),
    ("sativa", StrainType::Sativa),
    ("sat", StrainType::Sativa),
    ("s", StrainType::Sativa),
    ("hybrid", StrainType::Hybrid),
    ("hyb", StrainType::Hybrid),
    ("h", StrainType::Hybrid),
    ("indica dominant", StrainType::Hybrid),
    ("sativa dominant", StrainType::Hybrid),
    ("balanced", StrainType::Hybrid),
    ("50/50", StrainType::Hybrid),
    ("cbd", StrainType::Cbd),
    ("cbd-dominant", StrainType::Cbd),
    ("high cbd", StrainType::Cbd),
    ("hemp", StrainType::Cbd),
    ("unknown", StrainType::Unknown),
    ("n/a", StrainType::Unknown),
    ("none", StrainType::Unknown),
];

lazy_static! {
    static ref TERPENES: FxHashMap<&'static str, &'static str> =
        TERPENE_ALIASES.iter().copied().collect();
    static ref TERPENE_IDS: FxHashSet<&'static str> =
        TERPENE_ALIASES.iter().map(|(_, id)| *id).collect();
    static ref CANNABINOIDS: FxHashMap<&'static str, &'static str> =
        CANNABINOID_ALIASES.iter().copied().collect();
    static ref CANNABINOID_IDS: FxHashSet<&'static str> =
        CANNABINOID_ALIASES.iter().map(|(_, id)| *id).collect();
    static ref STRAIN_TYPES: FxHashMap<&'static str, StrainType> =
        STRAIN_TYPE_ALIASES.iter().copied().collect();
}

/// A normalized compound name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    /// CDES identifier, e.g. `terpene:beta-caryophyllene`.
    pub cdes_id: String,
    /// Display name, e.g. `Beta Caryophyllene`.
    pub canonical: String,
}

impl NormalizedName {
    fn new(cdes_id: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            cdes_id: cdes_id.into(),
            canonical: canonical.into(),
        }
    }

    /// Returns true if the name resolved to a known compound.
    pub fn is_known(&self) -> bool {
        !self.cdes_id.contains(":unknown")
    }
}

/// Normalizes a terpene name.
///
/// Greek letters are spelled out and underscores become hyphens before
/// lookup. Unknown names map to `terpene:unknown:<clean>`.
pub fn normalize_terpene_name(raw: &str) -> NormalizedName {
    if raw.is_empty() {
        return NormalizedName::new("terpene:unknown", "Unknown");
    }
    let clean = raw
        .trim()
        .to_lowercase()
        .replace('_', "-")
        .replace('β', "beta")
        .replace('α', "alpha");

    match TERPENES.get(clean.as_str()) {
        Some(id) => NormalizedName::new(*id, title_case(&id_suffix(id).replace('-', " "))),
        None => NormalizedName::new(format!("terpene:unknown:{clean}"), title_case(raw)),
    }
}

/// Normalizes a cannabinoid name. Canonical names are upper case
/// (`THCA`, `DELTA8-THC`).
pub fn normalize_cannabinoid_name(raw: &str) -> NormalizedName {
    if raw.is_empty() {
        return NormalizedName::new("cannabinoid:unknown", "Unknown");
    }
    let clean = raw.trim().to_lowercase().replace('_', "-");

    match CANNABINOIDS.get(clean.as_str()) {
        Some(id) => NormalizedName::new(*id, id_suffix(id).to_uppercase()),
        None => NormalizedName::new(format!("cannabinoid:unknown:{clean}"), raw.to_uppercase()),
    }
}

/// Normalizes a free-form strain type ("Indica dominant", "hemp", "S").
///
/// Stricter than [`StrainType::from_wire`]: it also knows shorthand and
/// descriptive labels.
pub fn normalize_strain_type(raw: &str) -> StrainType {
    let clean = raw.trim().to_lowercase();
    STRAIN_TYPES
        .get(clean.as_str())
        .copied()
        .unwrap_or(StrainType::Unknown)
}

/// Returns true if `cdes_id` names a known terpene.
pub fn is_known_terpene(cdes_id: &str) -> bool {
    TERPENE_IDS.contains(cdes_id)
}

/// Returns true if `cdes_id` names a known cannabinoid.
pub fn is_known_cannabinoid(cdes_id: &str) -> bool {
    CANNABINOID_IDS.contains(cdes_id)
}

fn id_suffix(id: &str) -> &str {
    id.split_once(':').map_or(id, |(_, rest)| rest)
}

/// Upper-cases the first letter of every alphabetic run and lower-cases
/// the rest ("1,8-cineole" becomes "1,8-Cineole").
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terpene_aliases() {
        let n = normalize_terpene_name("β-Caryophyllene");
        assert_eq!(n.cdes_id, "terpene:beta-caryophyllene");
        assert_eq!(n.canonical, "Beta Caryophyllene");
        assert!(n.is_known());

        assert_eq!(normalize_terpene_name(" D_Limonene ").cdes_id, "terpene:limonene");
        assert_eq!(normalize_terpene_name("α-pinene").canonical, "Alpha Pinene");
        assert_eq!(normalize_terpene_name("1,8-Cineole").canonical, "Eucalyptol");
    }

    #[test]
    fn test_terpene_unknown() {
        let n = normalize_terpene_name("Phytol acetate");
        assert_eq!(n.cdes_id, "terpene:unknown:phytol acetate");
        assert_eq!(n.canonical, "Phytol Acetate");
        assert!(!n.is_known());

        let empty = normalize_terpene_name("");
        assert_eq!(empty, NormalizedName::new("terpene:unknown", "Unknown"));
    }

    #[test]
    fn test_cannabinoids() {
        let n = normalize_cannabinoid_name("THC-A");
        assert_eq!(n.cdes_id, "cannabinoid:thca");
        assert_eq!(n.canonical, "THCA");
        assert_eq!(normalize_cannabinoid_name("d8_thc").canonical, "DELTA8-THC");

        let unknown = normalize_cannabinoid_name("cbl");
        assert_eq!(unknown.cdes_id, "cannabinoid:unknown:cbl");
        assert_eq!(unknown.canonical, "CBL");
    }

    #[test]
    fn test_strain_types() {
        assert_eq!(normalize_strain_type("Indica Dominant"), StrainType::Hybrid);
        assert_eq!(normalize_strain_type("S"), StrainType::Sativa);
        assert_eq!(normalize_strain_type("hemp"), StrainType::Cbd);
        assert_eq!(normalize_strain_type(""), StrainType::Unknown);
        assert_eq!(normalize_strain_type("ruderalis"), StrainType::Unknown);
    }

    #[test]
    fn test_known_ids() {
        assert!(is_known_terpene("terpene:myrcene"));
        assert!(!is_known_terpene("myrcene"));
        assert!(is_known_cannabinoid("cannabinoid:delta8-thc"));
        assert!(!is_known_cannabinoid("terpene:myrcene"));
    }
}
