//! Closed vocabularies used across CDES records.
//!
//! Every enum converts from arbitrary wire strings without failing: values
//! outside the vocabulary land on the enum's fallback variant. This keeps
//! older readers working when newer producers extend a vocabulary.

use std::fmt;

/// Declares a wire enum with `as_str`, a total `from_wire`, `Default`, and
/// `Display`. Matching is case-insensitive after trimming; extra aliases may
/// be listed after the canonical string.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal $(| $alias:literal)*,
            )+
        }
        fallback = $fallback:ident;
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Converts a wire string, mapping anything unrecognized to
            #[doc = concat!("`", stringify!($name), "::", stringify!($fallback), "`.")]
            pub fn from_wire(s: &str) -> $name {
                let clean = s.trim().to_ascii_lowercase();
                match clean.as_str() {
                    $($wire $(| $alias)* => $name::$variant,)+
                    _ => $name::$fallback,
                }
            }

            /// Returns true if this is the default value (omitted on the wire).
            pub fn is_default(self) -> bool {
                self == $name::$default
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::from_wire(s)
            }
        }
    };
}

wire_enum! {
    /// Cannabis strain classification.
    pub enum StrainType {
        Indica => "indica",
        Sativa => "sativa",
        Hybrid => "hybrid",
        Cbd => "cbd",
        Unknown => "unknown",
    }
    fallback = Unknown;
    default = Unknown;
}

wire_enum! {
    /// How a cultivar was produced.
    pub enum BreedingTechnique {
        /// Two distinct parent lines.
        Cross => "cross",
        /// Hybrid crossed back to one of its parents.
        Backcross => "backcross" | "bx",
        /// Self-pollinated (reversed female).
        Selfing => "selfing" | "s1",
        /// Filial generation bred for stability.
        Inbred => "inbred" | "ibl",
        /// More than two named parents.
        Polyhybrid => "polyhybrid",
        /// Selected from a naturally occurring population.
        Landrace => "landrace",
        /// Clone selection from an existing population.
        Selection => "selection",
        Mutation => "mutation",
        Unknown => "unknown",
    }
    fallback = Unknown;
    default = Unknown;
}

wire_enum! {
    /// How consistently a cultivar expresses across seeds.
    pub enum GeneticsStability {
        Stable => "stable",
        Moderate => "moderate",
        Unstable => "unstable",
        Landrace => "landrace",
        Unknown => "unknown",
    }
    fallback = Unknown;
    default = Unknown;
}

wire_enum! {
    /// Trust rating attached to a genetics claim or provenance source.
    pub enum ConfidenceLevel {
        Verified => "verified",
        High => "high",
        Medium => "medium",
        Low => "low",
        Disputed => "disputed",
        Unknown => "unknown",
    }
    fallback = Unknown;
    default = Unknown;
}

wire_enum! {
    /// Relationship of a lineage node to the strain that owns the tree.
    pub enum LineageRelationship {
        Parent => "parent",
        Mother => "mother",
        Father => "father",
        Grandparent => "grandparent",
        GreatGrandparent => "great_grandparent" | "great-grandparent",
        Ancestor => "ancestor",
        Sibling => "sibling",
        Child => "child",
        Unknown => "unknown",
    }
    fallback = Unknown;
    default = Parent;
}

wire_enum! {
    /// Units for concentration measurements.
    pub enum ConcentrationUnit {
        Percent => "percent" | "%",
        MgPerGram => "mg_g" | "mg/g",
        Ppm => "ppm",
    }
    fallback = Percent;
    default = Percent;
}

wire_enum! {
    /// Cannabis product categories.
    pub enum ProductCategory {
        Flower => "flower",
        Concentrate => "concentrate",
        Edible => "edible",
        Vape => "vape",
        Topical => "topical",
        Tincture => "tincture",
        Capsule => "capsule",
        PreRoll => "pre_roll" | "pre-roll",
        Rso => "rso",
        Other => "other",
    }
    fallback = Other;
    default = Other;
}

wire_enum! {
    /// Inventory stock level indicator.
    pub enum StockLevel {
        InStock => "in_stock",
        LowStock => "low_stock",
        OutOfStock => "out_of_stock",
    }
    fallback = OutOfStock;
    default = InStock;
}

impl ConfidenceLevel {
    /// Ordinal used when comparing trust; higher is more trusted.
    /// `Disputed` ranks below `Low`.
    pub fn rank(self) -> u8 {
        match self {
            ConfidenceLevel::Verified => 5,
            ConfidenceLevel::High => 4,
            ConfidenceLevel::Medium => 3,
            ConfidenceLevel::Low => 2,
            ConfidenceLevel::Disputed => 1,
            ConfidenceLevel::Unknown => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire_known_values() {
        assert_eq!(StrainType::from_wire("indica"), StrainType::Indica);
        assert_eq!(StrainType::from_wire("  Sativa "), StrainType::Sativa);
        assert_eq!(BreedingTechnique::from_wire("BX"), BreedingTechnique::Backcross);
        assert_eq!(
            LineageRelationship::from_wire("great-grandparent"),
            LineageRelationship::GreatGrandparent
        );
        assert_eq!(ProductCategory::from_wire("pre-roll"), ProductCategory::PreRoll);
    }

    #[test]
    fn test_from_wire_fallback() {
        assert_eq!(StrainType::from_wire("ruderalis"), StrainType::Unknown);
        assert_eq!(ConfidenceLevel::from_wire(""), ConfidenceLevel::Unknown);
        assert_eq!(LineageRelationship::from_wire("cousin"), LineageRelationship::Unknown);
        assert_eq!(GeneticsStability::from_wire("???"), GeneticsStability::Unknown);
        assert_eq!(ProductCategory::from_wire("beverage"), ProductCategory::Other);
    }

    #[test]
    fn test_wire_roundtrip_all_variants() {
        for v in BreedingTechnique::ALL {
            assert_eq!(BreedingTechnique::from_wire(v.as_str()), *v);
        }
        for v in LineageRelationship::ALL {
            assert_eq!(LineageRelationship::from_wire(v.as_str()), *v);
        }
        for v in ConfidenceLevel::ALL {
            assert_eq!(ConfidenceLevel::from_wire(&v.to_string()), *v);
        }
    }

    #[test]
    fn test_defaults() {
        assert!(LineageRelationship::Parent.is_default());
        assert!(BreedingTechnique::default().is_default());
        assert_eq!(ConfidenceLevel::default(), ConfidenceLevel::Unknown);
    }

    #[test]
    fn test_confidence_rank() {
        assert!(ConfidenceLevel::Verified.rank() > ConfidenceLevel::High.rank());
        assert!(ConfidenceLevel::Low.rank() > ConfidenceLevel::Disputed.rank());
    }
}
