//! Phenotype variants: named expressions of a strain.

use std::collections::BTreeMap;

use crate::model::StrainType;

/// An inclusive numeric range where either bound may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns true if `value` lies within the known bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// One expression of a strain that differs from its canonical description,
/// e.g. "Wino #4" or a clone-only cut.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhenotypeVariant {
    pub phenotype_name: String,
    /// Selection number as written by the breeder, without the `#`.
    pub phenotype_number: Option<String>,
    pub discovered_by: Option<String>,
    pub discovery_year: Option<i32>,
    pub strain_type: Option<StrainType>,
    pub indica_pct: Option<f64>,
    pub sativa_pct: Option<f64>,
    /// Characteristics that set this phenotype apart.
    pub traits: Vec<String>,
    pub thc_range: Option<Range>,
    pub cbd_range: Option<Range>,
    /// Terpene name to typical percentage.
    pub terpene_profile: BTreeMap<String, f64>,
    pub flowering_days: Option<Range>,
    /// Yield in grams per square meter.
    pub yield_range: Option<Range>,
    pub is_clone_only: bool,
    pub notes: Option<String>,
}

impl PhenotypeVariant {
    pub fn new(phenotype_name: impl Into<String>) -> Self {
        Self {
            phenotype_name: phenotype_name.into(),
            ..Default::default()
        }
    }

    pub fn with_number(mut self, number: impl ToString) -> Self {
        self.phenotype_number = Some(number.to_string());
        self
    }

    pub fn with_trait(mut self, t: impl Into<String>) -> Self {
        self.traits.push(t.into());
        self
    }

    /// The dominant terpene of the override profile, if any is set.
    pub fn dominant_terpene(&self) -> Option<&str> {
        self.terpene_profile
            .iter()
            .filter(|(_, pct)| **pct > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_contains() {
        let r = Range::new(18.0, 24.0);
        assert!(r.contains(18.0));
        assert!(r.contains(24.0));
        assert!(!r.contains(25.0));

        let open = Range {
            min: Some(60.0),
            max: None,
        };
        assert!(open.contains(90.0));
        assert!(Range::default().is_empty());
    }

    #[test]
    fn test_phenotype_builder() {
        let pheno = PhenotypeVariant::new("Wino #4")
            .with_number(4)
            .with_trait("purple calyxes");
        assert_eq!(pheno.phenotype_number.as_deref(), Some("4"));
        assert_eq!(pheno.traits, vec!["purple calyxes".to_string()]);
        assert!(!pheno.is_clone_only);
    }

    #[test]
    fn test_dominant_terpene() {
        let mut pheno = PhenotypeVariant::new("Tropical Teeth #2");
        assert_eq!(pheno.dominant_terpene(), None);

        pheno.terpene_profile.insert("limonene".into(), 0.8);
        pheno.terpene_profile.insert("myrcene".into(), 0.3);
        assert_eq!(pheno.dominant_terpene(), Some("limonene"));
    }
}
