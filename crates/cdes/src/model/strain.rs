//! Strain records and their genetics accessors.

use crate::error::LineageError;
use crate::model::{GeneticsProfile, PhenotypeVariant, StrainType, TerpeneProfile};
use crate::parse::{parse_strain_name, split_parents};

/// A cannabis strain.
///
/// Genetics may be recorded as a plain string (`genetics`), as a full
/// [`GeneticsProfile`], or both. Derived queries prefer the profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strain {
    pub name: String,
    pub strain_type: StrainType,
    pub id: Option<String>,
    pub display_name: Option<String>,
    /// Plain-text genetics, kept verbatim for older consumers.
    pub genetics: Option<String>,
    pub genetics_profile: Option<GeneticsProfile>,
    pub breeder: Option<String>,
    pub description: Option<String>,
    pub effects: Vec<String>,
    pub flavors: Vec<String>,
    pub aromas: Vec<String>,
    pub aliases: Vec<String>,
    pub typical_thc_min: Option<f64>,
    pub typical_thc_max: Option<f64>,
    pub typical_cbd_min: Option<f64>,
    pub typical_cbd_max: Option<f64>,
    pub typical_terpene_profile: Option<TerpeneProfile>,
}

impl Strain {
    pub fn new(name: impl Into<String>, strain_type: StrainType) -> Self {
        Self {
            name: name.into(),
            strain_type,
            ..Default::default()
        }
    }

    /// Parent names, from the profile when it names any, otherwise from the
    /// plain genetics string.
    pub fn get_parents(&self) -> Vec<String> {
        if let Some(profile) = &self.genetics_profile {
            let parents = profile.get_all_parents();
            if !parents.is_empty() {
                return parents.into_iter().map(String::from).collect();
            }
        }
        self.genetics.as_deref().map(split_parents).unwrap_or_default()
    }

    /// Lineage depth of the profile; a plain genetics string counts as one
    /// generation.
    pub fn get_lineage_depth(&self) -> Result<usize, LineageError> {
        match &self.genetics_profile {
            Some(profile) if profile.has_genetics() => profile.get_lineage_depth(),
            _ => Ok(usize::from(self.genetics.as_deref().is_some_and(|g| !g.trim().is_empty()))),
        }
    }
}

/// Builds a strain from a name and breeder notation.
///
/// The name's phenotype number (if any) becomes a [`PhenotypeVariant`]
/// named after the full strain name and is marked as selected. The genetics
/// string is parsed into the profile and also kept verbatim on the strain.
pub fn create_strain_with_genetics(
    name: &str,
    genetics: &str,
    strain_type: StrainType,
    breeder: Option<&str>,
) -> Strain {
    let parsed = parse_strain_name(name);
    let mut profile = GeneticsProfile::from_simple(genetics);

    if let Some(breeder) = breeder {
        profile.breeder = Some(breeder.to_string());
    }

    if let Some(number) = parsed.pheno_number {
        profile.add_phenotype(PhenotypeVariant::new(name).with_number(number));
        profile.selected_phenotype = Some(name.to_string());
    }

    Strain {
        name: name.to_string(),
        display_name: Some(name.to_string()),
        strain_type,
        breeder: breeder.map(String::from),
        genetics: Some(genetics.to_string()),
        genetics_profile: Some(profile),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BreedingTechnique;

    #[test]
    fn test_factory_with_phenotype() {
        let strain = create_strain_with_genetics(
            "Wino #4",
            "Zkittlez x Sherb",
            StrainType::Hybrid,
            Some("Cannarado"),
        );

        assert_eq!(strain.name, "Wino #4");
        assert_eq!(strain.display_name.as_deref(), Some("Wino #4"));
        assert_eq!(strain.genetics.as_deref(), Some("Zkittlez x Sherb"));
        assert_eq!(strain.breeder.as_deref(), Some("Cannarado"));

        let profile = strain.genetics_profile.as_ref().unwrap();
        assert_eq!(profile.breeder.as_deref(), Some("Cannarado"));
        assert_eq!(profile.phenotypes.len(), 1);
        assert_eq!(profile.phenotypes[0].phenotype_name, "Wino #4");
        assert_eq!(profile.phenotypes[0].phenotype_number.as_deref(), Some("4"));
        assert_eq!(profile.selected_phenotype.as_deref(), Some("Wino #4"));
        assert_eq!(strain.get_parents(), vec!["Zkittlez", "Sherb"]);
    }

    #[test]
    fn test_factory_without_phenotype() {
        let strain = create_strain_with_genetics(
            "Triangle Kush",
            "Hindu Kush x Lemon Thai x Chemdawg",
            StrainType::Indica,
            None,
        );
        let profile = strain.genetics_profile.as_ref().unwrap();
        assert!(profile.phenotypes.is_empty());
        assert_eq!(profile.selected_phenotype, None);
        assert_eq!(profile.breeder, None);
        assert_eq!(profile.breeding_technique, BreedingTechnique::Polyhybrid);
        assert_eq!(strain.get_parents().len(), 3);
    }

    #[test]
    fn test_get_parents_from_plain_string() {
        let mut strain = Strain::new("Blue Dream", StrainType::Hybrid);
        assert!(strain.get_parents().is_empty());
        assert_eq!(strain.get_lineage_depth(), Ok(0));

        strain.genetics = Some("Blueberry  Haze".into());
        assert_eq!(strain.get_parents(), vec!["Blueberry", "Haze"]);
        assert_eq!(strain.get_lineage_depth(), Ok(1));
    }

    #[test]
    fn test_profile_takes_precedence() {
        let mut strain = Strain::new("Blue Dream", StrainType::Hybrid);
        strain.genetics = Some("Blueberry x Haze".into());
        strain.genetics_profile = Some(GeneticsProfile::cross("DJ Short Blueberry", "Super Silver Haze"));
        assert_eq!(strain.get_parents(), vec!["DJ Short Blueberry", "Super Silver Haze"]);
    }
}
