//! Validation for CDES records.
//!
//! Two layers are provided. The `validate_*` functions over
//! [`serde_json::Value`] check documents as received from other systems,
//! before any decoding. [`validate_genetics_profile`] checks the semantic
//! rules of a typed profile that decoding alone cannot enforce.
//!
//! Validators never stop at the first problem: every finding is collected
//! into a [`ValidationResult`].

use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::error::FieldError;
use crate::limits::MAX_PERCENT;
use crate::model::{GeneticsProfile, LineageNode};

/// Strain types accepted by [`validate_strain`].
pub const VALID_STRAIN_TYPES: [&str; 3] = ["indica", "sativa", "hybrid"];

/// Outcome of validating one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Builds a result; valid exactly when there are no errors.
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Paths of all findings, in order.
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

// =============================================================================
// Document validators
// =============================================================================

/// Validates a strain document: `id`, `name` and `type` are required, the
/// type must be indica, sativa or hybrid, and the id must be alphanumeric
/// apart from hyphens.
pub fn validate_strain(data: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    require_fields(data, &["id", "name", "type"], &mut errors);

    if let Some(strain_type) = data.get("type") {
        let known = strain_type
            .as_str()
            .is_some_and(|t| VALID_STRAIN_TYPES.contains(&t));
        if !known {
            errors.push(
                FieldError::new(
                    "$.type",
                    format!("Type must be one of: {}", VALID_STRAIN_TYPES.join(", ")),
                )
                .with_value(strain_type.clone()),
            );
        }
    }

    if let Some(id) = data.get("id") {
        if !id.as_str().is_some_and(is_valid_id) {
            errors.push(
                FieldError::new("$.id", "ID must be lowercase alphanumeric with hyphens")
                    .with_value(id.clone()),
            );
        }
    }

    ValidationResult::from_errors(errors)
}

/// Validates a certificate of analysis: `batchId`, `lab` and `testDate` are
/// required and `lab` must be an object carrying a `name`.
pub fn validate_coa(data: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    require_fields(data, &["batchId", "lab", "testDate"], &mut errors);

    match data.get("lab") {
        None => {}
        Some(Value::Object(lab)) => {
            if !lab.contains_key("name") {
                errors.push(FieldError::new("$.lab.name", "Lab name is required"));
            }
        }
        Some(_) => errors.push(FieldError::new("$.lab", "Lab must be an object")),
    }

    ValidationResult::from_errors(errors)
}

/// Validates a terpene profile document: a `terpenes` array whose entries
/// carry an `id` and a numeric `percentage` between 0 and 100.
pub fn validate_terpene_profile(data: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    for_each_entry(data, "terpenes", "Terpenes", &mut errors, |path, entry, errors| {
        if entry.get("id").is_none() {
            errors.push(FieldError::new(format!("{path}.id"), "Terpene ID is required"));
        }
        let pct_path = format!("{path}.percentage");
        match entry.get("percentage") {
            None => errors.push(FieldError::new(pct_path, "Terpene percentage is required")),
            Some(pct) => match pct.as_f64() {
                None => errors.push(
                    FieldError::new(pct_path, "Percentage must be a number").with_value(pct.clone()),
                ),
                Some(v) if !(0.0..=MAX_PERCENT).contains(&v) => errors.push(
                    FieldError::new(pct_path, "Percentage must be between 0 and 100")
                        .with_value(pct.clone()),
                ),
                Some(_) => {}
            },
        }
    });
    ValidationResult::from_errors(errors)
}

/// Validates a cannabinoid profile document: a `cannabinoids` array whose
/// entries carry an `id` and a `percentage`.
pub fn validate_cannabinoid_profile(data: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    for_each_entry(data, "cannabinoids", "Cannabinoids", &mut errors, |path, entry, errors| {
        if entry.get("id").is_none() {
            errors.push(FieldError::new(format!("{path}.id"), "Cannabinoid ID is required"));
        }
        if entry.get("percentage").is_none() {
            errors.push(FieldError::new(
                format!("{path}.percentage"),
                "Cannabinoid percentage is required",
            ));
        }
    });
    ValidationResult::from_errors(errors)
}

fn require_fields(data: &Value, fields: &[&str], errors: &mut Vec<FieldError>) {
    for field in fields {
        if data.get(field).is_none() {
            errors.push(FieldError::new(
                format!("$.{field}"),
                format!("Required field '{field}' is missing"),
            ));
        }
    }
}

/// Runs `check` over each object in the array at `key`, reporting a missing
/// or non-array field and non-object entries.
fn for_each_entry<F>(data: &Value, key: &str, label: &str, errors: &mut Vec<FieldError>, mut check: F)
where
    F: FnMut(&str, &Value, &mut Vec<FieldError>),
{
    let root = format!("$.{key}");
    match data.get(key) {
        None => errors.push(FieldError::new(root, format!("{label} array is required"))),
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                let path = format!("{root}[{i}]");
                if entry.is_object() {
                    check(&path, entry, errors);
                } else {
                    errors.push(FieldError::new(path, "Entry must be an object").with_value(entry.clone()));
                }
            }
        }
        Some(_) => errors.push(FieldError::new(root, format!("{label} must be an array"))),
    }
}

fn is_valid_id(id: &str) -> bool {
    let stripped: String = id.chars().filter(|c| *c != '-').collect();
    !stripped.is_empty() && stripped.chars().all(char::is_alphanumeric)
}

// =============================================================================
// Genetics profile
// =============================================================================

/// Checks the semantic rules of a genetics profile:
/// - percentages (profile, phenotype, node contribution) lie in [0, 100]
/// - lineage generations are at least 1 and the tree is not over-deep
/// - source names are unique
/// - `selected_phenotype` and `primary_source` name entries that exist
pub fn validate_genetics_profile(profile: &GeneticsProfile) -> ValidationResult {
    let mut errors = Vec::new();

    check_pct("$.indicaPct", profile.indica_pct, &mut errors);
    check_pct("$.sativaPct", profile.sativa_pct, &mut errors);
    check_pct("$.ruderalisPct", profile.ruderalis_pct, &mut errors);

    if let Err(e) = profile.get_lineage_depth() {
        errors.push(FieldError::new("$.lineage", e.to_string()));
    } else {
        for (i, root) in profile.lineage.iter().enumerate() {
            check_lineage(&format!("$.lineage[{i}]"), root, &mut errors);
        }
    }

    for (i, phenotype) in profile.phenotypes.iter().enumerate() {
        let path = format!("$.phenotypes[{i}]");
        if phenotype.phenotype_name.trim().is_empty() {
            errors.push(FieldError::new(format!("{path}.phenotypeName"), "Phenotype name is required"));
        }
        check_pct(&format!("{path}.indicaPct"), phenotype.indica_pct, &mut errors);
        check_pct(&format!("{path}.sativaPct"), phenotype.sativa_pct, &mut errors);
    }

    let mut seen = FxHashSet::default();
    for (i, source) in profile.sources.iter().enumerate() {
        if !seen.insert(source.name.as_str()) {
            errors.push(
                FieldError::new(format!("$.sources[{i}].name"), "Duplicate source name")
                    .with_value(Value::from(source.name.as_str())),
            );
        }
    }

    if let Some(selected) = &profile.selected_phenotype {
        if profile.get_selected_phenotype().is_none() {
            errors.push(
                FieldError::new("$.selectedPhenotype", "Selected phenotype is not in phenotypes")
                    .with_value(Value::from(selected.as_str())),
            );
        }
    }
    if let Some(primary) = &profile.primary_source {
        if profile.primary().is_none() {
            errors.push(
                FieldError::new("$.primarySource", "Primary source is not in sources")
                    .with_value(Value::from(primary.as_str())),
            );
        }
    }

    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "genetics profile failed validation");
    }
    ValidationResult::from_errors(errors)
}

/// Checks one lineage subtree. Depth has already been bounded.
fn check_lineage(root_path: &str, root: &LineageNode, errors: &mut Vec<FieldError>) {
    let mut stack = vec![(root_path.to_string(), root)];
    while let Some((path, node)) = stack.pop() {
        if node.strain_name.trim().is_empty() {
            errors.push(FieldError::new(format!("{path}.strainName"), "Strain name is required"));
        }
        if node.generation < 1 {
            errors.push(
                FieldError::new(format!("{path}.generation"), "Generation must be at least 1")
                    .with_value(Value::from(node.generation)),
            );
        }
        check_pct(&format!("{path}.contributionPct"), node.contribution_pct, errors);

        for (i, child) in node.children.iter().enumerate().rev() {
            stack.push((format!("{path}.children[{i}]"), child));
        }
    }
}

fn check_pct(path: &str, value: Option<f64>, errors: &mut Vec<FieldError>) {
    if let Some(v) = value {
        if !(0.0..=MAX_PERCENT).contains(&v) {
            let mut err = FieldError::new(path, "Percentage must be between 0 and 100");
            if let Some(n) = serde_json::Number::from_f64(v) {
                err = err.with_value(Value::Number(n));
            }
            errors.push(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeneticsProfileBuilder, PhenotypeVariant, ProvenanceSource};
    use serde_json::json;

    #[test]
    fn test_valid_strain() {
        let result = validate_strain(&json!({ "id": "blue-dream", "name": "Blue Dream", "type": "hybrid" }));
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_invalid_strain() {
        let result = validate_strain(&json!({ "id": "blue dream!", "type": "cbd" }));
        assert!(!result.valid);
        assert_eq!(result.paths(), vec!["$.name", "$.type", "$.id"]);
        assert_eq!(result.errors[1].value, Some(json!("cbd")));

        let result = validate_strain(&json!({ "id": "---", "name": "x", "type": "indica" }));
        assert_eq!(result.paths(), vec!["$.id"]);
    }

    #[test]
    fn test_coa() {
        assert!(validate_coa(&json!({ "batchId": "b1", "lab": { "name": "SC Labs" }, "testDate": "2024-01-01" })).valid);

        let result = validate_coa(&json!({ "batchId": "b1", "lab": {} }));
        assert_eq!(result.paths(), vec!["$.testDate", "$.lab.name"]);

        let result = validate_coa(&json!({ "batchId": "b1", "lab": "SC Labs", "testDate": "x" }));
        assert_eq!(result.paths(), vec!["$.lab"]);
    }

    #[test]
    fn test_terpene_profile_document() {
        let result = validate_terpene_profile(&json!({
            "terpenes": [
                { "id": "terpene:myrcene", "percentage": 0.5 },
                { "percentage": "high" },
                { "id": "terpene:limonene", "percentage": 120 },
                { "id": "terpene:linalool" },
            ]
        }));
        assert_eq!(
            result.paths(),
            vec![
                "$.terpenes[1].id",
                "$.terpenes[1].percentage",
                "$.terpenes[2].percentage",
                "$.terpenes[3].percentage",
            ]
        );
        assert_eq!(result.errors[1].message, "Percentage must be a number");

        assert_eq!(validate_terpene_profile(&json!({})).paths(), vec!["$.terpenes"]);
        assert_eq!(
            validate_terpene_profile(&json!({ "terpenes": {} })).errors[0].message,
            "Terpenes must be an array"
        );
    }

    #[test]
    fn test_cannabinoid_profile_document() {
        let result = validate_cannabinoid_profile(&json!({
            "cannabinoids": [{ "id": "cannabinoid:thca", "percentage": 24.1 }, { "id": "cannabinoid:cbg" }]
        }));
        assert_eq!(result.paths(), vec!["$.cannabinoids[1].percentage"]);
    }

    #[test]
    fn test_genetics_profile_valid() {
        let profile = GeneticsProfileBuilder::new()
            .parents("OG Kush", "Durban Poison")
            .split(50.0, 50.0)
            .lineage_root("OG Kush", |n| n.contribution(50.0).child("Chemdawg", |c| c))
            .selected_phenotype(PhenotypeVariant::new("OG #18"))
            .primary_source(ProvenanceSource::new("Breeder"))
            .build();
        assert!(validate_genetics_profile(&profile).valid);
    }

    #[test]
    fn test_genetics_profile_findings() {
        let mut profile = GeneticsProfileBuilder::new()
            .split(120.0, -5.0)
            .lineage_root("A", |n| n.child("B", |c| c.contribution(150.0)))
            .build();
        profile.lineage[0].generation = 0;
        profile.sources.push(ProvenanceSource::new("Leafly"));
        profile.sources.push(ProvenanceSource::new("Leafly"));
        profile.selected_phenotype = Some("missing".into());

        let result = validate_genetics_profile(&profile);
        assert!(!result.valid);
        assert_eq!(
            result.paths(),
            vec![
                "$.indicaPct",
                "$.sativaPct",
                "$.lineage[0].generation",
                "$.lineage[0].children[0].contributionPct",
                "$.sources[1].name",
                "$.selectedPhenotype",
            ]
        );
    }

    #[test]
    fn test_genetics_profile_too_deep() {
        let mut node = LineageNode::new("leaf");
        for i in 0..crate::limits::MAX_LINEAGE_DEPTH {
            node = LineageNode::new(format!("n{i}")).with_child(node);
        }
        let mut profile = GeneticsProfile::new();
        profile.lineage.push(node);
        assert_eq!(validate_genetics_profile(&profile).paths(), vec!["$.lineage"]);
    }
}
