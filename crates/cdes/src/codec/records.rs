//! Flat record encoding: strains, lab profiles, batches, products.
//!
//! Lab profiles always carry their fixed measurement fields and computed
//! totals so consumers need not recompute them.

use serde_json::Value;

use crate::codec::genetics::{decode_genetics_profile, encode_genetics_profile};
use crate::codec::map::{MapReader, MapWriter, WireMap};
use crate::error::DecodeError;
use crate::model::{
    Batch, CannabinoidEntry, CannabinoidProfile, Concentration, ConcentrationUnit, Product, Strain,
    StrainType, TerpeneEntry, TerpeneProfile, FIXED_TERPENE_FIELDS,
};

// =============================================================================
// Strain
// =============================================================================

/// Encodes a strain. The genetics profile, when present, is nested under
/// `geneticsProfile`.
pub fn encode_strain(strain: &Strain) -> WireMap {
    let mut w = MapWriter::new();
    w.put("name", strain.name.as_str())
        .put("type", strain.strain_type.as_str())
        .put_opt_str("id", strain.id.as_deref())
        .put_opt_str("displayName", strain.display_name.as_deref())
        .put_opt_str("genetics", strain.genetics.as_deref())
        .put_opt_str("breeder", strain.breeder.as_deref())
        .put_opt_str("description", strain.description.as_deref())
        .put_str_list("effects", &strain.effects)
        .put_str_list("flavors", &strain.flavors)
        .put_str_list("aromas", &strain.aromas)
        .put_str_list("aliases", &strain.aliases)
        .put_opt_f64("typicalThcMin", strain.typical_thc_min)
        .put_opt_f64("typicalThcMax", strain.typical_thc_max)
        .put_opt_f64("typicalCbdMin", strain.typical_cbd_min)
        .put_opt_f64("typicalCbdMax", strain.typical_cbd_max);
    if let Some(profile) = &strain.typical_terpene_profile {
        w.put_map("typicalTerpeneProfile", encode_terpene_profile(profile));
    }
    if let Some(profile) = &strain.genetics_profile {
        w.put_map("geneticsProfile", encode_genetics_profile(profile));
    }
    w.finish()
}

/// Decodes a strain. Only `name` is required.
pub fn decode_strain(map: &WireMap) -> Result<Strain, DecodeError> {
    let r = MapReader::new(map, "strain");
    Ok(Strain {
        name: r.required_str("name")?,
        strain_type: r
            .opt_str("type")?
            .map_or(StrainType::Unknown, |s| StrainType::from_wire(&s)),
        id: r.opt_str("id")?,
        display_name: r.opt_str("displayName")?,
        genetics: r.opt_str("genetics")?,
        genetics_profile: r
            .object("geneticsProfile")?
            .map(decode_genetics_profile)
            .transpose()?,
        breeder: r.opt_str("breeder")?,
        description: r.opt_str("description")?,
        effects: r.str_list("effects")?,
        flavors: r.str_list("flavors")?,
        aromas: r.str_list("aromas")?,
        aliases: r.str_list("aliases")?,
        typical_thc_min: r.opt_f64("typicalThcMin")?,
        typical_thc_max: r.opt_f64("typicalThcMax")?,
        typical_cbd_min: r.opt_f64("typicalCbdMin")?,
        typical_cbd_max: r.opt_f64("typicalCbdMax")?,
        typical_terpene_profile: r
            .object("typicalTerpeneProfile")?
            .map(decode_terpene_profile)
            .transpose()?,
    })
}

// =============================================================================
// Lab profiles
// =============================================================================

/// Encodes a concentration as `{value, unit}`.
pub fn encode_concentration(c: &Concentration) -> WireMap {
    let mut w = MapWriter::new();
    w.put_opt_f64("value", Some(c.value)).put("unit", c.unit.as_str());
    w.finish()
}

/// Encodes a terpene profile. All fixed fields are written, along with the
/// computed total and dominant terpene.
pub fn encode_terpene_profile(profile: &TerpeneProfile) -> WireMap {
    let mut w = MapWriter::new();
    for (name, value) in FIXED_TERPENE_FIELDS.iter().zip(profile.to_vector()) {
        w.put_opt_f64(name, Some(value));
    }
    w.put_opt_f64("total", Some(profile.get_total()))
        .put_opt_str("dominantTerpene", profile.get_dominant().as_deref())
        .put_list("terpenes", &profile.terpenes, encode_terpene_entry);
    w.finish()
}

/// Decodes a terpene profile. Missing fixed fields read as zero.
pub fn decode_terpene_profile(map: &WireMap) -> Result<TerpeneProfile, DecodeError> {
    let r = MapReader::new(map, "terpene profile");
    let mut profile = TerpeneProfile {
        total: r.opt_f64("total")?,
        dominant_terpene: r.opt_str("dominantTerpene")?,
        terpenes: r
            .objects("terpenes")?
            .into_iter()
            .map(decode_terpene_entry)
            .collect::<Result<_, _>>()?,
        ..Default::default()
    };
    for name in FIXED_TERPENE_FIELDS {
        if let Some(value) = r.opt_f64(name)? {
            profile.set_fixed(name, value);
        }
    }
    Ok(profile)
}

pub fn encode_terpene_entry(entry: &TerpeneEntry) -> WireMap {
    let mut w = MapWriter::new();
    w.put("name", entry.name.as_str())
        .put_opt_f64("value", Some(entry.value))
        .put("unit", entry.unit.as_str())
        .put_opt_str("cdesId", entry.cdes_id.as_deref())
        .put_opt_str("casNumber", entry.cas_number.as_deref())
        .put_opt_f64("lod", entry.lod)
        .put_opt_f64("loq", entry.loq);
    w.finish()
}

pub fn decode_terpene_entry(map: &WireMap) -> Result<TerpeneEntry, DecodeError> {
    let r = MapReader::new(map, "terpene entry");
    Ok(TerpeneEntry {
        name: r.required_str("name")?,
        value: required_f64(&r, "value", "terpene entry")?,
        unit: r.enum_or_default::<ConcentrationUnit>("unit")?,
        cdes_id: r.opt_str("cdesId")?,
        cas_number: r.opt_str("casNumber")?,
        lod: r.opt_f64("lod")?,
        loq: r.opt_f64("loq")?,
    })
}

/// Encodes a cannabinoid profile with its computed total.
pub fn encode_cannabinoid_profile(profile: &CannabinoidProfile) -> WireMap {
    let mut w = MapWriter::new();
    w.put_opt_f64("thc", Some(profile.thc))
        .put_opt_f64("thca", Some(profile.thca))
        .put_opt_f64("cbd", Some(profile.cbd))
        .put_opt_f64("cbda", Some(profile.cbda))
        .put_opt_f64("cbg", Some(profile.cbg))
        .put_opt_f64("cbn", Some(profile.cbn))
        .put_opt_f64("cbc", Some(profile.cbc))
        .put_opt_f64("thcv", Some(profile.thcv))
        .put_opt_f64("total", Some(profile.get_total()))
        .put_list("cannabinoids", &profile.cannabinoids, encode_cannabinoid_entry);
    w.finish()
}

pub fn encode_cannabinoid_entry(entry: &CannabinoidEntry) -> WireMap {
    let mut w = MapWriter::new();
    w.put("name", entry.name.as_str())
        .put_opt_f64("value", Some(entry.value))
        .put("unit", entry.unit.as_str())
        .put_opt_str("cdesId", entry.cdes_id.as_deref())
        .put_opt_f64("lod", entry.lod)
        .put_opt_f64("loq", entry.loq)
        .put_flag("isBelowLoq", entry.is_below_loq);
    w.finish()
}

fn required_f64(
    r: &MapReader<'_>,
    field: &'static str,
    context: &'static str,
) -> Result<f64, DecodeError> {
    r.opt_f64(field)?
        .ok_or(DecodeError::MissingField { field, context })
}

// =============================================================================
// Inventory
// =============================================================================

pub fn encode_batch(batch: &Batch) -> WireMap {
    let mut w = MapWriter::new();
    w.put("id", batch.id.as_str())
        .put("batchNumber", batch.batch_number.as_str())
        .put_opt_str("strainName", batch.strain_name.as_deref())
        .put_opt_str("strainId", batch.strain_id.as_deref())
        .put_date("harvestDate", batch.harvest_date.as_ref())
        .put_date("packageDate", batch.package_date.as_ref())
        .put_opt_f64("thcPercentage", batch.thc_percentage)
        .put_opt_f64("cbdPercentage", batch.cbd_percentage)
        .put_opt_f64("totalCannabinoids", batch.total_cannabinoids)
        .put_opt_f64("totalTerpenes", batch.total_terpenes)
        .put_opt_str("producer", batch.producer.as_deref())
        .put_opt_str("licenseNumber", batch.license_number.as_deref())
        .put_opt_str("labName", batch.lab_name.as_deref())
        .put_date("analysisDate", batch.analysis_date.as_ref())
        .put_opt_str("coaUrl", batch.coa_url.as_deref());
    if let Some(profile) = &batch.terpene_profile {
        w.put_map("terpeneProfile", encode_terpene_profile(profile));
    }
    if let Some(profile) = &batch.cannabinoid_profile {
        w.put_map("cannabinoidProfile", encode_cannabinoid_profile(profile));
    }
    w.finish()
}

pub fn encode_product(product: &Product) -> WireMap {
    let mut w = MapWriter::new();
    w.put("id", product.id.as_str())
        .put("name", product.name.as_str())
        .put("category", product.category.as_str())
        .put_opt_str("sku", product.sku.as_deref())
        .put_opt_str("brand", product.brand.as_deref())
        .put_opt_str("subcategory", product.subcategory.as_deref())
        .put_opt_str("strainName", product.strain_name.as_deref())
        .put_opt_str("strainId", product.strain_id.as_deref())
        .put_opt_str("batchNumber", product.batch_number.as_deref())
        .put_opt_str("batchId", product.batch_id.as_deref())
        .put_opt_f64("thcPercentage", product.thc_percentage)
        .put_opt_f64("cbdPercentage", product.cbd_percentage)
        .put_opt_f64("thcMg", product.thc_mg)
        .put_opt_f64("cbdMg", product.cbd_mg)
        .put_opt_f64("weightGrams", product.weight_grams)
        .put_opt_u32("servings", product.servings)
        .put_opt_str("description", product.description.as_deref())
        .put_opt_str("imageUrl", product.image_url.as_deref());
    if let Some(profile) = &product.terpene_profile {
        w.put_map("terpeneProfile", encode_terpene_profile(profile));
    }
    w.finish()
}

/// Encodes a list of strains as a JSON array.
pub fn encode_strains(strains: &[Strain]) -> Value {
    Value::Array(strains.iter().map(|s| Value::Object(encode_strain(s))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{create_strain_with_genetics, ProductCategory};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_strain_roundtrip_with_profile() {
        let mut strain = create_strain_with_genetics(
            "Wino #4",
            "Zkittlez x Sherb",
            StrainType::Hybrid,
            Some("Cannarado"),
        );
        strain.effects = vec!["relaxed".into()];
        strain.typical_thc_min = Some(22.0);

        let map = encode_strain(&strain);
        assert_eq!(map["type"], json!("hybrid"));
        assert_eq!(map["geneticsProfile"]["parent1"], json!("Zkittlez"));
        assert_eq!(map["geneticsProfile"]["phenotypes"][0]["phenotypeNumber"], json!("4"));

        assert_eq!(decode_strain(&map).unwrap(), strain);
    }

    #[test]
    fn test_strain_minimal() {
        let map = encode_strain(&Strain::new("Blue Dream", StrainType::Unknown));
        assert_eq!(Value::Object(map), json!({ "name": "Blue Dream", "type": "unknown" }));
    }

    #[test]
    fn test_decode_strain_requires_name() {
        let map = json!({ "type": "indica" });
        let err = decode_strain(map.as_object().unwrap()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                field: "name",
                context: "strain"
            }
        );
    }

    #[test]
    fn test_terpene_profile_encoding() {
        let mut profile = TerpeneProfile::default();
        profile.set_fixed("myrcene", 0.5);
        profile.set_fixed("limonene", 0.25);
        let mut entry = TerpeneEntry::new("Geraniol", 0.1);
        entry.cdes_id = Some("terpene:geraniol".into());
        profile.terpenes.push(entry);

        let map = encode_terpene_profile(&profile);
        assert_eq!(map["myrcene"], json!(0.5));
        assert_eq!(map["bisabolol"], json!(0.0));
        assert_eq!(map["total"], json!(0.75));
        assert_eq!(map["dominantTerpene"], json!("myrcene"));
        assert_eq!(
            map["terpenes"][0],
            json!({ "name": "Geraniol", "value": 0.1, "unit": "percent", "cdesId": "terpene:geraniol" })
        );

        let decoded = decode_terpene_profile(&map).unwrap();
        assert_eq!(decoded.myrcene, 0.5);
        assert_eq!(decoded.total, Some(0.75));
        assert_eq!(decoded.terpenes, profile.terpenes);
    }

    #[test]
    fn test_cannabinoid_entry_flag() {
        let mut entry = CannabinoidEntry::new("CBN", 0.0);
        assert!(!encode_cannabinoid_entry(&entry).contains_key("isBelowLoq"));
        entry.is_below_loq = true;
        assert_eq!(encode_cannabinoid_entry(&entry)["isBelowLoq"], json!(true));
    }

    #[test]
    fn test_batch_and_product() {
        let mut batch = Batch::new("b-1", "LOT-42");
        batch.harvest_date = NaiveDate::from_ymd_opt(2024, 9, 1);
        batch.thc_percentage = Some(24.5);
        batch.cannabinoid_profile = Some(CannabinoidProfile {
            thca: 26.0,
            ..Default::default()
        });
        let map = encode_batch(&batch);
        assert_eq!(map["batchNumber"], json!("LOT-42"));
        assert_eq!(map["harvestDate"], json!("2024-09-01"));
        assert_eq!(map["cannabinoidProfile"]["total"], json!(26.0));
        assert!(!map.contains_key("labName"));

        let mut product = Product::new("p-1", "Wino #4 3.5g", ProductCategory::PreRoll);
        product.weight_grams = Some(3.5);
        let map = encode_product(&product);
        assert_eq!(map["category"], json!("pre_roll"));
        assert_eq!(map["weightGrams"], json!(3.5));
    }

    #[test]
    fn test_concentration() {
        let map = encode_concentration(&Concentration::percent(1.2));
        assert_eq!(Value::Object(map), json!({ "value": 1.2, "unit": "percent" }));
    }
}
