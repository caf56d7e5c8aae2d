//! Genetics profile encoding/decoding.
//!
//! A profile is written as a wire map with `$schema` and `cdesVersion`
//! header fields followed by whichever profile fields carry a value.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::codec::map::{MapReader, MapWriter, WireMap};
use crate::error::DecodeError;
use crate::limits::MAX_LINEAGE_DEPTH;
use crate::model::{
    ConfidenceLevel, CupWin, GeneticsProfile, LineageNode, PhenotypeVariant, ProvenanceSource,
    Range, StrainType, DEFAULT_SOURCE_TYPE,
};

/// Schema URI written into every encoded profile.
pub const GENETICS_SCHEMA: &str =
    "https://cdes.acidni.net/schemas/v1.0/genetics-profile.schema.json";

/// Version of the CDES standard this crate writes.
pub const CDES_VERSION: &str = "1.0";

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a genetics profile from a wire map.
///
/// Every key is optional. Unknown enum strings degrade to the enum's
/// fallback; missing names on nested records are errors.
pub fn decode_genetics_profile(map: &WireMap) -> Result<GeneticsProfile, DecodeError> {
    let r = MapReader::new(map, "genetics profile");

    let lineage = r
        .objects("lineage")?
        .into_iter()
        .map(|node| decode_lineage_node_at(node, 1))
        .collect::<Result<_, _>>()?;
    let phenotypes = r
        .objects("phenotypes")?
        .into_iter()
        .map(decode_phenotype)
        .collect::<Result<_, _>>()?;
    let sources = r
        .objects("sources")?
        .into_iter()
        .map(decode_source)
        .collect::<Result<_, _>>()?;
    let cup_wins = r
        .objects("cupWins")?
        .into_iter()
        .map(decode_cup_win)
        .collect::<Result<_, _>>()?;

    let profile = GeneticsProfile {
        parent_1: r.opt_str("parent1")?,
        parent_2: r.opt_str("parent2")?,
        additional_parents: r.str_list("additionalParents")?,
        lineage_text: r.opt_str("lineageText")?,
        breeder: r.opt_str("breeder")?,
        breeder_url: r.opt_str("breederUrl")?,
        original_breeder: r.opt_str("originalBreeder")?,
        origin_year: r.opt_i32("originYear")?,
        origin_location: r.opt_str("originLocation")?,
        indica_pct: r.opt_f64("indicaPct")?,
        sativa_pct: r.opt_f64("sativaPct")?,
        ruderalis_pct: r.opt_f64("ruderalisPct")?,
        breeding_technique: r.enum_or_default("breedingTechnique")?,
        generation: r.opt_str("generation")?,
        stability: r.enum_or_default("stability")?,
        is_feminized: r.flag("isFeminized")?,
        is_autoflower: r.flag("isAutoflower")?,
        is_clone_only: r.flag("isCloneOnly")?,
        lineage,
        phenotypes,
        selected_phenotype: r.opt_str("selectedPhenotype")?,
        sources,
        primary_source: r.opt_str("primarySource")?,
        confidence: r.enum_or_default("confidence")?,
        last_verified: r.date("lastVerified")?,
        awards: r.str_list("awards")?,
        cup_wins,
        genetic_markers: decode_json_map(&r, "geneticMarkers")?,
        chemotype: r.opt_str("chemotype")?,
        metadata: decode_json_map(&r, "metadata")?,
        tags: r.str_list("tags")?,
    };

    tracing::trace!(
        parents = profile.get_all_parents().len(),
        lineage_roots = profile.lineage.len(),
        sources = profile.sources.len(),
        "decoded genetics profile"
    );

    Ok(profile)
}

/// Decodes a profile from any JSON value; non-objects are rejected.
pub fn decode_genetics_profile_value(value: &Value) -> Result<GeneticsProfile, DecodeError> {
    let map = value.as_object().ok_or(DecodeError::NotAnObject {
        context: "genetics profile",
    })?;
    decode_genetics_profile(map)
}

/// Decodes a lineage node and its ancestors.
pub fn decode_lineage_node(map: &WireMap) -> Result<LineageNode, DecodeError> {
    decode_lineage_node_at(map, 1)
}

fn decode_lineage_node_at(map: &WireMap, depth: usize) -> Result<LineageNode, DecodeError> {
    if depth > MAX_LINEAGE_DEPTH {
        return Err(DecodeError::LineageTooDeep {
            max: MAX_LINEAGE_DEPTH,
        });
    }

    let r = MapReader::new(map, "lineage node");
    let children = r
        .objects("children")?
        .into_iter()
        .map(|child| decode_lineage_node_at(child, depth + 1))
        .collect::<Result<_, _>>()?;

    Ok(LineageNode {
        strain_name: r.required_str("strainName")?,
        strain_id: r.opt_str("strainId")?,
        relationship: r.enum_or_default("relationship")?,
        generation: r.opt_u32("generation")?.unwrap_or(1),
        contribution_pct: r.opt_f64("contributionPct")?,
        strain_type: r.opt_str("strainType")?.map(|s| StrainType::from_wire(&s)),
        breeder: r.opt_str("breeder")?,
        verified: r.flag("verified")?,
        children,
        source: r.object("source")?.map(decode_source).transpose()?,
    })
}

/// Decodes a provenance source.
pub fn decode_source(map: &WireMap) -> Result<ProvenanceSource, DecodeError> {
    let r = MapReader::new(map, "provenance source");
    Ok(ProvenanceSource {
        name: r.required_str("name")?,
        source_type: r
            .opt_str("sourceType")?
            .unwrap_or_else(|| DEFAULT_SOURCE_TYPE.to_string()),
        url: r.opt_str("url")?,
        source_id: r.opt_str("sourceId")?,
        confidence: r
            .opt_str("confidence")?
            .map_or(ConfidenceLevel::Medium, |s| ConfidenceLevel::from_wire(&s)),
        retrieved_at: r.timestamp("retrievedAt")?,
        verified_by: r.opt_str("verifiedBy")?,
        verified_date: r.date("verifiedDate")?,
        notes: r.opt_str("notes")?,
    })
}

/// Decodes a phenotype variant. `phenotypeNumber` may be a string or a
/// JSON number.
pub fn decode_phenotype(map: &WireMap) -> Result<PhenotypeVariant, DecodeError> {
    let r = MapReader::new(map, "phenotype");

    let phenotype_number = match r.get("phenotypeNumber") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            return Err(DecodeError::InvalidType {
                field: "phenotypeNumber",
                expected: "a string or number",
            });
        }
    };

    let mut terpene_profile = BTreeMap::new();
    if let Some(terpenes) = r.object("terpeneProfile")? {
        for (name, pct) in terpenes {
            let pct = pct.as_f64().ok_or(DecodeError::InvalidType {
                field: "terpeneProfile",
                expected: "an object of numbers",
            })?;
            terpene_profile.insert(name.clone(), pct);
        }
    }

    Ok(PhenotypeVariant {
        phenotype_name: r.required_str("phenotypeName")?,
        phenotype_number,
        discovered_by: r.opt_str("discoveredBy")?,
        discovery_year: r.opt_i32("discoveryYear")?,
        strain_type: r.opt_str("strainType")?.map(|s| StrainType::from_wire(&s)),
        indica_pct: r.opt_f64("indicaPct")?,
        sativa_pct: r.opt_f64("sativaPct")?,
        traits: r.str_list("traits")?,
        thc_range: decode_range(&r, "thcRange")?,
        cbd_range: decode_range(&r, "cbdRange")?,
        terpene_profile,
        flowering_days: decode_range(&r, "floweringDays")?,
        yield_range: decode_range(&r, "yieldRange")?,
        is_clone_only: r.flag("isCloneOnly")?,
        notes: r.opt_str("notes")?,
    })
}

/// Decodes a competition placing.
pub fn decode_cup_win(map: &WireMap) -> Result<CupWin, DecodeError> {
    let r = MapReader::new(map, "cup win");
    Ok(CupWin {
        name: r.required_str("name")?,
        year: r.opt_i32("year")?,
        place: r.opt_str("place")?,
        category: r.opt_str("category")?,
    })
}

fn decode_range(r: &MapReader<'_>, key: &'static str) -> Result<Option<Range>, DecodeError> {
    let Some(map) = r.object(key)? else {
        return Ok(None);
    };
    let inner = MapReader::new(map, "range");
    let range = Range {
        min: inner.opt_f64("min")?,
        max: inner.opt_f64("max")?,
    };
    Ok((!range.is_empty()).then_some(range))
}

fn decode_json_map(
    r: &MapReader<'_>,
    key: &'static str,
) -> Result<BTreeMap<String, Value>, DecodeError> {
    Ok(r
        .object(key)?
        .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default())
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a genetics profile to a wire map.
pub fn encode_genetics_profile(profile: &GeneticsProfile) -> WireMap {
    let mut w = MapWriter::new();
    w.put("$schema", GENETICS_SCHEMA)
        .put("cdesVersion", CDES_VERSION)
        .put_opt_str("parent1", profile.parent_1.as_deref())
        .put_opt_str("parent2", profile.parent_2.as_deref())
        .put_str_list("additionalParents", &profile.additional_parents)
        .put_opt_str("lineageText", profile.lineage_text.as_deref())
        .put_opt_str("breeder", profile.breeder.as_deref())
        .put_opt_str("breederUrl", profile.breeder_url.as_deref())
        .put_opt_str("originalBreeder", profile.original_breeder.as_deref())
        .put_opt_i32("originYear", profile.origin_year)
        .put_opt_str("originLocation", profile.origin_location.as_deref())
        .put_opt_f64("indicaPct", profile.indica_pct)
        .put_opt_f64("sativaPct", profile.sativa_pct)
        .put_opt_f64("ruderalisPct", profile.ruderalis_pct)
        .put_enum(
            "breedingTechnique",
            profile.breeding_technique.as_str(),
            profile.breeding_technique.is_default(),
        )
        .put_opt_str("generation", profile.generation.as_deref())
        .put_enum(
            "stability",
            profile.stability.as_str(),
            profile.stability.is_default(),
        )
        .put_flag("isFeminized", profile.is_feminized)
        .put_flag("isAutoflower", profile.is_autoflower)
        .put_flag("isCloneOnly", profile.is_clone_only)
        .put_list("lineage", &profile.lineage, encode_lineage_node)
        .put_list("phenotypes", &profile.phenotypes, encode_phenotype)
        .put_opt_str("selectedPhenotype", profile.selected_phenotype.as_deref())
        .put_list("sources", &profile.sources, encode_source)
        .put_opt_str("primarySource", profile.primary_source.as_deref())
        .put_enum(
            "confidence",
            profile.confidence.as_str(),
            profile.confidence.is_default(),
        )
        .put_date("lastVerified", profile.last_verified.as_ref())
        .put_str_list("awards", &profile.awards)
        .put_list("cupWins", &profile.cup_wins, encode_cup_win)
        .put_map("geneticMarkers", encode_json_map(&profile.genetic_markers))
        .put_opt_str("chemotype", profile.chemotype.as_deref())
        .put_map("metadata", encode_json_map(&profile.metadata))
        .put_str_list("tags", &profile.tags);
    w.finish()
}

/// Encodes a lineage node and its ancestors. Generation 1 and the `parent`
/// relationship are defaults and are omitted.
pub fn encode_lineage_node(node: &LineageNode) -> WireMap {
    let mut w = MapWriter::new();
    w.put("strainName", node.strain_name.as_str())
        .put_opt_str("strainId", node.strain_id.as_deref())
        .put_enum(
            "relationship",
            node.relationship.as_str(),
            node.relationship.is_default(),
        )
        .put_opt_u32("generation", (node.generation != 1).then_some(node.generation))
        .put_opt_f64("contributionPct", node.contribution_pct)
        .put_opt_str("strainType", node.strain_type.map(StrainType::as_str))
        .put_opt_str("breeder", node.breeder.as_deref())
        .put_flag("verified", node.verified)
        .put_list("children", &node.children, encode_lineage_node);
    if let Some(source) = &node.source {
        w.put_map("source", encode_source(source));
    }
    w.finish()
}

/// Encodes a provenance source. The default source type and medium
/// confidence are omitted.
pub fn encode_source(source: &ProvenanceSource) -> WireMap {
    let mut w = MapWriter::new();
    w.put("name", source.name.as_str());
    if source.source_type != DEFAULT_SOURCE_TYPE {
        w.put("sourceType", source.source_type.as_str());
    }
    w.put_opt_str("url", source.url.as_deref())
        .put_opt_str("sourceId", source.source_id.as_deref())
        .put_enum(
            "confidence",
            source.confidence.as_str(),
            source.confidence == ConfidenceLevel::Medium,
        )
        .put_timestamp("retrievedAt", source.retrieved_at.as_ref())
        .put_opt_str("verifiedBy", source.verified_by.as_deref())
        .put_date("verifiedDate", source.verified_date.as_ref())
        .put_opt_str("notes", source.notes.as_deref());
    w.finish()
}

/// Encodes a phenotype variant.
pub fn encode_phenotype(phenotype: &PhenotypeVariant) -> WireMap {
    let terpenes = phenotype
        .terpene_profile
        .iter()
        .filter_map(|(name, pct)| {
            serde_json::Number::from_f64(*pct).map(|n| (name.clone(), Value::Number(n)))
        })
        .collect();

    let mut w = MapWriter::new();
    w.put("phenotypeName", phenotype.phenotype_name.as_str())
        .put_opt_str("phenotypeNumber", phenotype.phenotype_number.as_deref())
        .put_opt_str("discoveredBy", phenotype.discovered_by.as_deref())
        .put_opt_i32("discoveryYear", phenotype.discovery_year)
        .put_opt_str("strainType", phenotype.strain_type.map(StrainType::as_str))
        .put_opt_f64("indicaPct", phenotype.indica_pct)
        .put_opt_f64("sativaPct", phenotype.sativa_pct)
        .put_str_list("traits", &phenotype.traits)
        .put_map("thcRange", encode_range(phenotype.thc_range))
        .put_map("cbdRange", encode_range(phenotype.cbd_range))
        .put_map("terpeneProfile", terpenes)
        .put_map("floweringDays", encode_range(phenotype.flowering_days))
        .put_map("yieldRange", encode_range(phenotype.yield_range))
        .put_flag("isCloneOnly", phenotype.is_clone_only)
        .put_opt_str("notes", phenotype.notes.as_deref());
    w.finish()
}

/// Encodes a competition placing.
pub fn encode_cup_win(win: &CupWin) -> WireMap {
    let mut w = MapWriter::new();
    w.put("name", win.name.as_str())
        .put_opt_i32("year", win.year)
        .put_opt_str("place", win.place.as_deref())
        .put_opt_str("category", win.category.as_deref());
    w.finish()
}

fn encode_range(range: Option<Range>) -> WireMap {
    let mut w = MapWriter::new();
    if let Some(range) = range {
        w.put_opt_f64("min", range.min).put_opt_f64("max", range.max);
    }
    w.finish()
}

fn encode_json_map(map: &BTreeMap<String, Value>) -> WireMap {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}
