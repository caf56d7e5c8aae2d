//! Flat lab and inventory records: concentrations, terpene and cannabinoid
//! profiles, batches, products.

use chrono::NaiveDate;

use crate::model::{ConcentrationUnit, ProductCategory};

/// A concentration measurement with unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Concentration {
    pub value: f64,
    pub unit: ConcentrationUnit,
}

impl Concentration {
    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: ConcentrationUnit::Percent,
        }
    }

    /// Converts to percent by weight (10 mg/g = 1 %, 10 000 ppm = 1 %).
    pub fn to_percent(&self) -> f64 {
        match self.unit {
            ConcentrationUnit::Percent => self.value,
            ConcentrationUnit::MgPerGram => self.value / 10.0,
            ConcentrationUnit::Ppm => self.value / 10_000.0,
        }
    }
}

/// A single terpene measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct TerpeneEntry {
    pub name: String,
    pub value: f64,
    pub unit: ConcentrationUnit,
    pub cdes_id: Option<String>,
    pub cas_number: Option<String>,
    /// Limit of detection.
    pub lod: Option<f64>,
    /// Limit of quantitation.
    pub loq: Option<f64>,
}

impl TerpeneEntry {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            unit: ConcentrationUnit::Percent,
            cdes_id: None,
            cas_number: None,
            lod: None,
            loq: None,
        }
    }
}

/// Terpenes with dedicated fields on [`TerpeneProfile`], in vector order.
pub const FIXED_TERPENE_FIELDS: [&str; 9] = [
    "myrcene",
    "limonene",
    "caryophyllene",
    "pinene",
    "linalool",
    "humulene",
    "terpinolene",
    "ocimene",
    "bisabolol",
];

/// Terpene content of a sample, in percent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerpeneProfile {
    pub myrcene: f64,
    pub limonene: f64,
    pub caryophyllene: f64,
    pub pinene: f64,
    pub linalool: f64,
    pub humulene: f64,
    pub terpinolene: f64,
    pub ocimene: f64,
    pub bisabolol: f64,
    /// Additional or more detailed measurements.
    pub terpenes: Vec<TerpeneEntry>,
    /// Reported total; computed from the fixed fields when absent.
    pub total: Option<f64>,
    /// Reported dominant terpene; computed when absent.
    pub dominant_terpene: Option<String>,
}

impl TerpeneProfile {
    /// The nine fixed terpenes as a vector, for similarity search.
    pub fn to_vector(&self) -> [f64; 9] {
        [
            self.myrcene,
            self.limonene,
            self.caryophyllene,
            self.pinene,
            self.linalool,
            self.humulene,
            self.terpinolene,
            self.ocimene,
            self.bisabolol,
        ]
    }

    /// Sets a fixed terpene by name. Returns false for names without a
    /// dedicated field.
    pub fn set_fixed(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "myrcene" => &mut self.myrcene,
            "limonene" => &mut self.limonene,
            "caryophyllene" => &mut self.caryophyllene,
            "pinene" => &mut self.pinene,
            "linalool" => &mut self.linalool,
            "humulene" => &mut self.humulene,
            "terpinolene" => &mut self.terpinolene,
            "ocimene" => &mut self.ocimene,
            "bisabolol" => &mut self.bisabolol,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Cosine similarity of the fixed-terpene vectors; 0 if either is zero.
    pub fn calculate_similarity(&self, other: &TerpeneProfile) -> f64 {
        let (a, b) = (self.to_vector(), other.to_vector());
        let dot: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
        let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }

    pub fn get_total(&self) -> f64 {
        self.total.unwrap_or_else(|| self.to_vector().iter().sum())
    }

    /// The reported dominant terpene, else the largest fixed terpene.
    /// `None` when nothing was measured.
    pub fn get_dominant(&self) -> Option<String> {
        if let Some(dominant) = &self.dominant_terpene {
            return Some(dominant.clone());
        }
        FIXED_TERPENE_FIELDS
            .iter()
            .zip(self.to_vector())
            .filter(|(_, v)| *v > 0.0)
            // First maximum wins on ties, matching field order.
            .fold(None, |best: Option<(&str, f64)>, (name, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((*name, v)),
            })
            .map(|(name, _)| name.to_string())
    }
}

/// A single cannabinoid measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct CannabinoidEntry {
    pub name: String,
    pub value: f64,
    pub unit: ConcentrationUnit,
    pub cdes_id: Option<String>,
    pub lod: Option<f64>,
    pub loq: Option<f64>,
    pub is_below_loq: bool,
}

impl CannabinoidEntry {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            unit: ConcentrationUnit::Percent,
            cdes_id: None,
            lod: None,
            loq: None,
            is_below_loq: false,
        }
    }
}

/// Cannabinoid content of a sample, in percent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CannabinoidProfile {
    pub thc: f64,
    pub thca: f64,
    pub cbd: f64,
    pub cbda: f64,
    pub cbg: f64,
    pub cbn: f64,
    pub cbc: f64,
    pub thcv: f64,
    pub cannabinoids: Vec<CannabinoidEntry>,
    pub total: Option<f64>,
}

impl CannabinoidProfile {
    pub fn get_total(&self) -> f64 {
        self.total.unwrap_or(
            self.thc + self.thca + self.cbd + self.cbda + self.cbg + self.cbn + self.cbc + self.thcv,
        )
    }
}

/// A harvested batch with its lab results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub id: String,
    pub batch_number: String,
    pub strain_name: Option<String>,
    pub strain_id: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub package_date: Option<NaiveDate>,
    pub thc_percentage: Option<f64>,
    pub cbd_percentage: Option<f64>,
    pub total_cannabinoids: Option<f64>,
    pub total_terpenes: Option<f64>,
    pub terpene_profile: Option<TerpeneProfile>,
    pub cannabinoid_profile: Option<CannabinoidProfile>,
    pub producer: Option<String>,
    pub license_number: Option<String>,
    pub lab_name: Option<String>,
    pub analysis_date: Option<NaiveDate>,
    /// Link to the certificate of analysis.
    pub coa_url: Option<String>,
}

impl Batch {
    pub fn new(id: impl Into<String>, batch_number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            batch_number: batch_number.into(),
            ..Default::default()
        }
    }
}

/// A retail product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: ProductCategory,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub subcategory: Option<String>,
    pub strain_name: Option<String>,
    pub strain_id: Option<String>,
    pub batch_number: Option<String>,
    pub batch_id: Option<String>,
    pub thc_percentage: Option<f64>,
    pub cbd_percentage: Option<f64>,
    pub thc_mg: Option<f64>,
    pub cbd_mg: Option<f64>,
    pub weight_grams: Option<f64>,
    pub servings: Option<u32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub terpene_profile: Option<TerpeneProfile>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: ProductCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            ..Default::default()
        }
    }
}
