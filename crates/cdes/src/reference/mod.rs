//! Reference data: the CDES terpene library.
//!
//! The library is a JSON document (`terpene-library.json`) published with
//! the standard. [`ReferenceCache`] loads it once on first use, indexes it
//! by id and CAS number, and keeps it until [`ReferenceCache::clear_cache`].

use std::fs;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::ReferenceConfig;
use crate::error::ReferenceError;

/// File name of the terpene library inside the data directory.
pub const TERPENE_LIBRARY_FILE: &str = "terpene-library.json";

/// A documented effect of a terpene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerpeneEffect {
    pub effect: String,
    pub strength: String,
    pub evidence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoilingPoint {
    pub celsius: f64,
    pub fahrenheit: f64,
}

/// A reference terpene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terpene {
    pub id: String,
    pub name: String,
    pub cas_number: String,
    pub pubchem_id: u64,
    pub molecular_formula: String,
    pub category: String,
    #[serde(default)]
    pub aroma: Vec<String>,
    #[serde(default)]
    pub effects: Vec<TerpeneEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boiling_point: Option<BoilingPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The full terpene library document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerpeneLibrary {
    pub version: String,
    pub last_updated: String,
    pub license: String,
    #[serde(default)]
    pub terpenes: Vec<Terpene>,
}

/// A loaded library with lookup indexes.
#[derive(Debug, Clone)]
struct IndexedLibrary {
    library: TerpeneLibrary,
    by_id: FxHashMap<String, usize>,
    by_cas: FxHashMap<String, usize>,
}

impl IndexedLibrary {
    fn new(library: TerpeneLibrary) -> Self {
        let mut by_id = FxHashMap::default();
        let mut by_cas = FxHashMap::default();
        for (i, terpene) in library.terpenes.iter().enumerate() {
            // First entry wins on duplicate keys.
            by_id.entry(terpene.id.clone()).or_insert(i);
            by_cas.entry(terpene.cas_number.clone()).or_insert(i);
        }
        Self {
            library,
            by_id,
            by_cas,
        }
    }
}

/// Lazily loaded, application-owned reference data.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCache {
    config: ReferenceConfig,
    terpenes: Option<IndexedLibrary>,
}

impl ReferenceCache {
    /// Creates an empty cache reading from the configured data directory.
    pub fn new(config: ReferenceConfig) -> Self {
        Self {
            config,
            terpenes: None,
        }
    }

    /// Creates a cache configured from the environment.
    pub fn from_env() -> Self {
        Self::new(ReferenceConfig::from_env())
    }

    /// Creates a cache preloaded from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ReferenceError> {
        let mut cache = Self::default();
        cache.load_terpene_library_str(json)?;
        Ok(cache)
    }

    /// Replaces the cached library with one parsed from `json`.
    pub fn load_terpene_library_str(&mut self, json: &str) -> Result<&TerpeneLibrary, ReferenceError> {
        let library: TerpeneLibrary = serde_json::from_str(json)?;
        tracing::debug!(
            version = %library.version,
            terpenes = library.terpenes.len(),
            "loaded terpene library"
        );
        Ok(&self.terpenes.insert(IndexedLibrary::new(library)).library)
    }

    /// Returns the terpene library, loading it from disk on first use.
    pub fn terpene_library(&mut self) -> Result<&TerpeneLibrary, ReferenceError> {
        if self.terpenes.is_none() {
            let path = self.library_path()?;
            tracing::debug!(path = %path.display(), "reading terpene library");
            let json = fs::read_to_string(&path).map_err(|source| ReferenceError::Io {
                path: path.clone(),
                source,
            })?;
            return self.load_terpene_library_str(&json);
        }
        match &self.terpenes {
            Some(indexed) => Ok(&indexed.library),
            None => Err(ReferenceError::NoDataDir),
        }
    }

    /// Looks up a terpene by CDES id (e.g. `terp-myrcene`).
    pub fn get_terpene_by_id(&mut self, id: &str) -> Result<Option<&Terpene>, ReferenceError> {
        self.terpene_library()?;
        Ok(self.lookup(|indexed| indexed.by_id.get(id).copied()))
    }

    /// Looks up a terpene by CAS registry number (e.g. `123-35-3`).
    pub fn get_terpene_by_cas(&mut self, cas: &str) -> Result<Option<&Terpene>, ReferenceError> {
        self.terpene_library()?;
        Ok(self.lookup(|indexed| indexed.by_cas.get(cas.trim()).copied()))
    }

    /// Returns true if the library has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.terpenes.is_some()
    }

    /// Drops all cached reference data; the next lookup reloads it.
    pub fn clear_cache(&mut self) {
        if self.terpenes.take().is_some() {
            tracing::debug!("cleared reference cache");
        }
    }

    fn lookup(&self, find: impl Fn(&IndexedLibrary) -> Option<usize>) -> Option<&Terpene> {
        let indexed = self.terpenes.as_ref()?;
        find(indexed).and_then(|i| indexed.library.terpenes.get(i))
    }

    fn library_path(&self) -> Result<PathBuf, ReferenceError> {
        self.config
            .data_dir
            .as_ref()
            .map(|dir| dir.join(TERPENE_LIBRARY_FILE))
            .ok_or(ReferenceError::NoDataDir)
    }
}
