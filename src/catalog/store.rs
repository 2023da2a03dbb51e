use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::record::{validate_entry, CatalogRecord};
use crate::core::entry::CatalogEntry;
use crate::core::types::ReferenceField;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed catalog: {0}")]
    Malformed(String),

    #[error("Catalog contains no valid entries")]
    Empty,
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Where to load the catalog from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// The catalog compiled into the binary
    #[default]
    Embedded,
    /// A JSON file on disk
    File(PathBuf),
}

impl From<Option<PathBuf>> for CatalogSource {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Embedded, Self::File)
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded catalog"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Serializable catalog format used for export
#[derive(Debug, Clone, Serialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub entries: Vec<CatalogRecord>,
}

/// The immutable product catalog with a code index
#[derive(Debug)]
pub struct ProductCatalog {
    /// All entries, in source order
    entries: Vec<CatalogEntry>,

    /// Index: classification code -> first entry carrying it
    code_to_index: HashMap<String, usize>,

    /// Field used as reference text for every entry
    reference_field: ReferenceField,
}

static SHARED: OnceLock<ProductCatalog> = OnceLock::new();

impl ProductCatalog {
    fn empty(reference_field: ReferenceField) -> Self {
        Self {
            entries: Vec::new(),
            code_to_index: HashMap::new(),
            reference_field,
        }
    }

    /// Build a catalog from entries, dropping any that fail validation
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Empty` if no entry is valid.
    pub fn from_entries(
        entries: Vec<CatalogEntry>,
        reference_field: ReferenceField,
    ) -> Result<Self, LoadError> {
        let mut catalog = Self::empty(reference_field);
        for (i, entry) in entries.into_iter().enumerate() {
            match validate_entry(&entry, reference_field) {
                Ok(()) => catalog.push(entry),
                Err(reason) => warn!("Skipping catalog entry {i}: {reason}"),
            }
        }
        if catalog.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(catalog)
    }

    /// Load a catalog from `source`
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` if the source is missing, malformed, or yields no
    /// valid entries.
    pub fn load(source: &CatalogSource, reference_field: ReferenceField) -> Result<Self, LoadError> {
        let catalog = match source {
            CatalogSource::Embedded => Self::load_embedded(reference_field)?,
            CatalogSource::File(path) => Self::load_from_file(path, reference_field)?,
        };
        info!(
            "Loaded {} catalog entries from {source} (matching on {reference_field})",
            catalog.len()
        );
        Ok(catalog)
    }

    /// Load the process-wide catalog once; later calls return the same catalog
    /// regardless of their arguments.
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` if no catalog has been loaded yet and loading
    /// `source` fails.
    pub fn load_shared(
        source: &CatalogSource,
        reference_field: ReferenceField,
    ) -> Result<&'static Self, LoadError> {
        if let Some(catalog) = SHARED.get() {
            return Ok(catalog);
        }
        let catalog = Self::load(source, reference_field)?;
        Ok(SHARED.get_or_init(|| catalog))
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` if the embedded JSON is invalid (checked at build time).
    pub fn load_embedded(reference_field: ReferenceField) -> Result<Self, LoadError> {
        // Embedded at compile time, validated by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/hs_lookup.json");
        Self::from_json(EMBEDDED_CATALOG, reference_field)
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Read` if the file cannot be read, or any error from
    /// [`from_json`](Self::from_json).
    pub fn load_from_file(path: &Path, reference_field: ReferenceField) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, reference_field)
    }

    /// Parse catalog from a JSON string.
    ///
    /// Accepts either a bare array of records or an object with an `entries`
    /// array. Records that fail validation are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Parse` for invalid JSON, `LoadError::Malformed` for
    /// an unexpected top-level shape, and `LoadError::Empty` if no record
    /// survives validation.
    pub fn from_json(json: &str, reference_field: ReferenceField) -> Result<Self, LoadError> {
        let root: Value = serde_json::from_str(json)?;

        let items = match root {
            Value::Array(items) => items,
            Value::Object(mut map) => {
                // Version check (warn but don't fail)
                if let Some(version) = map.get("version").and_then(Value::as_str) {
                    if version != CATALOG_VERSION {
                        warn!(
                            "Catalog version mismatch (expected {CATALOG_VERSION}, found {version})"
                        );
                    }
                }
                match map.remove("entries") {
                    Some(Value::Array(items)) => items,
                    Some(_) => {
                        return Err(LoadError::Malformed("'entries' must be an array".into()))
                    }
                    None => {
                        return Err(LoadError::Malformed(
                            "missing top-level 'entries' array".into(),
                        ))
                    }
                }
            }
            _ => {
                return Err(LoadError::Malformed(
                    "root must be an array of records or an object with 'entries'".into(),
                ))
            }
        };

        let mut catalog = Self::empty(reference_field);
        let mut dropped = 0usize;

        for (i, item) in items.into_iter().enumerate() {
            let entry = serde_json::from_value::<CatalogRecord>(item)
                .map_err(|e| e.to_string())
                .and_then(|record| record.into_entry(reference_field).map_err(|e| e.to_string()));

            match entry {
                Ok(entry) => catalog.push(entry),
                Err(reason) => {
                    dropped += 1;
                    warn!("Skipping catalog record {i}: {reason}");
                }
            }
        }

        if dropped > 0 {
            debug!("Dropped {dropped} invalid catalog records");
        }

        if catalog.is_empty() {
            return Err(LoadError::Empty);
        }

        Ok(catalog)
    }

    fn push(&mut self, entry: CatalogEntry) {
        let index = self.entries.len();
        self.code_to_index
            .entry(entry.classification_code.clone())
            .or_insert(index);
        self.entries.push(entry);
    }

    /// All entries in source order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Get the first entry with the given classification code
    pub fn get_by_code(&self, code: &str) -> Option<&CatalogEntry> {
        self.code_to_index
            .get(code.trim())
            .map(|&idx| &self.entries[idx])
    }

    pub fn reference_field(&self) -> ReferenceField {
        self.reference_field
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Parse` if serialization fails.
    pub fn to_json(&self) -> Result<String, LoadError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            entries: self.entries.iter().map(CatalogRecord::from).collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of entries in catalog
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.entries()[0].reference_text, "solar panels");
    }

    #[test]
    fn test_load_embedded_on_description() {
        let catalog = ProductCatalog::load_embedded(ReferenceField::Description).unwrap();
        let solar = catalog.get_by_code("8541.40").unwrap();
        assert!(solar.reference_text.starts_with("Photovoltaic"));
        assert_eq!(solar.product.as_deref(), Some("solar panels"));
    }

    #[test]
    fn test_get_by_code() {
        let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
        let bikes = catalog.get_by_code(" 8712.00 ").unwrap();
        assert_eq!(bikes.reference_text, "bicycles");
        assert!(catalog.get_by_code("0000.00").is_none());
    }

    #[test]
    fn test_bare_array_and_invalid_records_dropped() {
        let json = r#"[
            {"product": "solar panels", "hs_code": "8541.40", "tariff_percent": 5.0},
            {"product": "", "hs_code": "0000.00", "tariff_percent": 1.0},
            {"product": "mystery", "hs_code": "1111.11", "tariff_percent": -3.0},
            {"product": "typo", "hs_code": "2222.22", "tariff_percent": "five"},
            {"product": "bicycles", "hs_code": "8712.00", "tariff_percent": 11.0}
        ]"#;
        let catalog = ProductCatalog::from_json(json, ReferenceField::Product).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].reference_text, "solar panels");
        assert_eq!(catalog.entries()[1].reference_text, "bicycles");
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            ProductCatalog::from_json("{not json", ReferenceField::Product),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            ProductCatalog::from_json("42", ReferenceField::Product),
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(
            ProductCatalog::from_json(r#"{"version": "1.0.0"}"#, ReferenceField::Product),
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(
            ProductCatalog::from_json("[]", ReferenceField::Product),
            Err(LoadError::Empty)
        ));
        assert!(matches!(
            ProductCatalog::from_json(
                r#"[{"product": "x", "hs_code": "", "tariff_percent": 1.0}]"#,
                ReferenceField::Product
            ),
            Err(LoadError::Empty)
        ));
        assert!(matches!(
            ProductCatalog::load_from_file(
                Path::new("/nonexistent/hs_lookup.json"),
                ReferenceField::Product
            ),
            Err(LoadError::Read { .. })
        ));
    }

    #[test]
    fn test_from_entries_rejects_empty() {
        assert!(matches!(
            ProductCatalog::from_entries(Vec::new(), ReferenceField::Product),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn test_from_entries_drops_invalid_entries() {
        let catalog = ProductCatalog::from_entries(
            vec![
                CatalogEntry::new("", "", -10.0),
                CatalogEntry::new("widgets", "0000.00", f64::NAN),
                CatalogEntry::new("gadgets", "0000.01", -0.0),
                CatalogEntry::new("sprockets", "  ", 2.0),
                CatalogEntry::new("bicycles", "8712.00", 11.0),
            ],
            ReferenceField::Product,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].classification_code, "8712.00");
        assert!(catalog.get_by_code("0000.00").is_none());

        assert!(matches!(
            ProductCatalog::from_entries(
                vec![CatalogEntry::new("widgets", "0000.00", f64::INFINITY)],
                ReferenceField::Product,
            ),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn test_catalog_to_json_round_trips() {
        let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
        let json = catalog.to_json().unwrap();

        assert!(json.contains("\"version\""));
        assert!(json.contains("\"entries\""));
        assert!(json.contains("8541.40"));

        let reloaded = ProductCatalog::from_json(&json, ReferenceField::Product).unwrap();
        assert_eq!(reloaded.entries(), catalog.entries());
    }

    #[test]
    fn test_load_shared_returns_same_catalog() {
        let first = ProductCatalog::load_shared(&CatalogSource::Embedded, ReferenceField::Product)
            .unwrap();
        let second = ProductCatalog::load_shared(&CatalogSource::Embedded, ReferenceField::Product)
            .unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
