//! Product catalog storage and loading.
//!
//! The catalog is an ordered, read-only table of known products, each with a
//! classification code and a duty rate. A default catalog is compiled into
//! the binary, and custom catalogs can be loaded from JSON files.
//!
//! ## Source Format
//!
//! Either a bare array of records or a versioned object:
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "entries": [
//!     {"product": "solar panels", "description": "Photovoltaic cells ...",
//!      "hs_code": "8541.40", "tariff_percent": 5.0}
//!   ]
//! }
//! ```
//!
//! Records with an empty reference text, an empty code, or a negative rate are
//! skipped. A catalog with no surviving records fails to load.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hs_classifier::{ProductCatalog, ReferenceField};
//! use std::path::Path;
//!
//! // Load embedded catalog, matching on product names
//! let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
//!
//! for entry in catalog.entries() {
//!     println!("{} -> {}", entry.reference_text, entry.classification_code);
//! }
//!
//! // Load from custom file, matching on full descriptions
//! let custom =
//!     ProductCatalog::load_from_file(Path::new("my_catalog.json"), ReferenceField::Description)
//!         .unwrap();
//! ```

pub mod record;
pub mod store;
