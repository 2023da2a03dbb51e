//! # hs-classifier
//!
//! A library for classifying free-text shipment descriptions to tariff
//! classification codes and estimating the import duty owed.
//!
//! Shippers describe goods loosely ("Shipping solar panels from Vietnam to
//! US"), while customs tariffs key on fixed product headings. `hs-classifier`
//! bridges the two by fuzzy-matching the description against a catalog of
//! known products, each carrying an HS code and a duty rate.
//!
//! ## Features
//!
//! - **Gestalt similarity matching**: Longest-common-block scoring that
//!   tolerates extra words around the product name
//! - **Confidence threshold**: Weak matches are reported as "no match" rather
//!   than guessed
//! - **Remote-first classification**: An optional remote service is asked
//!   first, with the local catalog as a fallback on any failure
//! - **Duty estimation**: Duty rate applied to an invoice value
//!
//! ## Example
//!
//! ```rust,no_run
//! use hs_classifier::{estimate, MatchResult, MatchingEngine, ProductCatalog, ReferenceField};
//!
//! // Load the embedded catalog of known products
//! let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
//!
//! // Find the best match
//! let engine = MatchingEngine::new(&catalog);
//! if let MatchResult::Match(m) = engine.find_best_match("Shipping solar panels from Vietnam to US") {
//!     let duty = estimate(&m, 1000.0).unwrap();
//!     println!("{}: {}% -> ${:.2}", m.classification_code, m.duty_percent, duty.estimated_duty);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Product catalog storage and loading
//! - [`core`]: Core data types for entries and match results
//! - [`matching`]: Similarity scoring and the matching engine
//! - [`remote`]: Client for a remote classification service
//! - [`classifier`]: Remote-first classification with local fallback
//! - [`duty`]: Duty estimation
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for browser-based classification

pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod core;
pub mod duty;
pub mod matching;
pub mod remote;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::store::{CatalogSource, LoadError, ProductCatalog};
pub use classifier::Classifier;
pub use crate::core::entry::CatalogEntry;
pub use crate::core::result::{Match, MatchResult};
pub use crate::core::types::*;
pub use duty::{estimate, DutyEstimate, EstimateError};
pub use matching::engine::{find_best_match, MatchingConfig, MatchingEngine};
pub use remote::{RemoteClassifier, RemoteConfig, RemoteUnavailable};
