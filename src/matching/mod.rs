//! Fuzzy matching of free-text descriptions against the catalog.
//!
//! This module provides the local matching path:
//!
//! - [`MatchingEngine`]: Main entry point for finding the best catalog entry
//! - [`find_best_match`]: The same selection as a free function
//! - [`QueryMatcher`]: Gestalt similarity between a query and reference texts
//!
//! ## Matching Algorithm
//!
//! 1. **Normalization**: query and reference texts are trimmed and lower-cased
//! 2. **Pruning**: length and character-count upper bounds skip entries that
//!    cannot reach the threshold or beat the current best
//! 3. **Scoring**: `2 * M / T` over recursively found longest common blocks
//! 4. **Selection**: highest score wins, earliest catalog entry on ties
//! 5. **Threshold**: a best score below `min_confidence` is reported as no match
//!
//! ## Example
//!
//! ```rust,no_run
//! use hs_classifier::{MatchResult, MatchingEngine, ProductCatalog, ReferenceField};
//!
//! let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
//! let engine = MatchingEngine::new(&catalog);
//!
//! match engine.find_best_match("Shipping solar panels from Vietnam to US") {
//!     MatchResult::Match(m) => println!("{} ({:.1}%)", m.classification_code, m.confidence_score * 100.0),
//!     MatchResult::NoMatch => println!("No matching HS code found"),
//! }
//! ```
//!
//! [`MatchingEngine`]: engine::MatchingEngine
//! [`find_best_match`]: engine::find_best_match
//! [`QueryMatcher`]: similarity::QueryMatcher

pub mod engine;
pub mod similarity;
