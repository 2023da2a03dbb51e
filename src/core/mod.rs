//! Core data types for product classification.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`CatalogEntry`]: A known product with its classification code and duty rate
//! - [`Match`], [`MatchResult`]: The outcome of classifying a description
//! - [`ReferenceField`], [`MatchSource`], [`Confidence`]: Matching metadata types
//!
//! ## Reference Text
//!
//! Catalog sources carry both a short product name and a longer tariff
//! description. Only one of them is compared against queries:
//!
//! | Field       | Example                                                  |
//! |-------------|----------------------------------------------------------|
//! | product     | solar panels                                             |
//! | description | Photovoltaic cells assembled in modules or made up into panels |
//!
//! The choice is made once per catalog load via [`ReferenceField`].
//!
//! [`CatalogEntry`]: entry::CatalogEntry
//! [`Match`]: result::Match
//! [`MatchResult`]: result::MatchResult
//! [`ReferenceField`]: types::ReferenceField
//! [`MatchSource`]: types::MatchSource
//! [`Confidence`]: types::Confidence

pub mod entry;
pub mod result;
pub mod types;
