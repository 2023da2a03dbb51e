//! Client for the optional remote classification service.
//!
//! When configured, the remote service is asked first and the local matcher
//! is only consulted if it is unavailable. "Unavailable" covers timeouts,
//! transport failures, non-success statuses, and payloads missing a required
//! field; callers treat them all the same way and never retry.
//!
//! ## Wire Format
//!
//! ```text
//! POST <endpoint>
//! Authorization: Bearer <HS_CLASSIFIER_API_KEY>   (only when set)
//! {"description": "solar panels", "country_code": "US"}
//!
//! 200 OK
//! {"hs_code": "8541.40", "description": "Photovoltaic cells", "tariff_percent": 5.0, "confidence": 0.93}
//! ```
//!
//! `classification_code` and `duty_percent` are accepted in place of
//! `hs_code` and `tariff_percent`. `confidence` is optional.

pub mod client;

pub use client::{RemoteClassifier, RemoteConfig, RemoteUnavailable};
