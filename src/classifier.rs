//! The classification service exposed to presentation layers.
//!
//! [`Classifier`] is the whole surface callers need: [`classify`] turns a
//! description into a [`MatchResult`], and [`estimate_duty`] prices a match
//! against an invoice value. The remote service, when configured, is tried
//! first; the local catalog matcher is the fallback.
//!
//! [`classify`]: Classifier::classify
//! [`estimate_duty`]: Classifier::estimate_duty

use tracing::{debug, warn};

use crate::catalog::store::ProductCatalog;
use crate::core::result::{Match, MatchResult};
use crate::duty::{self, DutyEstimate, EstimateError};
use crate::matching::engine::{MatchingConfig, MatchingEngine};
use crate::remote::RemoteClassifier;

/// Remote-first classifier with a local fuzzy-matching fallback
pub struct Classifier<'a> {
    engine: MatchingEngine<'a>,
    remote: Option<RemoteClassifier>,
}

impl<'a> Classifier<'a> {
    /// Classifier using only the local catalog
    pub fn new(catalog: &'a ProductCatalog, config: MatchingConfig) -> Self {
        Self {
            engine: MatchingEngine::with_config(catalog, config),
            remote: None,
        }
    }

    #[must_use]
    pub fn with_remote(mut self, remote: Option<RemoteClassifier>) -> Self {
        self.remote = remote;
        self
    }

    pub fn engine(&self) -> &MatchingEngine<'a> {
        &self.engine
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Classify a free-text description.
    ///
    /// Empty or whitespace-only descriptions yield `NoMatch` without contacting
    /// the remote service. A remote failure of any kind falls through to the
    /// local matcher.
    pub async fn classify(&self, description: &str) -> MatchResult {
        if description.trim().is_empty() {
            return MatchResult::NoMatch;
        }

        if let Some(remote) = &self.remote {
            match remote.classify(description).await {
                Ok(matched) => return MatchResult::Match(matched),
                Err(e) => warn!("Remote classification unavailable, using local catalog: {e}"),
            }
        }

        let result = self.engine.find_best_match(description);
        if !result.is_match() {
            debug!("No local match for '{description}'");
        }
        result
    }

    /// Estimate duty owed on `invoice_value` for a match
    ///
    /// # Errors
    ///
    /// Returns `EstimateError::InvalidInput` if `invoice_value` or the match's
    /// duty rate is negative or not finite.
    pub fn estimate_duty(
        &self,
        matched: &Match,
        invoice_value: f64,
    ) -> Result<DutyEstimate, EstimateError> {
        duty::estimate(matched, invoice_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MatchSource, ReferenceField};

    fn run<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_local_only_classification() {
        let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
        let classifier = Classifier::new(&catalog, MatchingConfig::default());
        assert!(!classifier.has_remote());

        let result = run(classifier.classify("Shipping solar panels from Vietnam to US"));
        let matched = result.as_match().unwrap();
        assert_eq!(matched.classification_code, "8541.40");
        assert_eq!(matched.source, MatchSource::Local);

        let estimate = classifier.estimate_duty(matched, 1000.0).unwrap();
        assert_eq!(estimate.estimated_duty, 50.0);
        assert_eq!(format!("{:.2}", estimate.estimated_duty), "50.00");
    }

    #[test]
    fn test_unrelated_and_blank_queries() {
        let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
        let classifier = Classifier::new(&catalog, MatchingConfig::default());

        assert_eq!(run(classifier.classify("xyzzy quantum widget")), MatchResult::NoMatch);
        assert_eq!(run(classifier.classify("   ")), MatchResult::NoMatch);
    }

    #[test]
    fn test_estimate_rejects_negative_invoice() {
        let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
        let classifier = Classifier::new(&catalog, MatchingConfig::default());
        let result = run(classifier.classify("bicycles"));
        let matched = result.as_match().unwrap();

        assert!(classifier.estimate_duty(matched, -1.0).is_err());
    }
}
