use tracing::debug;

use crate::catalog::store::ProductCatalog;
use crate::core::entry::CatalogEntry;
use crate::core::result::{Match, MatchResult};
use crate::matching::similarity::QueryMatcher;

/// Default minimum similarity for a match
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.4;

/// Configuration for the matching engine
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Scores below this are treated as no match (inclusive lower bound)
    pub min_confidence: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// A catalog entry together with its similarity to a query
#[derive(Debug, Clone)]
pub struct ScoredEntry<'a> {
    /// Position in the catalog
    pub index: usize,
    pub entry: &'a CatalogEntry,
    pub score: f64,
}

impl ScoredEntry<'_> {
    #[must_use]
    pub fn to_match(&self) -> Match {
        Match::from_entry(self.entry, self.score)
    }
}

/// Select the catalog entry most similar to `query`.
///
/// The highest score wins; among equal scores the entry earliest in the
/// catalog wins. If the winning score is below `min_confidence`, or the query
/// is empty after trimming, the result is `NoMatch`.
#[must_use]
pub fn find_best_match(query: &str, catalog: &ProductCatalog, min_confidence: f64) -> MatchResult {
    let matcher = QueryMatcher::new(query);
    if matcher.is_empty() {
        debug!("Empty query, nothing to match");
        return MatchResult::NoMatch;
    }

    let mut best: Option<(usize, f64)> = None;

    for (index, entry) in catalog.entries().iter().enumerate() {
        let qualifies =
            |score: f64| score >= min_confidence && best.map_or(true, |(_, top)| score > top);

        // Cheap upper bounds first; a later entry must strictly beat the current best
        if !qualifies(matcher.real_quick_ratio(&entry.normalized))
            || !qualifies(matcher.quick_ratio(&entry.normalized))
        {
            continue;
        }

        let score = matcher.ratio(&entry.normalized);
        if qualifies(score) {
            best = Some((index, score));
        }
    }

    match best {
        Some((index, score)) => {
            let entry = &catalog.entries()[index];
            debug!(
                "Matched '{}' -> {} (score {score:.3})",
                entry.reference_text, entry.classification_code
            );
            MatchResult::Match(Match::from_entry(entry, score))
        }
        None => {
            debug!("No catalog entry reached confidence {min_confidence:.2}");
            MatchResult::NoMatch
        }
    }
}

/// The main matching engine
pub struct MatchingEngine<'a> {
    catalog: &'a ProductCatalog,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(catalog: &'a ProductCatalog) -> Self {
        Self {
            catalog,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(catalog: &'a ProductCatalog, config: MatchingConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a ProductCatalog {
        self.catalog
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Find the single best match above the configured threshold
    #[must_use]
    pub fn find_best_match(&self, query: &str) -> MatchResult {
        find_best_match(query, self.catalog, self.config.min_confidence)
    }

    /// Rank all entries at or above the threshold, best first.
    ///
    /// Equal scores keep catalog order, so the first element always agrees
    /// with [`find_best_match`](Self::find_best_match).
    #[must_use]
    pub fn find_matches(&self, query: &str, limit: usize) -> Vec<ScoredEntry<'a>> {
        let matcher = QueryMatcher::new(query);
        if matcher.is_empty() || limit == 0 {
            return Vec::new();
        }

        let min = self.config.min_confidence;
        let mut results: Vec<ScoredEntry<'a>> = self
            .catalog
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                matcher.real_quick_ratio(&entry.normalized) >= min
                    && matcher.quick_ratio(&entry.normalized) >= min
            })
            .map(|(index, entry)| ScoredEntry {
                index,
                entry,
                score: matcher.ratio(&entry.normalized),
            })
            .filter(|scored| scored.score >= min)
            .collect();

        // Stable sort: ties stay in catalog order
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
        results
    }
}
