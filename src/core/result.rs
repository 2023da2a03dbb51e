use serde::{Deserialize, Serialize};

use crate::core::entry::CatalogEntry;
use crate::core::types::{Confidence, MatchSource};

/// A successful classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Text the query was matched against
    pub reference_text: String,

    /// Human-readable description of the classification
    pub description: String,

    /// Classification code (e.g. an HS tariff code)
    pub classification_code: String,

    /// Duty rate in percent
    pub duty_percent: f64,

    /// Similarity in [0, 1]
    pub confidence_score: f64,

    /// Which path produced the match
    pub source: MatchSource,
}

impl Match {
    /// Build a local match from a catalog entry and its score
    #[must_use]
    pub fn from_entry(entry: &CatalogEntry, confidence_score: f64) -> Self {
        Self {
            reference_text: entry.reference_text.clone(),
            description: entry.display_description().to_string(),
            classification_code: entry.classification_code.clone(),
            duty_percent: entry.duty_percent,
            confidence_score,
            source: MatchSource::Local,
        }
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        Confidence::from_score(self.confidence_score)
    }
}

/// Outcome of classifying a description.
///
/// `NoMatch` is a normal outcome (empty query, or nothing scored above the
/// confidence threshold), not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult {
    Match(Match),
    NoMatch,
}

impl MatchResult {
    pub fn as_match(&self) -> Option<&Match> {
        match self {
            Self::Match(m) => Some(m),
            Self::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }
}

impl From<Option<Match>> for MatchResult {
    fn from(value: Option<Match>) -> Self {
        value.map_or(Self::NoMatch, Self::Match)
    }
}
