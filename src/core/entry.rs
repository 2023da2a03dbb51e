use serde::Serialize;

use crate::matching::similarity::normalize;

/// A known product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Short product name, when the source provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,

    /// Tariff description, when the source provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Text compared against queries
    pub reference_text: String,

    /// Classification code (e.g. an HS tariff code)
    pub classification_code: String,

    /// Duty rate in percent
    pub duty_percent: f64,

    // === Pre-computed for fast matching (populated on construction) ===
    /// Lower-cased, trimmed `reference_text`
    #[serde(skip)]
    pub normalized: Vec<char>,
}

impl CatalogEntry {
    pub fn new(
        reference_text: impl Into<String>,
        classification_code: impl Into<String>,
        duty_percent: f64,
    ) -> Self {
        let reference_text = reference_text.into();
        let normalized = normalize(&reference_text);
        Self {
            product: None,
            description: None,
            reference_text,
            classification_code: classification_code.into(),
            duty_percent,
            normalized,
        }
    }

    #[must_use]
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Best human-readable label: description, then product name, then reference text
    pub fn display_description(&self) -> &str {
        self.description
            .as_deref()
            .or(self.product.as_deref())
            .unwrap_or(&self.reference_text)
    }

    /// Display name for listings: product name, falling back to reference text
    pub fn display_name(&self) -> &str {
        self.product.as_deref().unwrap_or(&self.reference_text)
    }
}
