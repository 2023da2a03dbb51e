use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::entry::CatalogEntry;
use crate::core::types::ReferenceField;

/// Why a catalog record was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("missing or empty '{0}' field")]
    MissingReferenceText(ReferenceField),

    #[error("missing or empty classification code")]
    MissingCode,

    #[error("missing duty rate")]
    MissingRate,

    #[error("duty rate must be a finite, non-negative percentage (got {0})")]
    InvalidRate(f64),
}

/// A catalog record as it appears in the source file.
///
/// Field names follow the `hs_lookup.json` layout (`product`, `description`,
/// `hs_code`, `tariff_percent`); common alternatives are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "name")]
    pub product: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, alias = "classification_code", alias = "code")]
    pub hs_code: Option<String>,

    #[serde(default, alias = "duty_percent", alias = "duty")]
    pub tariff_percent: Option<f64>,
}

/// Trimmed, non-empty text or `None`
fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn check_rate(rate: f64) -> Result<f64, RecordError> {
    if !rate.is_finite() || rate.is_sign_negative() {
        return Err(RecordError::InvalidRate(rate));
    }
    Ok(rate)
}

/// Check an already-built entry against the same rules as a parsed record
///
/// # Errors
///
/// Returns a `RecordError` for empty reference text or code, or a rate that
/// is negative or not finite.
pub fn validate_entry(entry: &CatalogEntry, field: ReferenceField) -> Result<(), RecordError> {
    if entry.reference_text.trim().is_empty() {
        return Err(RecordError::MissingReferenceText(field));
    }
    if entry.classification_code.trim().is_empty() {
        return Err(RecordError::MissingCode);
    }
    check_rate(entry.duty_percent)?;
    Ok(())
}

impl CatalogRecord {
    /// Validate the record and turn it into a matchable entry
    ///
    /// # Errors
    ///
    /// Returns a `RecordError` naming the first field that fails validation.
    pub fn into_entry(self, field: ReferenceField) -> Result<CatalogEntry, RecordError> {
        let product = non_empty(self.product.as_ref());
        let description = non_empty(self.description.as_ref());

        let reference_text = match field {
            ReferenceField::Product => product.clone(),
            ReferenceField::Description => description.clone(),
        }
        .ok_or(RecordError::MissingReferenceText(field))?;

        let code = non_empty(self.hs_code.as_ref()).ok_or(RecordError::MissingCode)?;

        let rate = check_rate(self.tariff_percent.ok_or(RecordError::MissingRate)?)?;

        let mut entry = CatalogEntry::new(reference_text, code, rate);
        entry.product = product;
        entry.description = description;
        Ok(entry)
    }
}

impl From<&CatalogEntry> for CatalogRecord {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            product: entry
                .product
                .clone()
                .or_else(|| Some(entry.reference_text.clone())),
            description: entry.description.clone(),
            hs_code: Some(entry.classification_code.clone()),
            tariff_percent: Some(entry.duty_percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(product: &str, code: &str, rate: f64) -> CatalogRecord {
        CatalogRecord {
            product: Some(product.to_string()),
            description: Some(format!("{product} (tariff text)")),
            hs_code: Some(code.to_string()),
            tariff_percent: Some(rate),
        }
    }

    #[test]
    fn test_into_entry_product_field() {
        let entry = record("solar panels", "8541.40", 5.0)
            .into_entry(ReferenceField::Product)
            .unwrap();
        assert_eq!(entry.reference_text, "solar panels");
        assert_eq!(entry.classification_code, "8541.40");
        assert_eq!(entry.description.as_deref(), Some("solar panels (tariff text)"));
    }

    #[test]
    fn test_into_entry_description_field() {
        let entry = record("solar panels", "8541.40", 5.0)
            .into_entry(ReferenceField::Description)
            .unwrap();
        assert_eq!(entry.reference_text, "solar panels (tariff text)");
        assert_eq!(entry.product.as_deref(), Some("solar panels"));
    }

    #[test]
    fn test_rejects_invalid_records() {
        let mut blank = record("   ", "8541.40", 5.0);
        blank.description = None;
        assert_eq!(
            blank.into_entry(ReferenceField::Product),
            Err(RecordError::MissingReferenceText(ReferenceField::Product))
        );

        assert_eq!(
            record("solar panels", "", 5.0).into_entry(ReferenceField::Product),
            Err(RecordError::MissingCode)
        );

        assert_eq!(
            record("solar panels", "8541.40", -1.0).into_entry(ReferenceField::Product),
            Err(RecordError::InvalidRate(-1.0))
        );

        let mut no_rate = record("solar panels", "8541.40", 0.0);
        no_rate.tariff_percent = None;
        assert_eq!(
            no_rate.into_entry(ReferenceField::Product),
            Err(RecordError::MissingRate)
        );
    }

    #[test]
    fn test_aliases() {
        let json = r#"{"name": "bicycles", "classification_code": "8712.00", "duty_percent": 11.0}"#;
        let parsed: CatalogRecord = serde_json::from_str(json).unwrap();
        let entry = parsed.into_entry(ReferenceField::Product).unwrap();
        assert_eq!(entry.reference_text, "bicycles");
        assert_eq!(entry.classification_code, "8712.00");
        assert!((entry.duty_percent - 11.0).abs() < f64::EPSILON);
    }
}
