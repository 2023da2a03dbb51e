//! Duty estimation from a classification and an invoice value.
//!
//! The estimate keeps full floating-point precision; rounding to currency
//! precision happens only when it is displayed.

use serde::Serialize;
use thiserror::Error;

use crate::core::result::Match;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("Invalid {field} {value}: {reason}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Estimated duty owed on an invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DutyEstimate {
    pub classification_code: String,
    pub duty_percent: f64,
    pub invoice_value: f64,
    pub estimated_duty: f64,
}

impl DutyEstimate {
    /// Estimated duty rounded to cents
    #[must_use]
    pub fn rounded_duty(&self) -> f64 {
        (self.estimated_duty * 100.0).round() / 100.0
    }
}

impl std::fmt::Display for DutyEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "${:.2} ({}% of ${:.2})",
            self.estimated_duty, self.duty_percent, self.invoice_value
        )
    }
}

/// Estimate duty for `invoice_value` at the matched rate
///
/// # Errors
///
/// Returns `EstimateError::InvalidInput` if `invoice_value` or the matched
/// duty rate is negative or not finite.
pub fn estimate(matched: &Match, invoice_value: f64) -> Result<DutyEstimate, EstimateError> {
    check_amount("invoice value", invoice_value)?;
    check_amount("duty rate", matched.duty_percent)?;

    Ok(DutyEstimate {
        classification_code: matched.classification_code.clone(),
        duty_percent: matched.duty_percent,
        invoice_value,
        estimated_duty: matched.duty_percent / 100.0 * invoice_value,
    })
}

// `-0.0 < 0.0` is false, so the sign bit is checked directly.
fn check_amount(field: &'static str, value: f64) -> Result<(), EstimateError> {
    if !value.is_finite() {
        return Err(EstimateError::InvalidInput {
            field,
            value,
            reason: "must be a finite number",
        });
    }
    if value.is_sign_negative() {
        return Err(EstimateError::InvalidInput {
            field,
            value,
            reason: "must not be negative",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::CatalogEntry;

    fn match_with_rate(duty_percent: f64) -> Match {
        Match::from_entry(&CatalogEntry::new("widgets", "0000.00", duty_percent), 1.0)
    }

    #[test]
    fn test_estimate_exact() {
        let estimate = estimate(&match_with_rate(7.5), 1000.0).unwrap();
        assert_eq!(estimate.estimated_duty, 75.0);
        assert_eq!(estimate.classification_code, "0000.00");
        assert_eq!(estimate.invoice_value, 1000.0);
    }

    #[test]
    fn test_estimate_keeps_precision() {
        let estimate = estimate(&match_with_rate(3.3), 10.01).unwrap();
        assert!((estimate.estimated_duty - 0.33033).abs() < 1e-12);
        assert!((estimate.rounded_duty() - 0.33).abs() < 1e-12);
        assert_eq!(estimate.to_string(), "$0.33 (3.3% of $10.01)");
    }

    #[test]
    fn test_zero_invoice_and_zero_rate() {
        assert_eq!(estimate(&match_with_rate(5.0), 0.0).unwrap().estimated_duty, 0.0);
        assert_eq!(estimate(&match_with_rate(0.0), 500.0).unwrap().estimated_duty, 0.0);
    }

    #[test]
    fn test_rejects_invalid_invoice() {
        let m = match_with_rate(5.0);
        assert!(matches!(
            estimate(&m, -1.0),
            Err(EstimateError::InvalidInput { .. })
        ));
        assert!(matches!(
            estimate(&m, f64::NAN),
            Err(EstimateError::InvalidInput { .. })
        ));
        assert!(matches!(
            estimate(&m, f64::INFINITY),
            Err(EstimateError::InvalidInput { .. })
        ));
        assert!(matches!(
            estimate(&m, -0.0),
            Err(EstimateError::InvalidInput { field: "invoice value", .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_rate() {
        for rate in [-10.0, -0.0, f64::NAN, f64::INFINITY] {
            let err = estimate(&match_with_rate(rate), 1000.0).unwrap_err();
            assert!(matches!(
                err,
                EstimateError::InvalidInput { field: "duty rate", .. }
            ));
        }
        assert!(estimate(&match_with_rate(-5.0), 100.0)
            .unwrap_err()
            .to_string()
            .starts_with("Invalid duty rate -5"));
    }
}
