//! Centralized validation helpers for user-supplied values.

/// Maximum accepted description length in bytes (DOS protection)
pub const MAX_DESCRIPTION_LENGTH: usize = 4096;

/// Longest accepted remote timeout
pub const MAX_REMOTE_TIMEOUT_MS: u64 = 30_000;

/// Input validation error types
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Description too long: {0} bytes exceeds {MAX_DESCRIPTION_LENGTH}")]
    DescriptionTooLong(usize),

    #[error("Invalid country code '{0}': expected 2 or 3 ASCII letters")]
    InvalidCountryCode(String),

    #[error("Invalid confidence threshold {0}: expected a value between 0 and 1")]
    InvalidConfidence(f64),

    #[error("Invalid invoice value {0}: expected a finite, non-negative amount")]
    InvalidInvoiceValue(f64),

    #[error("Invalid remote timeout {0} ms: expected 1 to {MAX_REMOTE_TIMEOUT_MS} ms")]
    InvalidTimeout(u64),
}

/// Reject descriptions over [`MAX_DESCRIPTION_LENGTH`].
///
/// # Errors
///
/// Returns `ValidationError::DescriptionTooLong` for oversized input.
pub fn validate_description(description: &str) -> Result<&str, ValidationError> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::DescriptionTooLong(description.len()));
    }
    Ok(description)
}

/// Normalize a country code to upper case.
///
/// # Examples
///
/// ```
/// use hs_classifier::utils::validation::validate_country_code;
///
/// assert_eq!(validate_country_code(" us ").unwrap(), "US");
/// assert!(validate_country_code("U5").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::InvalidCountryCode` unless the trimmed code is 2
/// or 3 ASCII letters.
pub fn validate_country_code(code: &str) -> Result<String, ValidationError> {
    let trimmed = code.trim();
    if !(2..=3).contains(&trimmed.len()) || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidCountryCode(code.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// # Errors
///
/// Returns `ValidationError::InvalidConfidence` unless `value` is within [0, 1].
pub fn validate_min_confidence(value: f64) -> Result<f64, ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidConfidence(value));
    }
    Ok(value)
}

/// # Errors
///
/// Returns `ValidationError::InvalidInvoiceValue` for negative or non-finite amounts.
pub fn validate_invoice_value(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value.is_sign_negative() {
        return Err(ValidationError::InvalidInvoiceValue(value));
    }
    Ok(value)
}

/// # Errors
///
/// Returns `ValidationError::InvalidTimeout` for zero or overly long timeouts.
pub fn validate_timeout_ms(value: u64) -> Result<u64, ValidationError> {
    if value == 0 || value > MAX_REMOTE_TIMEOUT_MS {
        return Err(ValidationError::InvalidTimeout(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_length_limit() {
        assert!(validate_description("solar panels").is_ok());
        let long = "x".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert_eq!(
            validate_description(&long),
            Err(ValidationError::DescriptionTooLong(MAX_DESCRIPTION_LENGTH + 1))
        );
    }

    #[test]
    fn test_country_codes() {
        assert_eq!(validate_country_code("vn").unwrap(), "VN");
        assert_eq!(validate_country_code("USA").unwrap(), "USA");
        assert!(validate_country_code("").is_err());
        assert!(validate_country_code("U").is_err());
        assert!(validate_country_code("UNITED").is_err());
        assert!(validate_country_code("U-S").is_err());
    }

    #[test]
    fn test_numeric_ranges() {
        assert!(validate_min_confidence(0.4).is_ok());
        assert!(validate_min_confidence(0.0).is_ok());
        assert!(validate_min_confidence(1.0).is_ok());
        assert!(validate_min_confidence(1.5).is_err());
        assert!(validate_min_confidence(f64::NAN).is_err());

        assert!(validate_invoice_value(0.0).is_ok());
        assert!(validate_invoice_value(-0.01).is_err());
        assert!(validate_invoice_value(-0.0).is_err());
        assert!(validate_invoice_value(f64::INFINITY).is_err());

        assert!(validate_timeout_ms(5000).is_ok());
        assert!(validate_timeout_ms(0).is_err());
        assert!(validate_timeout_ms(MAX_REMOTE_TIMEOUT_MS + 1).is_err());
    }
}
