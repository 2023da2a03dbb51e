//! Startup configuration.
//!
//! Settings come from command-line flags, with the remote endpoint also
//! readable from the environment. The remote credential is only ever read
//! from `HS_CLASSIFIER_API_KEY`.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::store::{CatalogSource, LoadError, ProductCatalog};
use crate::classifier::Classifier;
use crate::core::types::ReferenceField;
use crate::matching::engine::{MatchingConfig, DEFAULT_MIN_CONFIDENCE};
use crate::remote::client::DEFAULT_COUNTRY_CODE;
use crate::remote::{RemoteClassifier, RemoteConfig, RemoteUnavailable};
use crate::utils::validation::{
    validate_country_code, validate_min_confidence, validate_timeout_ms, ValidationError,
};

/// Environment variable holding the remote service credential
pub const API_KEY_ENV: &str = "HS_CLASSIFIER_API_KEY";

/// Environment variable holding the remote service URL
pub const REMOTE_URL_ENV: &str = "HS_CLASSIFIER_REMOTE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Catalog(#[from] LoadError),

    #[error("Failed to set up remote client: {0}")]
    Remote(#[from] RemoteUnavailable),
}

/// Classifier options shared by every command that classifies
#[derive(clap::Args, Debug, Clone)]
pub struct ClassifierArgs {
    /// Path to custom catalog file (defaults to the embedded catalog)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Catalog field to compare descriptions against
    #[arg(long, value_enum, default_value = "product")]
    pub match_on: ReferenceField,

    /// Minimum similarity (0-1) for a local match
    #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    pub min_confidence: f64,

    /// Remote classification endpoint (or set HS_CLASSIFIER_REMOTE_URL)
    #[arg(long)]
    pub remote_url: Option<String>,

    /// Destination country code sent to the remote service
    #[arg(long, default_value = DEFAULT_COUNTRY_CODE)]
    pub country: String,

    /// Remote request timeout in milliseconds
    #[arg(long, default_value = "5000")]
    pub remote_timeout_ms: u64,

    /// Never contact the remote service
    #[arg(long)]
    pub offline: bool,
}

impl Default for ClassifierArgs {
    fn default() -> Self {
        Self {
            catalog: None,
            match_on: ReferenceField::default(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            remote_url: None,
            country: DEFAULT_COUNTRY_CODE.to_string(),
            remote_timeout_ms: 5000,
            offline: false,
        }
    }
}

/// Validated settings for building a [`Classifier`]
#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog: CatalogSource,
    pub reference_field: ReferenceField,
    pub matching: MatchingConfig,
    pub remote: Option<RemoteConfig>,
}

impl Settings {
    /// Resolve settings from flags and the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a flag value is out of range.
    pub fn from_args(args: &ClassifierArgs) -> Result<Self, ConfigError> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve settings from flags and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a flag value is out of range.
    pub fn resolve(
        args: &ClassifierArgs,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let min_confidence = validate_min_confidence(args.min_confidence)?;

        let endpoint = args
            .remote_url
            .clone()
            .or_else(|| env(REMOTE_URL_ENV))
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let remote = match endpoint {
            Some(endpoint) if !args.offline => {
                let timeout = validate_timeout_ms(args.remote_timeout_ms)?;
                let api_key = env(API_KEY_ENV).filter(|key| !key.trim().is_empty());
                Some(
                    RemoteConfig::new(endpoint)
                        .with_country_code(validate_country_code(&args.country)?)
                        .with_timeout(Duration::from_millis(timeout))
                        .with_api_key(api_key),
                )
            }
            _ => None,
        };

        Ok(Self {
            catalog: CatalogSource::from(args.catalog.clone()),
            reference_field: args.match_on,
            matching: MatchingConfig { min_confidence },
            remote,
        })
    }

    /// Load the process-wide catalog and build a classifier over it
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Catalog` if the catalog cannot be loaded, or
    /// `ConfigError::Remote` if the HTTP client cannot be created.
    pub fn build_classifier(&self) -> Result<Classifier<'static>, ConfigError> {
        let catalog = ProductCatalog::load_shared(&self.catalog, self.reference_field)?;
        let remote = self.remote.clone().map(RemoteClassifier::new).transpose()?;
        Ok(Classifier::new(catalog, self.matching.clone()).with_remote(remote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_are_local_only() {
        let settings = Settings::resolve(&ClassifierArgs::default(), no_env).unwrap();
        assert_eq!(settings.catalog, CatalogSource::Embedded);
        assert_eq!(settings.reference_field, ReferenceField::Product);
        assert!((settings.matching.min_confidence - DEFAULT_MIN_CONFIDENCE).abs() < f64::EPSILON);
        assert!(settings.remote.is_none());
    }

    #[test]
    fn test_remote_from_env_with_key() {
        let env = |key: &str| match key {
            REMOTE_URL_ENV => Some("http://classifier.internal/classify".to_string()),
            API_KEY_ENV => Some("secret".to_string()),
            _ => None,
        };
        let args = ClassifierArgs {
            country: "vn".to_string(),
            remote_timeout_ms: 1500,
            ..ClassifierArgs::default()
        };

        let settings = Settings::resolve(&args, env).unwrap();
        let remote = settings.remote.unwrap();
        assert_eq!(remote.endpoint, "http://classifier.internal/classify");
        assert_eq!(remote.country_code, "VN");
        assert_eq!(remote.timeout, Duration::from_millis(1500));
        assert_eq!(remote.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_offline_disables_remote() {
        let args = ClassifierArgs {
            remote_url: Some("http://classifier.internal/classify".to_string()),
            offline: true,
            ..ClassifierArgs::default()
        };
        assert!(Settings::resolve(&args, no_env).unwrap().remote.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let args = ClassifierArgs {
            min_confidence: 1.5,
            ..ClassifierArgs::default()
        };
        assert!(matches!(
            Settings::resolve(&args, no_env),
            Err(ConfigError::Invalid(ValidationError::InvalidConfidence(_)))
        ));

        let args = ClassifierArgs {
            remote_url: Some("http://classifier.internal/classify".to_string()),
            country: "Vietnam".to_string(),
            ..ClassifierArgs::default()
        };
        assert!(matches!(
            Settings::resolve(&args, no_env),
            Err(ConfigError::Invalid(ValidationError::InvalidCountryCode(_)))
        ));
    }
}
