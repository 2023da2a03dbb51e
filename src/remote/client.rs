use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::core::result::Match;
use crate::core::types::MatchSource;

/// Default bound on a single remote classification attempt
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default destination country
pub const DEFAULT_COUNTRY_CODE: &str = "US";

/// Why the remote service could not produce a match
#[derive(Error, Debug)]
pub enum RemoteUnavailable {
    #[error("remote classification timed out after {0:?}")]
    Timeout(Duration),

    #[error("remote transport error: {0}")]
    Transport(String),

    #[error("remote service returned HTTP {0}")]
    Status(u16),

    #[error("malformed remote response: {0}")]
    Malformed(String),
}

/// Remote service settings
#[derive(Clone)]
pub struct RemoteConfig {
    /// Full URL of the classify endpoint
    pub endpoint: String,

    /// Destination country sent with every request
    pub country_code: String,

    /// Bound on the whole request/response exchange
    pub timeout: Duration,

    /// Bearer credential, injected from the environment
    pub api_key: Option<String>,
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

// Keep the credential out of logs
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("endpoint", &self.endpoint)
            .field("country_code", &self.country_code)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    description: &'a str,
    country_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    #[serde(default, alias = "classification_code")]
    hs_code: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default, alias = "duty_percent")]
    tariff_percent: Option<f64>,

    #[serde(default)]
    confidence: Option<f64>,
}

impl ClassifyResponse {
    fn into_match(self) -> Result<Match, RemoteUnavailable> {
        let code = self
            .hs_code
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RemoteUnavailable::Malformed("missing classification code".into()))?;

        let description = self
            .description
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RemoteUnavailable::Malformed("missing description".into()))?;

        let duty_percent = self
            .tariff_percent
            .filter(|r| r.is_finite() && !r.is_sign_negative())
            .ok_or_else(|| RemoteUnavailable::Malformed("missing or invalid duty rate".into()))?;

        let confidence_score = self
            .confidence
            .filter(|c| c.is_finite())
            .map_or(1.0, |c| c.clamp(0.0, 1.0));

        Ok(Match {
            reference_text: description.clone(),
            description,
            classification_code: code,
            duty_percent,
            confidence_score,
            source: MatchSource::Remote,
        })
    }
}

/// HTTP client for the remote classification service
#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteClassifier {
    /// Build a client for `config`
    ///
    /// # Errors
    ///
    /// Returns `RemoteUnavailable::Transport` if the HTTP client cannot be built.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteUnavailable> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteUnavailable::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Classify `description` with a single bounded attempt
    ///
    /// # Errors
    ///
    /// Returns a `RemoteUnavailable` describing why no match was obtained.
    pub async fn classify(&self, description: &str) -> Result<Match, RemoteUnavailable> {
        match tokio::time::timeout(self.config.timeout, self.request(description)).await {
            Ok(result) => result,
            Err(_) => Err(RemoteUnavailable::Timeout(self.config.timeout)),
        }
    }

    async fn request(&self, description: &str) -> Result<Match, RemoteUnavailable> {
        let body = ClassifyRequest {
            description,
            country_code: &self.config.country_code,
        };

        let mut request = self.http.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteUnavailable::Timeout(self.config.timeout)
            } else {
                RemoteUnavailable::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteUnavailable::Status(status.as_u16()));
        }

        let payload: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| RemoteUnavailable::Malformed(e.to_string()))?;

        let matched = payload.into_match()?;
        debug!(
            "Remote classified as {} ({}%)",
            matched.classification_code, matched.duty_percent
        );
        Ok(matched)
    }
}
