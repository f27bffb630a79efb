//! Semantic reranker service configuration.
//!
//! ```ascii
//! ┌─────────────────────────────────────────────────────────┐
//! │                    SemanticConfig                        │
//! ├─────────────────────────────────────────────────────────┤
//! │ base_url: String      ─────► API endpoint               │
//! │ api_key: Option       ─────► Authentication             │
//! │ lite_model: String    ─────► Stage 2 model              │
//! │ full_model: String    ─────► Stage 3 model              │
//! │ timeout: Duration     ─────► Request timeout            │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::time::Duration;

use super::result::RerankTier;
use crate::config::{env_var, parse_value};
use crate::error::{RankError, Result};

const JINA_URL: &str = "https://api.jina.ai/v1/rerank";
const COHERE_URL: &str = "https://api.cohere.com/v2/rerank";

/// Configuration for the remote semantic reranker.
///
/// Use the factory methods for common providers:
/// - [`SemanticConfig::jina`] - Jina AI Reranker
/// - [`SemanticConfig::cohere`] - Cohere Rerank
///
/// # Example
///
/// ```
/// use cascade_rank::semantic::SemanticConfig;
///
/// let config = SemanticConfig::cohere("your-api-key")
///     .with_lite_model("rerank-english-v3.0");
/// assert!(config.base_url.contains("cohere.com"));
/// ```
#[derive(Clone)]
pub struct SemanticConfig {
    /// Base URL for the rerank API.
    pub base_url: String,
    /// API key for authentication.
    pub api_key: Option<String>,
    /// Model for the lite tier.
    pub lite_model: String,
    /// Model for the full tier.
    pub full_model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            base_url: JINA_URL.to_string(),
            api_key: None,
            lite_model: "jina-reranker-v1-tiny-en".to_string(),
            full_model: "jina-reranker-v2-base-multilingual".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl SemanticConfig {
    /// Jina AI: tiny English model for lite, multilingual v2 for full.
    pub fn jina(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Cohere: English v3.0 for lite, rerank-v3.5 for full.
    pub fn cohere(api_key: impl Into<String>) -> Self {
        Self {
            base_url: COHERE_URL.to_string(),
            api_key: Some(api_key.into()),
            lite_model: "rerank-english-v3.0".to_string(),
            full_model: "rerank-v3.5".to_string(),
            ..Default::default()
        }
    }

    /// Build from environment variables.
    ///
    /// Returns `Ok(None)` when `CASCADE_RERANK_API_KEY` is unset, which means
    /// the capability is absent. An unknown provider or an unparsable
    /// timeout is a [`RankError::ConfigError`].
    ///
    /// | Variable | Effect |
    /// |----------|--------|
    /// | `CASCADE_RERANK_API_KEY` | Required |
    /// | `CASCADE_RERANK_PROVIDER` | `jina` (default) or `cohere` preset |
    /// | `CASCADE_RERANK_BASE_URL` | Override endpoint |
    /// | `CASCADE_RERANK_LITE_MODEL` | Override lite model |
    /// | `CASCADE_RERANK_FULL_MODEL` | Override full model |
    /// | `CASCADE_RERANK_TIMEOUT_SECS` | Override timeout |
    pub fn from_env() -> Result<Option<Self>> {
        let Some(api_key) = env_var("CASCADE_RERANK_API_KEY") else {
            return Ok(None);
        };

        let mut config = match env_var("CASCADE_RERANK_PROVIDER")
            .map(|p| p.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("jina") => Self::jina(api_key),
            Some("cohere") => Self::cohere(api_key),
            Some(other) => {
                return Err(RankError::ConfigError(format!(
                    "CASCADE_RERANK_PROVIDER must be 'jina' or 'cohere', got '{}'",
                    other
                )))
            }
        };

        if let Some(url) = env_var("CASCADE_RERANK_BASE_URL") {
            config.base_url = url;
        }
        if let Some(model) = env_var("CASCADE_RERANK_LITE_MODEL") {
            config.lite_model = model;
        }
        if let Some(model) = env_var("CASCADE_RERANK_FULL_MODEL") {
            config.full_model = model;
        }
        if let Some(v) = env_var("CASCADE_RERANK_TIMEOUT_SECS") {
            let secs: u64 = parse_value("CASCADE_RERANK_TIMEOUT_SECS", &v)?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(Some(config))
    }

    /// Model name for a tier.
    pub fn model(&self, tier: RerankTier) -> &str {
        match tier {
            RerankTier::Lite => &self.lite_model,
            RerankTier::Full => &self.full_model,
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the lite-tier model.
    pub fn with_lite_model(mut self, model: impl Into<String>) -> Self {
        self.lite_model = model.into();
        self
    }

    /// Set the full-tier model.
    pub fn with_full_model(mut self, model: impl Into<String>) -> Self {
        self.full_model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for SemanticConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("lite_model", &self.lite_model)
            .field("full_model", &self.full_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
