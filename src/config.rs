//! Cascade stage configuration.
//!
//! ```ascii
//! ┌─────────────────────────────────────────────────────────┐
//! │                     StageConfig                          │
//! ├─────────────────────────────────────────────────────────┤
//! │ enable_semantic: bool    ─────► Attempt remote tiers?   │
//! │ stage1_threshold: f64    ─────► Min BM25 score          │
//! │ stage2_threshold: f64    ─────► Min lite score          │
//! │ final_count: usize       ─────► Shortlist size          │
//! │ max_document_chars       ─────► Payload truncation      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Loaded from defaults, TOML, or `CASCADE_*` environment variables.
//! Metric weights are not configurable; see
//! [`crate::metrics::MetricWeights::FIXED`].

use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};

/// Default minimum lexical score (keep everything).
pub const DEFAULT_STAGE1_THRESHOLD: f64 = 0.0;
/// Default minimum lite-tier semantic score.
pub const DEFAULT_STAGE2_THRESHOLD: f64 = 0.3;
/// Default shortlist size.
pub const DEFAULT_FINAL_COUNT: usize = 25;
/// Default per-document character budget for remote calls.
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 4000;

/// Configuration for one cascade instance.
///
/// # Example
///
/// ```
/// use cascade_rank::StageConfig;
///
/// let config = StageConfig::default()
///     .with_semantic(false)
///     .with_final_count(10);
/// assert_eq!(config.final_count, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Whether Stage 2/3 attempt remote calls at all.
    pub enable_semantic: bool,
    /// Minimum lexical score to survive Stage 1.
    pub stage1_threshold: f64,
    /// Minimum lite-tier score to survive Stage 2.
    pub stage2_threshold: f64,
    /// Maximum shortlist size.
    pub final_count: usize,
    /// Characters of `title + content` sent per document to the remote tiers.
    pub max_document_chars: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            enable_semantic: true,
            stage1_threshold: DEFAULT_STAGE1_THRESHOLD,
            stage2_threshold: DEFAULT_STAGE2_THRESHOLD,
            final_count: DEFAULT_FINAL_COUNT,
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
        }
    }
}

impl StageConfig {
    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| RankError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from defaults overridden by environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `CASCADE_ENABLE_SEMANTIC` | `enable_semantic` |
    /// | `CASCADE_STAGE1_THRESHOLD` | `stage1_threshold` |
    /// | `CASCADE_STAGE2_THRESHOLD` | `stage2_threshold` |
    /// | `CASCADE_FINAL_COUNT` | `final_count` |
    /// | `CASCADE_MAX_DOCUMENT_CHARS` | `max_document_chars` |
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env_var("CASCADE_ENABLE_SEMANTIC") {
            config.enable_semantic = parse_bool("CASCADE_ENABLE_SEMANTIC", &v)?;
        }
        if let Some(v) = env_var("CASCADE_STAGE1_THRESHOLD") {
            config.stage1_threshold = parse_value("CASCADE_STAGE1_THRESHOLD", &v)?;
        }
        if let Some(v) = env_var("CASCADE_STAGE2_THRESHOLD") {
            config.stage2_threshold = parse_value("CASCADE_STAGE2_THRESHOLD", &v)?;
        }
        if let Some(v) = env_var("CASCADE_FINAL_COUNT") {
            config.final_count = parse_value("CASCADE_FINAL_COUNT", &v)?;
        }
        if let Some(v) = env_var("CASCADE_MAX_DOCUMENT_CHARS") {
            config.max_document_chars = parse_value("CASCADE_MAX_DOCUMENT_CHARS", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RankError::ConfigError(e.to_string()))
    }

    /// Check that thresholds are finite and sizes non-zero.
    pub fn validate(&self) -> Result<()> {
        if !self.stage1_threshold.is_finite() {
            return Err(RankError::ConfigError(
                "stage1_threshold must be finite".to_string(),
            ));
        }
        if !self.stage2_threshold.is_finite() {
            return Err(RankError::ConfigError(
                "stage2_threshold must be finite".to_string(),
            ));
        }
        if self.final_count == 0 {
            return Err(RankError::ConfigError(
                "final_count must be at least 1".to_string(),
            ));
        }
        if self.max_document_chars == 0 {
            return Err(RankError::ConfigError(
                "max_document_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Toggle the remote semantic tiers.
    pub fn with_semantic(mut self, enable: bool) -> Self {
        self.enable_semantic = enable;
        self
    }

    /// Set the Stage 1 threshold.
    pub fn with_stage1_threshold(mut self, threshold: f64) -> Self {
        self.stage1_threshold = threshold;
        self
    }

    /// Set the Stage 2 threshold.
    pub fn with_stage2_threshold(mut self, threshold: f64) -> Self {
        self.stage2_threshold = threshold;
        self
    }

    /// Set the shortlist size.
    pub fn with_final_count(mut self, final_count: usize) -> Self {
        self.final_count = final_count;
        self
    }

    /// Set the per-document character budget.
    pub fn with_max_document_chars(mut self, max_chars: usize) -> Self {
        self.max_document_chars = max_chars;
        self
    }
}

pub(crate) fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RankError::ConfigError(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

pub(crate) fn parse_value<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| RankError::ConfigError(format!("{} has invalid value '{}'", name, value)))
}
