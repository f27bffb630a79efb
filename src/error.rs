//! Reranking error types.
//!
//! # Error Classes
//!
//! | Class | Variants | Handling |
//! |-------|----------|----------|
//! | External dependency | `ApiError`, `RateLimited`, `AuthError`, `NetworkError`, `Timeout`, `SerializationError`, `InvalidResponse` | Logged, stage falls back |
//! | Missing capability | `Unavailable` | Silent fallback |
//! | Configuration | `ConfigError` | Returned from constructors / loaders |
//! | Invariant violation | `RerankingFailed` (wrapping `IndexOutOfRange` or `NegativeIndex`) | Raised to the caller |
//!
//! Degenerate input (empty candidate list, empty query) is not an error at
//! all: every stage returns a well-typed empty or pass-through result.

use thiserror::Error;

/// Result type for reranking operations.
pub type Result<T> = std::result::Result<T, RankError>;

/// Errors that can occur while reranking.
#[derive(Debug, Error)]
pub enum RankError {
    /// Non-success response from the semantic reranking service.
    #[error("API error: {0}")]
    ApiError(String),

    /// Quota or rate limit exhausted.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Authentication rejected by the service.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Transport-level failure.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Response body was not valid JSON.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Response was JSON but not the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The semantic capability is absent.
    #[error("Semantic reranker unavailable: {0}")]
    Unavailable(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A response referenced a document outside the request.
    #[error("Index {index} out of range for {len} documents")]
    IndexOutOfRange { index: usize, len: usize },

    /// A response carried a negative document index.
    #[error("Negative index {0} in rerank result")]
    NegativeIndex(i64),

    /// Internal invariant violated; the only error surfaced by the engine.
    #[error("Reranking failed in {stage}: {source}")]
    RerankingFailed {
        stage: &'static str,
        #[source]
        source: Box<RankError>,
    },
}

impl From<reqwest::Error> for RankError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RankError::Timeout
        } else if err.is_connect() {
            RankError::NetworkError(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            RankError::InvalidResponse(err.to_string())
        } else {
            RankError::NetworkError(err.to_string())
        }
    }
}

impl RankError {
    /// Wrap a root cause as the typed "reranking failed" error.
    pub fn reranking_failed(stage: &'static str, source: RankError) -> Self {
        Self::RerankingFailed {
            stage,
            source: Box::new(source),
        }
    }

    /// Whether a stage may swallow this error and fall back to the best
    /// ordering it already has.
    ///
    /// # Example
    ///
    /// ```
    /// use cascade_rank::RankError;
    ///
    /// assert!(RankError::Timeout.is_degradable());
    /// assert!(!RankError::IndexOutOfRange { index: 9, len: 3 }.is_degradable());
    /// ```
    pub fn is_degradable(&self) -> bool {
        match self {
            Self::ApiError(_)
            | Self::RateLimited(_)
            | Self::AuthError(_)
            | Self::NetworkError(_)
            | Self::Timeout
            | Self::SerializationError(_)
            | Self::InvalidResponse(_)
            | Self::Unavailable(_) => true,
            Self::ConfigError(_)
            | Self::IndexOutOfRange { .. }
            | Self::NegativeIndex(_)
            | Self::RerankingFailed { .. } => false,
        }
    }

    /// Get a user-friendly description of the error with suggested action.
    pub fn user_description(&self) -> String {
        match self {
            Self::NetworkError(_) => {
                "Unable to reach the reranking service. Check your network connection.".to_string()
            }
            Self::Timeout => "Reranking request timed out. Lexical ranking was used.".to_string(),
            Self::RateLimited(_) => {
                "Reranking quota exhausted. Lexical ranking was used.".to_string()
            }
            Self::AuthError(_) => {
                "Reranking service rejected the API key. Check CASCADE_RERANK_API_KEY.".to_string()
            }
            Self::ApiError(_) | Self::SerializationError(_) | Self::InvalidResponse(_) => {
                "Reranking service returned an unusable response.".to_string()
            }
            Self::Unavailable(_) => {
                "No semantic reranker configured. Lexical ranking was used.".to_string()
            }
            Self::ConfigError(msg) => format!("Configuration error: {}.", msg),
            Self::IndexOutOfRange { index, len } => format!(
                "Reranking service referenced document {} of {}. This is a service bug.",
                index, len
            ),
            Self::NegativeIndex(index) => format!(
                "Reranking service referenced document {}. This is a service bug.",
                index
            ),
            Self::RerankingFailed { source, .. } => source.user_description(),
        }
    }
}
