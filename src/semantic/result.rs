//! Semantic reranking result and tier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result from reranking a document.
///
/// - `index`: Position of the document in the request
/// - `relevance_score`: Service relevance score (higher = more relevant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    /// Index of the document in the original list.
    pub index: usize,
    /// Relevance score (higher is more relevant).
    pub relevance_score: f64,
}

/// Service tier.
///
/// | Tier | Used by | Purpose |
/// |------|---------|---------|
/// | `Lite` | Stage 2 | Cheap ordering pass + threshold filter |
/// | `Full` | Stage 3 | Best relevance signal for the final blend |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerankTier {
    Lite,
    Full,
}

impl fmt::Display for RerankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lite => f.write_str("lite"),
            Self::Full => f.write_str("full"),
        }
    }
}
