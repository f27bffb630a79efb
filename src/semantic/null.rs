//! Reranker used when no semantic service is configured.

use async_trait::async_trait;

use super::result::{RerankResult, RerankTier};
use super::traits::SemanticReranker;
use crate::error::{RankError, Result};

/// Always-unavailable semantic reranker.
///
/// Every call returns [`RankError::Unavailable`], which the stages treat as
/// "use the lexical ordering".
#[derive(Debug, Clone)]
pub struct NullSemanticReranker {
    reason: String,
}

impl NullSemanticReranker {
    /// Create with the default reason.
    pub fn new() -> Self {
        Self::with_reason("no semantic reranker configured")
    }

    /// Create with a reason that is reported in [`RankError::Unavailable`].
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for NullSemanticReranker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SemanticReranker for NullSemanticReranker {
    fn name(&self) -> &str {
        "null"
    }

    fn model(&self, _tier: RerankTier) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn rerank(
        &self,
        _query: &str,
        _documents: &[String],
        _tier: RerankTier,
        _top_k: Option<usize>,
    ) -> Result<Vec<RerankResult>> {
        Err(RankError::Unavailable(self.reason.clone()))
    }
}
