//! Semantic reranker capability.
//!
//! ```ascii
//!                  ┌──────────────────────────┐
//!                  │ SemanticReranker Trait   │
//!                  └────────────┬─────────────┘
//!                               │
//!              ┌────────────────┴────────────────┐
//!              ▼                                 ▼
//!   ┌─────────────────────┐           ┌─────────────────────┐
//!   │ HttpSemanticReranker│           │NullSemanticReranker │
//!   │ (Jina, Cohere)      │           │ (always unavailable)│
//!   └─────────────────────┘           └─────────────────────┘
//! ```
//!
//! Absence of the capability is modelled as an implementation, not a flag:
//! the cascade always holds a `SemanticReranker` and takes the same fallback
//! path whether the service failed or was never configured.

use async_trait::async_trait;

use super::result::{RerankResult, RerankTier};
use crate::error::Result;

/// Remote relevance scoring in two tiers.
#[async_trait]
pub trait SemanticReranker: Send + Sync {
    /// Get the name of this reranker.
    fn name(&self) -> &str;

    /// Model used for a tier.
    fn model(&self, tier: RerankTier) -> &str;

    /// Whether calls can succeed at all.
    fn is_available(&self) -> bool;

    /// Score documents against a query.
    ///
    /// # Arguments
    ///
    /// - `query`: The search query to rank against
    /// - `documents`: Documents to score
    /// - `tier`: Which model tier to use
    /// - `top_k`: Maximum number of results to return (None = all)
    ///
    /// # Returns
    ///
    /// [`RerankResult`]s sorted by relevance (highest first), each carrying
    /// the index of its document in `documents`.
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        tier: RerankTier,
        top_k: Option<usize>,
    ) -> Result<Vec<RerankResult>>;
}
