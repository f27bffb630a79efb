//! Deterministic in-process semantic reranker for tests and offline runs.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              MockSemanticReranker                    │
//! ├──────────────────────────────────────────────────────┤
//! │  lite: MockBehavior   full: MockBehavior             │
//! │  ├── TermOverlap  score = |query ∩ doc| / |query|    │
//! │  ├── Fixed        canned results, returned as-is     │
//! │  └── Fail         error of the chosen kind           │
//! │  calls(tier) ──► number of rerank calls per tier     │
//! └──────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::result::{RerankResult, RerankTier};
use super::traits::SemanticReranker;
use crate::error::{RankError, Result};

/// Failure kinds a mock tier can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Timeout,
    RateLimited,
    Api,
    Unavailable,
}

impl MockFailure {
    fn to_error(self, tier: RerankTier) -> RankError {
        match self {
            Self::Timeout => RankError::Timeout,
            Self::RateLimited => RankError::RateLimited(format!("mock {} quota", tier)),
            Self::Api => RankError::ApiError(format!("mock {} failure", tier)),
            Self::Unavailable => RankError::Unavailable(format!("mock {} disabled", tier)),
        }
    }
}

/// How one tier responds.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Fraction of query terms present in the document.
    TermOverlap,
    /// Return these results regardless of input.
    Fixed(Vec<RerankResult>),
    /// Always fail.
    Fail(MockFailure),
}

/// Scripted two-tier reranker.
///
/// # Example
///
/// ```
/// use cascade_rank::semantic::{MockBehavior, MockFailure, MockSemanticReranker};
///
/// let reranker = MockSemanticReranker::new()
///     .with_full(MockBehavior::Fail(MockFailure::Timeout));
/// ```
#[derive(Debug, Clone)]
pub struct MockSemanticReranker {
    lite: MockBehavior,
    full: MockBehavior,
    lite_calls: Arc<AtomicUsize>,
    full_calls: Arc<AtomicUsize>,
}

impl MockSemanticReranker {
    /// Term-overlap scoring on both tiers.
    pub fn new() -> Self {
        Self {
            lite: MockBehavior::TermOverlap,
            full: MockBehavior::TermOverlap,
            lite_calls: Arc::new(AtomicUsize::new(0)),
            full_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the lite-tier behavior.
    pub fn with_lite(mut self, behavior: MockBehavior) -> Self {
        self.lite = behavior;
        self
    }

    /// Set the full-tier behavior.
    pub fn with_full(mut self, behavior: MockBehavior) -> Self {
        self.full = behavior;
        self
    }

    /// Number of `rerank` calls made for a tier.
    pub fn calls(&self, tier: RerankTier) -> usize {
        self.counter(tier).load(Ordering::SeqCst)
    }

    fn counter(&self, tier: RerankTier) -> &AtomicUsize {
        match tier {
            RerankTier::Lite => &self.lite_calls,
            RerankTier::Full => &self.full_calls,
        }
    }

    fn behavior(&self, tier: RerankTier) -> &MockBehavior {
        match tier {
            RerankTier::Lite => &self.lite,
            RerankTier::Full => &self.full,
        }
    }
}

impl Default for MockSemanticReranker {
    fn default() -> Self {
        Self::new()
    }
}

fn term_overlap(query: &str, documents: &[String]) -> Vec<RerankResult> {
    let query_lower = query.to_lowercase();
    let query_terms: HashSet<&str> = query_lower.split_whitespace().collect();
    let max_terms = query_terms.len().max(1);

    let mut results: Vec<RerankResult> = documents
        .iter()
        .enumerate()
        .map(|(idx, doc)| {
            let doc_lower = doc.to_lowercase();
            let doc_terms: HashSet<&str> = doc_lower.split_whitespace().collect();
            let overlap = query_terms.intersection(&doc_terms).count();
            RerankResult {
                index: idx,
                relevance_score: overlap as f64 / max_terms as f64,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

#[async_trait]
impl SemanticReranker for MockSemanticReranker {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self, tier: RerankTier) -> &str {
        match tier {
            RerankTier::Lite => "mock-lite",
            RerankTier::Full => "mock-full",
        }
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        tier: RerankTier,
        top_k: Option<usize>,
    ) -> Result<Vec<RerankResult>> {
        self.counter(tier).fetch_add(1, Ordering::SeqCst);

        let mut results = match self.behavior(tier) {
            MockBehavior::TermOverlap => term_overlap(query, documents),
            MockBehavior::Fixed(results) => results.clone(),
            MockBehavior::Fail(failure) => return Err(failure.to_error(tier)),
        };

        if let Some(n) = top_k {
            results.truncate(n);
        }
        Ok(results)
    }
}
