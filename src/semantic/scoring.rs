//! Tier scoring shared by Stage 2 and Stage 3.
//!
//! Turns a `rerank` call into per-candidate scores aligned with the input
//! and classifies the outcome, so both stages apply the same rules:
//!
//! | Outcome | Cause | Stage behaviour |
//! |---------|-------|-----------------|
//! | `Unavailable` | No service configured | Silent pass-through |
//! | `Failed` | Remote failure | Warn, pass-through |
//! | `Scored` | Scores received | Use them |
//! | `Err(RerankingFailed)` | Index outside the request or negative | Abort the call |

use tracing::debug;

use super::result::RerankTier;
use super::traits::SemanticReranker;
use crate::candidate::Candidate;
use crate::error::{RankError, Result};

/// Result of scoring a candidate list with one tier.
#[derive(Debug)]
pub enum TierOutcome {
    /// The capability is absent.
    Unavailable,
    /// The service was reachable in principle but the call failed.
    Failed(RankError),
    /// One slot per candidate; `None` where the service omitted it.
    Scored(Vec<Option<f64>>),
}

/// Score `candidates` against `query` with `tier`.
///
/// Only an index outside the request is an error; it is wrapped as
/// [`RankError::RerankingFailed`] tagged with `stage`.
pub async fn score_tier(
    reranker: &dyn SemanticReranker,
    query: &str,
    candidates: &[Candidate],
    tier: RerankTier,
    max_chars: usize,
    stage: &'static str,
) -> Result<TierOutcome> {
    if !reranker.is_available() {
        return Ok(TierOutcome::Unavailable);
    }
    if candidates.is_empty() {
        return Ok(TierOutcome::Scored(Vec::new()));
    }

    let documents: Vec<String> = candidates
        .iter()
        .map(|c| c.semantic_text(max_chars))
        .collect();

    let results = match reranker.rerank(query, &documents, tier, None).await {
        Ok(results) => results,
        Err(RankError::Unavailable(reason)) => {
            debug!("{} tier unavailable: {}", tier, reason);
            return Ok(TierOutcome::Unavailable);
        }
        Err(err) if err.is_degradable() => return Ok(TierOutcome::Failed(err)),
        Err(err) => return Err(RankError::reranking_failed(stage, err)),
    };

    let len = candidates.len();
    let mut scores: Vec<Option<f64>> = vec![None; len];
    for result in results {
        let slot = scores.get_mut(result.index).ok_or_else(|| {
            RankError::reranking_failed(
                stage,
                RankError::IndexOutOfRange {
                    index: result.index,
                    len,
                },
            )
        })?;
        // Keep the first score for a duplicated index; drop non-finite ones.
        if slot.is_none() && result.relevance_score.is_finite() {
            *slot = Some(result.relevance_score);
        }
    }

    debug!(
        "{} tier ({}): scored {} of {} documents",
        tier,
        reranker.model(tier),
        scores.iter().filter(|s| s.is_some()).count(),
        len
    );

    Ok(TierOutcome::Scored(scores))
}
