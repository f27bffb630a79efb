//! Stage 2: lite-tier semantic rerank.
//!
//! ```ascii
//! Stage 1 output ──► score_tier(Lite) ──┬── Unavailable ──► pass through
//!                                       ├── Failed ───────► warn, pass through
//!                                       └── Scored ───────► attach, filter >= threshold,
//!                                                           sort desc (or pass through
//!                                                           if nothing survives)
//! ```

use tracing::{debug, warn};

use crate::candidate::Candidate;
use crate::config::StageConfig;
use crate::error::Result;
use crate::semantic::{score_tier, RerankTier, SemanticReranker, TierOutcome};

/// Output of the lite stage.
#[derive(Debug, Clone)]
pub struct LiteOutput {
    /// Survivors in lite-score order, or the untouched input on fallback.
    pub candidates: Vec<Candidate>,
    /// Candidates dropped by the threshold.
    pub filtered: usize,
    /// The lite tier produced scores that were applied.
    pub semantic_used: bool,
    /// A remote failure or total filtering forced pass-through.
    pub fell_back: bool,
}

impl LiteOutput {
    fn pass_through(candidates: Vec<Candidate>, fell_back: bool) -> Self {
        Self {
            candidates,
            filtered: 0,
            semantic_used: false,
            fell_back,
        }
    }
}

/// Cheap semantic ordering pass with a threshold filter.
#[derive(Debug, Clone)]
pub struct SemanticLiteStage {
    threshold: f64,
    max_document_chars: usize,
}

impl SemanticLiteStage {
    /// Create a stage with an explicit threshold and document length cap.
    pub fn new(threshold: f64, max_document_chars: usize) -> Self {
        Self {
            threshold,
            max_document_chars,
        }
    }

    /// Create a stage from the cascade configuration.
    pub fn from_config(config: &StageConfig) -> Self {
        Self::new(config.stage2_threshold, config.max_document_chars)
    }

    /// Minimum lite score to survive.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Rerank `candidates` with the lite tier.
    ///
    /// Never fails for remote errors; only an out-of-range index from the
    /// service is returned as an error.
    pub async fn apply(
        &self,
        reranker: &dyn SemanticReranker,
        query: &str,
        candidates: Vec<Candidate>,
    ) -> Result<LiteOutput> {
        if candidates.is_empty() {
            return Ok(LiteOutput::pass_through(candidates, false));
        }

        let scores = match score_tier(
            reranker,
            query,
            &candidates,
            RerankTier::Lite,
            self.max_document_chars,
            "stage2",
        )
        .await?
        {
            TierOutcome::Unavailable => {
                debug!("Stage 2 skipped: semantic reranker unavailable");
                return Ok(LiteOutput::pass_through(candidates, false));
            }
            TierOutcome::Failed(err) => {
                warn!(
                    "Stage 2 lite rerank via {} failed, keeping lexical order: {}",
                    reranker.name(),
                    err
                );
                return Ok(LiteOutput::pass_through(candidates, true));
            }
            TierOutcome::Scored(scores) => scores,
        };

        let total = candidates.len();
        let mut survivors: Vec<Candidate> = candidates
            .iter()
            .zip(&scores)
            .filter_map(|(candidate, score)| match score {
                Some(s) if *s >= self.threshold => {
                    let mut kept = candidate.clone();
                    kept.lite_score = Some(*s);
                    Some(kept)
                }
                _ => None,
            })
            .collect();

        if survivors.is_empty() {
            warn!(
                "Stage 2 threshold {:.3} removed all {} candidates; keeping Stage 1 output",
                self.threshold, total
            );
            return Ok(LiteOutput::pass_through(candidates, true));
        }

        survivors.sort_by(|a, b| {
            b.lite_score
                .partial_cmp(&a.lite_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            "Stage 2: {} of {} candidates passed threshold {:.3}",
            survivors.len(),
            total,
            self.threshold
        );

        Ok(LiteOutput {
            filtered: total - survivors.len(),
            candidates: survivors,
            semantic_used: true,
            fell_back: false,
        })
    }
}

impl Default for SemanticLiteStage {
    fn default() -> Self {
        Self::from_config(&StageConfig::default())
    }
}
