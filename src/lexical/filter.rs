//! Stage 1: lexical pre-filter.

use tracing::{debug, warn};

use super::bm25::Bm25Scorer;
use crate::candidate::Candidate;

/// Output of the lexical stage.
#[derive(Debug, Clone)]
pub struct LexicalOutput {
    /// Survivors, sorted by lexical score descending.
    pub candidates: Vec<Candidate>,
    /// Candidates dropped by the threshold.
    pub filtered: usize,
    /// True when the threshold removed everything and the unfiltered pool was kept.
    pub fell_back: bool,
}

/// Scores candidates with BM25 and drops those below a threshold.
///
/// Each candidate is indexed as its title repeated three times followed by
/// its content, which weights title matches without a separate parameter.
#[derive(Debug, Clone, Default)]
pub struct LexicalFilter {
    scorer: Bm25Scorer,
}

impl LexicalFilter {
    /// Create a filter with the default whitespace BM25 scorer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with a custom scorer.
    pub fn with_scorer(scorer: Bm25Scorer) -> Self {
        Self { scorer }
    }

    /// Score, filter, and sort.
    ///
    /// If `threshold` would remove every candidate, the full scored pool is
    /// returned instead so a non-empty input never collapses to nothing.
    pub fn apply(&self, mut candidates: Vec<Candidate>, query: &str, threshold: f64) -> LexicalOutput {
        if candidates.is_empty() {
            return LexicalOutput {
                candidates,
                filtered: 0,
                fell_back: false,
            };
        }

        let corpus: Vec<String> = candidates.iter().map(Candidate::lexical_text).collect();
        let scores = self.scorer.score(query, &corpus);
        for (candidate, score) in candidates.iter_mut().zip(scores) {
            candidate.lexical_score = score;
        }

        candidates.sort_by(|a, b| {
            b.lexical_score
                .partial_cmp(&a.lexical_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total = candidates.len();
        let survivors = candidates
            .iter()
            .filter(|c| c.lexical_score >= threshold)
            .count();

        if survivors == 0 {
            warn!(
                "Stage 1 threshold {:.3} removed all {} candidates; keeping unfiltered pool",
                threshold, total
            );
            return LexicalOutput {
                candidates,
                filtered: 0,
                fell_back: true,
            };
        }

        candidates.retain(|c| c.lexical_score >= threshold);
        debug!(
            "Stage 1: {} of {} candidates passed threshold {:.3}",
            survivors, total, threshold
        );

        LexicalOutput {
            candidates,
            filtered: total - survivors,
            fell_back: false,
        }
    }
}
