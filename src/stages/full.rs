//! Stage 3: full-tier relevance, six metrics, weighted blend.
//!
//! ```ascii
//! Stage 2 output
//!       │
//!       ▼
//! score_tier(Full) ──► full_score per candidate (or approximation)
//!       │
//!       ▼  one linear pass, input order
//! ┌──────────────────────────────────────────────────────────┐
//! │ relevance │ novelty* │ authority │ freshness │ diversity* │ locality │
//! └──────────────────────────────────────────────────────────┘
//!       │            * accumulates over candidates already visited
//!       ▼
//! final_score = Σ value × weight ──► stable sort desc ──► truncate(final_count)
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::candidate::{clamp_unit, Candidate};
use crate::config::StageConfig;
use crate::error::Result;
use crate::locale::LocaleContext;
use crate::metrics::authority::authority;
use crate::metrics::freshness::freshness;
use crate::metrics::locality::locality;
use crate::metrics::relevance::relevance;
use crate::metrics::{DiversityTracker, MetricScores, MetricWeights, NoveltyTracker};
use crate::semantic::{score_tier, RerankTier, SemanticReranker, TierOutcome};

/// Output of the final stage.
#[derive(Debug, Clone)]
pub struct FullOutput {
    /// Ranked shortlist, at most `final_count` long.
    pub candidates: Vec<Candidate>,
    /// Candidates cut by truncation.
    pub truncated: usize,
    /// The full tier produced scores that were applied.
    pub semantic_used: bool,
    /// The full tier failed and relevance was approximated.
    pub fell_back: bool,
}

/// Computes the six metrics, blends them and cuts the shortlist.
#[derive(Debug, Clone)]
pub struct FullMetricEvaluator {
    final_count: usize,
    max_document_chars: usize,
    weights: MetricWeights,
}

impl FullMetricEvaluator {
    /// Create an evaluator. A `final_count` of zero is treated as one.
    pub fn new(final_count: usize, max_document_chars: usize) -> Self {
        Self {
            final_count: final_count.max(1),
            max_document_chars,
            weights: MetricWeights::FIXED,
        }
    }

    /// Create an evaluator from the cascade configuration.
    pub fn from_config(config: &StageConfig) -> Self {
        Self::new(config.final_count, config.max_document_chars)
    }

    /// Maximum shortlist size.
    pub fn final_count(&self) -> usize {
        self.final_count
    }

    /// Score and rank `candidates` as of `now`.
    pub async fn evaluate(
        &self,
        reranker: &dyn SemanticReranker,
        query: &str,
        mut candidates: Vec<Candidate>,
        locale: &LocaleContext,
        now: DateTime<Utc>,
    ) -> Result<FullOutput> {
        if candidates.is_empty() {
            return Ok(FullOutput {
                candidates,
                truncated: 0,
                semantic_used: false,
                fell_back: false,
            });
        }

        let mut semantic_used = false;
        let mut fell_back = false;
        match score_tier(
            reranker,
            query,
            &candidates,
            RerankTier::Full,
            self.max_document_chars,
            "stage3",
        )
        .await?
        {
            TierOutcome::Unavailable => {
                debug!("Stage 3 relevance approximated: semantic reranker unavailable");
            }
            TierOutcome::Failed(err) => {
                warn!(
                    "Stage 3 full rerank via {} failed, approximating relevance: {}",
                    reranker.name(),
                    err
                );
                fell_back = true;
            }
            TierOutcome::Scored(scores) => {
                semantic_used = true;
                for (candidate, score) in candidates.iter_mut().zip(scores) {
                    candidate.full_score = score.map(clamp_unit);
                }
            }
        }

        self.score_metrics(&mut candidates, locale, now);

        candidates.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total = candidates.len();
        candidates.truncate(self.final_count);
        let truncated = total - candidates.len();

        debug!(
            "Stage 3: ranked {} candidates, kept {}",
            total,
            candidates.len()
        );

        Ok(FullOutput {
            candidates,
            truncated,
            semantic_used,
            fell_back,
        })
    }

    /// Attach metrics and `final_score`, visiting candidates in slice order.
    fn score_metrics(&self, candidates: &mut [Candidate], locale: &LocaleContext, now: DateTime<Utc>) {
        let mut novelty = NoveltyTracker::new();
        let mut diversity = DiversityTracker::new();

        for candidate in candidates.iter_mut() {
            let scores = MetricScores {
                relevance: relevance(candidate),
                novelty: novelty.observe(&candidate.content),
                authority: authority(&candidate.url),
                freshness: freshness(candidate.published_at.as_deref(), now),
                diversity: diversity.observe(&candidate.url),
                locality: locality(&candidate.url, locale),
            };
            candidate.final_score = scores.weighted_sum(&self.weights);
            candidate.metrics = Some(scores);
        }
    }
}

impl Default for FullMetricEvaluator {
    fn default() -> Self {
        Self::from_config(&StageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricName;
    use crate::semantic::{
        MockBehavior, MockFailure, MockSemanticReranker, NullSemanticReranker, RerankResult,
    };
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn pool() -> Vec<Candidate> {
        vec![
            Candidate::new(
                "https://mit.edu/article",
                "Ownership",
                "rust ownership and borrowing rules explained",
            )
            .with_published_at("2024-05-02T00:00:00Z"),
            Candidate::new(
                "https://example.com/a",
                "Async",
                "async rust with tokio runtime",
            ),
            Candidate::new(
                "https://example.com/b",
                "Async copy",
                "async rust with tokio runtime",
            ),
        ]
    }

    #[tokio::test]
    async fn test_all_metrics_attached_and_bounded() {
        let out = FullMetricEvaluator::default()
            .evaluate(
                &NullSemanticReranker::new(),
                "rust",
                pool(),
                &LocaleContext::default(),
                now(),
            )
            .await
            .unwrap();

        assert_eq!(out.candidates.len(), 3);
        for c in &out.candidates {
            let metrics = c.metrics.expect("metrics set");
            for (name, value) in metrics.iter() {
                assert!((0.0..=1.0).contains(&value), "{} = {}", name, value);
            }
            let expected = metrics.weighted_sum(&MetricWeights::FIXED);
            assert!((c.final_score - expected).abs() < 1e-12);
        }
        for pair in out.candidates.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
    }

    #[tokio::test]
    async fn test_metrics_follow_processing_order() {
        let out = FullMetricEvaluator::default()
            .evaluate(
                &NullSemanticReranker::new(),
                "rust",
                pool(),
                &LocaleContext::default(),
                now(),
            )
            .await
            .unwrap();

        let by_url = |url: &str| {
            out.candidates
                .iter()
                .find(|c| c.url == url)
                .and_then(|c| c.metrics)
                .expect("candidate present")
        };

        let first = by_url("https://mit.edu/article");
        assert_eq!(first.novelty, 1.0);
        assert_eq!(first.authority, 1.0);
        assert!((first.freshness - (-1.0f64).exp()).abs() < 1e-3);

        assert_eq!(by_url("https://example.com/a").diversity, 1.0);
        let copy = by_url("https://example.com/b");
        assert_eq!(copy.diversity, 0.5);
        assert_eq!(copy.novelty, 0.0);
        assert_eq!(copy.freshness, 0.5);
    }

    #[tokio::test]
    async fn test_full_scores_drive_relevance() {
        let reranker = MockSemanticReranker::new().with_full(MockBehavior::Fixed(vec![
            RerankResult {
                index: 0,
                relevance_score: 1.7,
            },
            RerankResult {
                index: 2,
                relevance_score: 0.25,
            },
        ]));
        let mut input = pool();
        input[1].lexical_score = 0.4;

        let out = FullMetricEvaluator::default()
            .evaluate(&reranker, "rust", input, &LocaleContext::default(), now())
            .await
            .unwrap();
        assert!(out.semantic_used);

        let get = |url: &str| {
            out.candidates
                .iter()
                .find(|c| c.url == url)
                .expect("present")
                .clone()
        };
        // Clamped into [0, 1].
        assert_eq!(get("https://mit.edu/article").full_score, Some(1.0));
        // Omitted by the service: lexical approximation.
        let omitted = get("https://example.com/a");
        assert_eq!(omitted.full_score, None);
        assert_eq!(omitted.metrics.map(|m| m.relevance), Some(0.4));
        assert_eq!(
            get("https://example.com/b")
                .metrics
                .map(|m| m.get(MetricName::Relevance)),
            Some(0.25)
        );
    }

    #[tokio::test]
    async fn test_failed_full_tier_approximates() {
        let reranker =
            MockSemanticReranker::new().with_full(MockBehavior::Fail(MockFailure::Timeout));
        let mut input = pool();
        input[0].lite_score = Some(0.8);

        let out = FullMetricEvaluator::default()
            .evaluate(&reranker, "rust", input, &LocaleContext::default(), now())
            .await
            .unwrap();

        assert!(out.fell_back);
        assert!(!out.semantic_used);
        let mit = out
            .candidates
            .iter()
            .find(|c| c.url == "https://mit.edu/article")
            .expect("present");
        assert_eq!(mit.metrics.map(|m| m.relevance), Some(0.8));
    }

    #[tokio::test]
    async fn test_truncates_to_final_count() {
        let out = FullMetricEvaluator::new(2, 1000)
            .evaluate(
                &NullSemanticReranker::new(),
                "rust",
                pool(),
                &LocaleContext::default(),
                now(),
            )
            .await
            .unwrap();
        assert_eq!(out.candidates.len(), 2);
        assert_eq!(out.truncated, 1);
    }

    #[tokio::test]
    async fn test_zero_final_count_keeps_one() {
        let evaluator = FullMetricEvaluator::new(0, 1000);
        assert_eq!(evaluator.final_count(), 1);
        let out = evaluator
            .evaluate(
                &NullSemanticReranker::new(),
                "rust",
                pool(),
                &LocaleContext::default(),
                now(),
            )
            .await
            .unwrap();
        assert_eq!(out.candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_locality_uses_locale() {
        let input = vec![Candidate::new("https://heise.de/news", "News", "rust release")];
        let out = FullMetricEvaluator::default()
            .evaluate(
                &NullSemanticReranker::new(),
                "rust",
                input,
                &LocaleContext::new("", "Germany", "de"),
                now(),
            )
            .await
            .unwrap();
        assert_eq!(out.candidates[0].metrics.map(|m| m.locality), Some(1.0));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let reranker = MockSemanticReranker::new();
        let out = FullMetricEvaluator::default()
            .evaluate(&reranker, "rust", Vec::new(), &LocaleContext::default(), now())
            .await
            .unwrap();
        assert!(out.candidates.is_empty());
        assert_eq!(reranker.calls(RerankTier::Full), 0);
    }
}
