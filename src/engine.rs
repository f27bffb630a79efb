//! The three-stage cascade.
//!
//! ```ascii
//!  candidates ──► Stage 1 ──► Stage 2 ──► Stage 3 ──► ranked shortlist
//!                 BM25        lite tier   full tier + six metrics
//!                 filter      filter      blend, sort, truncate
//! ```
//!
//! Each stage only removes or reorders candidates. A stage whose threshold
//! would remove everything passes its input through instead, so a non-empty
//! input always yields a non-empty shortlist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::candidate::Candidate;
use crate::config::StageConfig;
use crate::error::Result;
use crate::lexical::LexicalFilter;
use crate::locale::LocaleContext;
use crate::semantic::{HttpSemanticReranker, NullSemanticReranker, SemanticReranker};
use crate::stages::{FullMetricEvaluator, SemanticLiteStage};
use crate::stats::{StageStats, StatsTracker};

/// Ranked shortlist plus the counts for this call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RerankOutcome {
    /// At most `final_count` candidates, `final_score` descending.
    pub candidates: Vec<Candidate>,
    /// What each stage did.
    pub stats: StageStats,
}

/// Cascaded reranking engine.
///
/// Holds no per-call state besides the atomic [`StatsTracker`], so one
/// instance can serve concurrent calls behind an `Arc`.
///
/// # Example
///
/// ```
/// use cascade_rank::{Candidate, CascadeReranker, LocaleContext, StageConfig};
///
/// # async fn run() -> cascade_rank::Result<()> {
/// let engine = CascadeReranker::lexical_only(StageConfig::default())?;
/// let pool = vec![Candidate::new("https://docs.rs", "Rust docs", "crate documentation")];
/// let outcome = engine.rerank("rust docs", pool, &LocaleContext::default()).await?;
/// assert_eq!(outcome.candidates.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct CascadeReranker {
    config: StageConfig,
    lexical: LexicalFilter,
    lite: SemanticLiteStage,
    full: FullMetricEvaluator,
    reranker: Arc<dyn SemanticReranker>,
    stats: StatsTracker,
}

impl CascadeReranker {
    /// Create an engine with a semantic reranker.
    ///
    /// When `config.enable_semantic` is false the reranker is replaced with
    /// [`NullSemanticReranker`].
    pub fn new(config: StageConfig, reranker: Arc<dyn SemanticReranker>) -> Result<Self> {
        config.validate()?;

        let reranker: Arc<dyn SemanticReranker> = if config.enable_semantic {
            reranker
        } else {
            Arc::new(NullSemanticReranker::with_reason(
                "semantic reranking disabled by configuration",
            ))
        };

        Ok(Self {
            lexical: LexicalFilter::new(),
            lite: SemanticLiteStage::from_config(&config),
            full: FullMetricEvaluator::from_config(&config),
            config,
            reranker,
            stats: StatsTracker::new(),
        })
    }

    /// Create an engine with no semantic reranker.
    pub fn lexical_only(config: StageConfig) -> Result<Self> {
        Self::new(config, Arc::new(NullSemanticReranker::new()))
    }

    /// Create an engine from `CASCADE_*` and `CASCADE_RERANK_*` variables.
    ///
    /// Without `CASCADE_RERANK_API_KEY` the engine runs lexical-only.
    pub fn from_env() -> Result<Self> {
        let config = StageConfig::from_env()?;
        let reranker: Arc<dyn SemanticReranker> = match HttpSemanticReranker::from_env()? {
            Some(http) => Arc::new(http),
            None => Arc::new(NullSemanticReranker::with_reason(
                "CASCADE_RERANK_API_KEY not set",
            )),
        };
        Self::new(config, reranker)
    }

    /// Replace the Stage 1 filter, e.g. to use the enhanced tokenizer.
    pub fn with_lexical_filter(mut self, lexical: LexicalFilter) -> Self {
        self.lexical = lexical;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Name of the semantic reranker in use ("null" when absent).
    pub fn reranker_name(&self) -> &str {
        self.reranker.name()
    }

    /// Totals across all calls on this engine.
    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    /// Rerank `candidates` for `query`, evaluating freshness against now.
    pub async fn rerank(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
        locale: &LocaleContext,
    ) -> Result<RerankOutcome> {
        self.rerank_at(query, candidates, locale, Utc::now()).await
    }

    /// Rerank with an explicit evaluation time.
    ///
    /// Only an out-of-range index returned by the semantic reranker is an
    /// error; every other failure degrades to the best ordering available.
    pub async fn rerank_at(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
        locale: &LocaleContext,
        now: DateTime<Utc>,
    ) -> Result<RerankOutcome> {
        let mut stats = StageStats {
            input: candidates.len(),
            ..Default::default()
        };

        if candidates.is_empty() {
            debug!("Empty candidate list; nothing to rerank");
            self.stats.record(&stats);
            return Ok(RerankOutcome {
                candidates,
                stats,
            });
        }

        let stage1 = self
            .lexical
            .apply(candidates, query, self.config.stage1_threshold);
        stats.stage1_filtered = stage1.filtered;
        stats.fallbacks += usize::from(stage1.fell_back);

        let stage2 = self
            .lite
            .apply(self.reranker.as_ref(), query, stage1.candidates)
            .await?;
        stats.stage2_filtered = stage2.filtered;
        stats.semantic_lite_used = stage2.semantic_used;
        stats.fallbacks += usize::from(stage2.fell_back);

        let stage3 = self
            .full
            .evaluate(self.reranker.as_ref(), query, stage2.candidates, locale, now)
            .await?;
        stats.final_truncated = stage3.truncated;
        stats.semantic_full_used = stage3.semantic_used;
        stats.fallbacks += usize::from(stage3.fell_back);
        stats.output = stage3.candidates.len();

        info!(
            "Reranked {} -> {} candidates (stage1 -{}, stage2 -{}, truncated -{}, reranker: {}, fallbacks: {})",
            stats.input,
            stats.output,
            stats.stage1_filtered,
            stats.stage2_filtered,
            stats.final_truncated,
            self.reranker.name(),
            stats.fallbacks
        );

        self.stats.record(&stats);
        Ok(RerankOutcome {
            candidates: stage3.candidates,
            stats,
        })
    }
}

impl std::fmt::Debug for CascadeReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CascadeReranker")
            .field("config", &self.config)
            .field("reranker", &self.reranker.name())
            .field("stats", &self.stats.summary())
            .finish()
    }
}
