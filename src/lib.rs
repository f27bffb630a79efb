//! Cascade Rank - three-stage source reranking
//!
//! Narrows a large pool of retrieved sources to a short, high-quality list
//! for downstream content generation.
//!
//! # Architecture
//!
//! ```ascii
//!        candidates (url, title, content, published_at, origin)
//!                              │
//!                              ▼
//!     ┌─────────────────────────────────────────────────────┐
//!     │ Stage 1  LexicalFilter      BM25, stage1_threshold   │
//!     └──────────────────────────┬──────────────────────────┘
//!                                ▼
//!     ┌─────────────────────────────────────────────────────┐
//!     │ Stage 2  SemanticLiteStage  lite tier, stage2_thresh │
//!     └──────────────────────────┬──────────────────────────┘
//!                                ▼
//!     ┌─────────────────────────────────────────────────────┐
//!     │ Stage 3  FullMetricEvaluator                         │
//!     │   relevance 0.30  novelty 0.25  authority 0.20       │
//!     │   freshness 0.15  diversity 0.05  locality 0.05      │
//!     └──────────────────────────┬──────────────────────────┘
//!                                ▼
//!                  top `final_count` by final_score
//! ```
//!
//! The semantic reranker is a capability: [`HttpSemanticReranker`] when a
//! service is configured, [`NullSemanticReranker`] otherwise. Both go through
//! the same fallback paths.
//!
//! # Example
//!
//! ```no_run
//! use cascade_rank::{Candidate, CascadeReranker, LocaleContext};
//!
//! # async fn run() -> cascade_rank::Result<()> {
//! let engine = CascadeReranker::from_env()?;
//! let pool = vec![
//!     Candidate::new("https://www.bundesbank.de/", "Inflation", "Verbraucherpreise steigen")
//!         .with_published_at("2024-05-30"),
//! ];
//! let outcome = engine
//!     .rerank("inflation germany", pool, &LocaleContext::new("", "Germany", "de"))
//!     .await?;
//! for candidate in &outcome.candidates {
//!     println!("{:.3} {}", candidate.final_score, candidate.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod candidate;
pub mod config;
pub mod engine;
pub mod error;
pub mod lexical;
pub mod locale;
pub mod metrics;
pub mod semantic;
pub mod stages;
pub mod stats;

pub use candidate::Candidate;
pub use config::StageConfig;
pub use engine::{CascadeReranker, RerankOutcome};
pub use error::{RankError, Result};
pub use lexical::{Bm25Scorer, LexicalFilter, TokenizerConfig};
pub use locale::LocaleContext;
pub use metrics::{MetricName, MetricScores, MetricWeights};
pub use semantic::{
    HttpSemanticReranker, NullSemanticReranker, RerankResult, RerankTier, SemanticConfig,
    SemanticReranker,
};
pub use stages::{FullMetricEvaluator, SemanticLiteStage};
pub use stats::{StageStats, StatsSummary, StatsTracker};
