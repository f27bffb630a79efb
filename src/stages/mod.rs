//! Semantic stages of the cascade.
//!
//! Stage 1 lives in [`crate::lexical`]; the two stages here are the ones
//! that may call the semantic reranker.
//!
//! | Stage | Type | Tier | Drops candidates |
//! |-------|------|------|------------------|
//! | 2 | [`SemanticLiteStage`] | Lite | below `stage2_threshold` |
//! | 3 | [`FullMetricEvaluator`] | Full | beyond `final_count` |

mod full;
mod lite;

pub use full::{FullMetricEvaluator, FullOutput};
pub use lite::{LiteOutput, SemanticLiteStage};
