//! Optional semantic reranking service.
//!
//! The cascade calls the service twice: the lite tier in Stage 2 and the
//! full tier in Stage 3. Either call may be absent or fail; the stages then
//! keep the best ordering they already have.
//!
//! # Module Structure
//!
//! ```ascii
//! semantic/
//! ├── mod.rs         ─► This file (re-exports)
//! ├── config.rs      ─► SemanticConfig (Jina, Cohere presets)
//! ├── result.rs      ─► RerankResult, RerankTier
//! ├── traits.rs      ─► SemanticReranker trait
//! ├── http.rs        ─► HttpSemanticReranker
//! ├── null.rs        ─► NullSemanticReranker
//! ├── mock.rs        ─► MockSemanticReranker (term overlap / scripted)
//! └── scoring.rs     ─► score_tier, TierOutcome
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cascade_rank::semantic::{HttpSemanticReranker, RerankTier, SemanticReranker};
//!
//! # async fn run() -> cascade_rank::Result<()> {
//! let reranker = HttpSemanticReranker::jina("api-key")?;
//! let docs = vec!["Rust ownership explained".to_string()];
//! let results = reranker.rerank("rust borrow checker", &docs, RerankTier::Lite, None).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
mod mock;
mod null;
mod result;
mod scoring;
mod traits;

pub use config::SemanticConfig;
pub use http::HttpSemanticReranker;
pub use mock::{MockBehavior, MockFailure, MockSemanticReranker};
pub use null::NullSemanticReranker;
pub use result::{RerankResult, RerankTier};
pub use scoring::{score_tier, TierOutcome};
pub use traits::SemanticReranker;

#[cfg(test)]
mod tests;
