//! Stage 1: BM25 lexical pre-filter.
//!
//! ```ascii
//! lexical/
//! ├── mod.rs    ─► This file (re-exports)
//! ├── bm25.rs   ─► Bm25Scorer, TokenizerConfig
//! └── filter.rs ─► LexicalFilter, LexicalOutput
//! ```
//!
//! No network dependency: this stage always runs.

mod bm25;
mod filter;

pub use bm25::{Bm25Scorer, TokenizerConfig};
pub use filter::{LexicalFilter, LexicalOutput};
