//! Candidate sources flowing through the cascade.
//!
//! A [`Candidate`] is built once per rerank call from the raw retrieval pool
//! and only ever gains fields as it moves through the stages:
//!
//! ```ascii
//! ┌──────────────┐   Stage 1    ┌──────────────┐   Stage 2    ┌──────────────┐   Stage 3
//! │ url, title,  │ ───────────► │ + lexical    │ ───────────► │ + lite_score │ ──────────►  + full_score
//! │ content, ... │              │   score      │              │   (optional) │              + metrics
//! └──────────────┘              └──────────────┘              └──────────────┘              + final_score
//! ```

use serde::{Deserialize, Serialize};

use crate::metrics::MetricScores;

/// One retrievable source under consideration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Source URL. Keys the domain-based metrics.
    pub url: String,
    /// Document title.
    pub title: String,
    /// Full or partial document text.
    pub content: String,
    /// Publication timestamp as delivered by the backend (parsed lazily).
    #[serde(default)]
    pub published_at: Option<String>,
    /// Upstream backend that produced this candidate.
    #[serde(default)]
    pub origin: String,

    /// BM25 score from Stage 1.
    #[serde(default)]
    pub lexical_score: f64,
    /// Lite-tier semantic score from Stage 2.
    #[serde(default)]
    pub lite_score: Option<f64>,
    /// Full-tier semantic score from Stage 3.
    #[serde(default)]
    pub full_score: Option<f64>,
    /// The six metric values, set by Stage 3.
    #[serde(default)]
    pub metrics: Option<MetricScores>,
    /// Weighted sum of `metrics`.
    #[serde(default)]
    pub final_score: f64,
}

impl Candidate {
    /// Create a candidate with no scores attached.
    pub fn new(url: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
            published_at: None,
            origin: String::new(),
            lexical_score: 0.0,
            lite_score: None,
            full_score: None,
            metrics: None,
            final_score: 0.0,
        }
    }

    /// Set the publication timestamp.
    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    /// Set the origin tag.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Text indexed by the lexical stage: title three times, then content.
    pub(crate) fn lexical_text(&self) -> String {
        format!(
            "{title} {title} {title} {content}",
            title = self.title,
            content = self.content
        )
    }

    /// Text sent to the semantic service, truncated to `max_chars` characters.
    pub(crate) fn semantic_text(&self, max_chars: usize) -> String {
        let full = if self.title.is_empty() {
            self.content.clone()
        } else {
            format!("{}\n\n{}", self.title, self.content)
        };
        match full.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => full[..byte_idx].to_string(),
            None => full,
        }
    }

    /// Best relevance estimate available without the full tier.
    pub(crate) fn approximate_relevance(&self) -> f64 {
        let raw = self.lite_score.unwrap_or(self.lexical_score);
        clamp_unit(raw)
    }
}

/// Clamp into [0, 1], mapping NaN to 0.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
