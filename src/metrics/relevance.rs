//! Relevance: the best semantic signal the cascade obtained.

use crate::candidate::{clamp_unit, Candidate};

/// Relevance in `[0, 1]`.
///
/// Uses the full-tier score when present. Otherwise falls back to the lite
/// score, then the lexical score, clamped. The fallback is an approximation,
/// not a cross-encoder signal.
pub fn relevance(candidate: &Candidate) -> f64 {
    match candidate.full_score {
        Some(score) => clamp_unit(score),
        None => candidate.approximate_relevance(),
    }
}
