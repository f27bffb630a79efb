//! Per-candidate heuristic metrics.
//!
//! Six independent calculators, each producing a score in `[0, 1]`:
//!
//! | Metric | Weight | Signal | Neutral default |
//! |--------|--------|--------|-----------------|
//! | Relevance | 0.30 | Full-tier score, else lite, else lexical (clamped) | n/a |
//! | Novelty | 0.25 | 1 − max MinHash similarity to earlier candidates | 0.5 (no content) |
//! | Authority | 0.20 | Trusted suffix, https, short domain | 0.3 (no URL) |
//! | Freshness | 0.15 | `exp(−age_days / 30)` | 0.5 (no date) |
//! | Diversity | 0.05 | Earlier candidates on the same root domain | 1.0 (no URL) |
//! | Locality | 0.05 | Domain suffix matches the target market | 0.5 |
//!
//! Novelty and diversity are stateful: they compare against candidates
//! already processed in the same pass, so their values depend on
//! processing order (see [`crate::stages::FullMetricEvaluator`]).
//!
//! ```ascii
//! metrics/
//! ├── mod.rs        ─► MetricName, MetricScores, MetricWeights
//! ├── domain.rs     ─► URL → root domain
//! ├── relevance.rs
//! ├── novelty.rs    ─► MinHasher, NoveltyTracker
//! ├── authority.rs
//! ├── freshness.rs
//! ├── diversity.rs  ─► DiversityTracker
//! └── locality.rs
//! ```

pub mod authority;
pub mod diversity;
pub mod domain;
pub mod freshness;
pub mod locality;
pub mod novelty;
pub mod relevance;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use diversity::DiversityTracker;
pub use novelty::{MinHasher, NoveltyTracker};

/// Names of the six metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricName {
    Relevance,
    Novelty,
    Authority,
    Freshness,
    Diversity,
    Locality,
}

impl MetricName {
    /// All metrics, in weight order.
    pub const ALL: [MetricName; 6] = [
        MetricName::Relevance,
        MetricName::Novelty,
        MetricName::Authority,
        MetricName::Freshness,
        MetricName::Diversity,
        MetricName::Locality,
    ];

    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Novelty => "novelty",
            Self::Authority => "authority",
            Self::Freshness => "freshness",
            Self::Diversity => "diversity",
            Self::Locality => "locality",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six metric values of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricScores {
    pub relevance: f64,
    pub novelty: f64,
    pub authority: f64,
    pub freshness: f64,
    pub diversity: f64,
    pub locality: f64,
}

impl MetricScores {
    /// Value of one metric.
    pub fn get(&self, name: MetricName) -> f64 {
        match name {
            MetricName::Relevance => self.relevance,
            MetricName::Novelty => self.novelty,
            MetricName::Authority => self.authority,
            MetricName::Freshness => self.freshness,
            MetricName::Diversity => self.diversity,
            MetricName::Locality => self.locality,
        }
    }

    /// `(name, value)` pairs for all six metrics.
    pub fn iter(&self) -> impl Iterator<Item = (MetricName, f64)> + '_ {
        MetricName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    /// `Σ value × weight`.
    pub fn weighted_sum(&self, weights: &MetricWeights) -> f64 {
        self.iter()
            .map(|(name, value)| value * weights.get(name))
            .sum()
    }
}

/// Metric weights. The engine only ever uses [`MetricWeights::FIXED`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricWeights {
    pub relevance: f64,
    pub novelty: f64,
    pub authority: f64,
    pub freshness: f64,
    pub diversity: f64,
    pub locality: f64,
}

impl MetricWeights {
    /// Engine weights; they sum to 1.0.
    pub const FIXED: MetricWeights = MetricWeights {
        relevance: 0.30,
        novelty: 0.25,
        authority: 0.20,
        freshness: 0.15,
        diversity: 0.05,
        locality: 0.05,
    };

    /// Weight of one metric.
    pub fn get(&self, name: MetricName) -> f64 {
        match name {
            MetricName::Relevance => self.relevance,
            MetricName::Novelty => self.novelty,
            MetricName::Authority => self.authority,
            MetricName::Freshness => self.freshness,
            MetricName::Diversity => self.diversity,
            MetricName::Locality => self.locality,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        MetricName::ALL.iter().map(|name| self.get(*name)).sum()
    }
}
