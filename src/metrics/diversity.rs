//! Per-domain soft cap.
//!
//! | Earlier candidates on the same root domain | Score |
//! |--------------------------------------------|-------|
//! | 0 | 1.0 |
//! | 1 | 0.5 |
//! | 2+ | 0.0 |

use std::collections::HashMap;

use super::domain::root_domain;

/// Running domain counts over one linear pass.
#[derive(Debug, Clone, Default)]
pub struct DiversityTracker {
    seen: HashMap<String, usize>,
}

impl DiversityTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diversity of `url` given the domains observed so far, then count it.
    ///
    /// URLs without a host score 1.0 and are not counted.
    pub fn observe(&mut self, url: &str) -> f64 {
        let Some(root) = root_domain(url) else {
            return 1.0;
        };

        let prior = self.seen.entry(root).or_insert(0);
        let score = match *prior {
            0 => 1.0,
            1 => 0.5,
            _ => 0.0,
        };
        *prior += 1;
        score
    }

    /// Number of candidates counted for a root domain.
    pub fn count(&self, root: &str) -> usize {
        self.seen.get(root).copied().unwrap_or(0)
    }
}
