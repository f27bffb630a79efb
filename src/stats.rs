//! Per-call and aggregate cascade statistics.
//!
//! Counters are for observability only; nothing in the cascade reads them.
//!
//! - [`StageStats`] is returned with every call and owned by the caller.
//! - [`StatsTracker`] accumulates across calls with atomic counters, so one
//!   engine can be shared between concurrent tasks.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts for a single rerank call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStats {
    /// Candidates received.
    pub input: usize,
    /// Candidates dropped by the Stage 1 threshold.
    pub stage1_filtered: usize,
    /// Candidates dropped by the Stage 2 threshold.
    pub stage2_filtered: usize,
    /// Candidates cut by final truncation.
    pub final_truncated: usize,
    /// Candidates returned.
    pub output: usize,
    /// Whether the lite tier produced scores.
    pub semantic_lite_used: bool,
    /// Whether the full tier produced scores.
    pub semantic_full_used: bool,
    /// Stages that fell back (remote failure or total filtering).
    pub fallbacks: usize,
}

/// Snapshot of a [`StatsTracker`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Completed rerank calls.
    pub total_calls: u64,
    /// Candidates received across calls.
    pub total_input: u64,
    /// Stage 1 drops across calls.
    pub stage1_filtered: u64,
    /// Stage 2 drops across calls.
    pub stage2_filtered: u64,
    /// Final truncation drops across calls.
    pub final_truncated: u64,
    /// Fallbacks across calls.
    pub fallbacks: u64,
}

/// Thread-safe aggregate counters.
#[derive(Debug, Default)]
pub struct StatsTracker {
    total_calls: AtomicU64,
    total_input: AtomicU64,
    stage1_filtered: AtomicU64,
    stage2_filtered: AtomicU64,
    final_truncated: AtomicU64,
    fallbacks: AtomicU64,
}

impl StatsTracker {
    /// Create a tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one call's stats into the totals.
    pub fn record(&self, stats: &StageStats) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        self.total_input
            .fetch_add(stats.input as u64, Ordering::Relaxed);
        self.stage1_filtered
            .fetch_add(stats.stage1_filtered as u64, Ordering::Relaxed);
        self.stage2_filtered
            .fetch_add(stats.stage2_filtered as u64, Ordering::Relaxed);
        self.final_truncated
            .fetch_add(stats.final_truncated as u64, Ordering::Relaxed);
        self.fallbacks
            .fetch_add(stats.fallbacks as u64, Ordering::Relaxed);
    }

    /// Get the number of completed calls.
    pub fn total_calls(&self) -> u64 {
        self.total_calls.load(Ordering::Relaxed)
    }

    /// Get all counters as a summary.
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            total_input: self.total_input.load(Ordering::Relaxed),
            stage1_filtered: self.stage1_filtered.load(Ordering::Relaxed),
            stage2_filtered: self.stage2_filtered.load(Ordering::Relaxed),
            final_truncated: self.final_truncated.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.total_calls.store(0, Ordering::Relaxed);
        self.total_input.store(0, Ordering::Relaxed);
        self.stage1_filtered.store(0, Ordering::Relaxed);
        self.stage2_filtered.store(0, Ordering::Relaxed);
        self.final_truncated.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
    }
}
