//! # Stats Aggregator
//!
//! Per-status mirror of the ledger for O(1) aggregate reads. Every ledger
//! status change goes through exactly one of the `record_*` methods in the
//! same invocation.

use crate::domain::{JobStats, JobStatus};

/// Per-status job counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsAggregator {
    counts: JobStats,
}

impl StatsAggregator {
    /// Create with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted counts.
    pub(crate) fn from_counts(counts: JobStats) -> Self {
        Self { counts }
    }

    /// A job was created in `status`.
    pub fn record_created(&mut self, status: JobStatus) {
        self.counts.increment(status);
    }

    /// A job moved from `from` to `to`.
    pub fn record_transition(&mut self, from: JobStatus, to: JobStatus) {
        self.counts.decrement(from);
        self.counts.increment(to);
    }

    /// A job in `status` left the ledger.
    pub fn record_removed(&mut self, status: JobStatus) {
        self.counts.decrement(status);
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        self.counts = JobStats::default();
    }

    /// Current counts.
    pub fn counts(&self) -> &JobStats {
        &self.counts
    }
}
