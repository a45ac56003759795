//! # Marketplace Metrics
//!
//! Prometheus metrics for the thread-safe service.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! dqpu-contract = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `dqpu_invocations_total` - Counter of invocations (by operation)
//! - `dqpu_rejections_total` - Counter of rejected invocations (by error kind)
//! - `dqpu_jobs` - Gauge of jobs in the ledger (by status)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, register_int_gauge_vec, IntCounterVec, IntGaugeVec};

use crate::domain::JobStats;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Invocations, labeled by operation
    pub static ref INVOCATIONS: IntCounterVec = register_int_counter_vec!(
        "dqpu_invocations_total",
        "Total number of marketplace invocations",
        &["operation"]
    )
    .expect("Failed to create INVOCATIONS metric");

    /// Rejected invocations, labeled by error kind
    pub static ref REJECTIONS: IntCounterVec = register_int_counter_vec!(
        "dqpu_rejections_total",
        "Total number of rejected marketplace invocations",
        &["kind"]
    )
    .expect("Failed to create REJECTIONS metric");

    /// Jobs in the ledger, labeled by status
    pub static ref JOBS: IntGaugeVec = register_int_gauge_vec!(
        "dqpu_jobs",
        "Number of jobs in the ledger",
        &["status"]
    )
    .expect("Failed to create JOBS metric");
}

/// Record an invocation of `operation`
#[cfg(feature = "metrics")]
pub fn record_invocation(operation: &str) {
    INVOCATIONS.with_label_values(&[operation]).inc();
}

/// Record a rejection of kind `kind`
#[cfg(feature = "metrics")]
pub fn record_rejection(kind: &str) {
    REJECTIONS.with_label_values(&[kind]).inc();
}

/// Update the per-status job gauges
#[cfg(feature = "metrics")]
pub fn set_job_counts(stats: &JobStats) {
    for (status, count) in stats.iter() {
        JOBS.with_label_values(&[status.as_str()])
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

/// No-op without the `metrics` feature
#[cfg(not(feature = "metrics"))]
pub fn record_invocation(_operation: &str) {}

/// No-op without the `metrics` feature
#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_kind: &str) {}

/// No-op without the `metrics` feature
#[cfg(not(feature = "metrics"))]
pub fn set_job_counts(_stats: &JobStats) {}
