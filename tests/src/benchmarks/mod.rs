//! # DQPU Benchmarks
//!
//! Throughput of the hot paths: submission, the full lifecycle, paginated
//! reads and snapshot round trips.

pub mod market;
