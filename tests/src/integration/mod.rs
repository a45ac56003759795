//! # Integration Tests
//!
//! Exercise the marketplace through its inbound ports with an in-memory
//! host, the way an embedding runtime drives it.

pub mod workflows;
