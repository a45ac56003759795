//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound host ports.

mod in_memory_host;

pub use in_memory_host::InMemoryHost;
