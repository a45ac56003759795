//! # DQPU Job Marketplace
//!
//! Escrow-backed marketplace for outsourced quantum sampling jobs.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Job owners post circuits with an escrowed reward, verifiers adjudicate
//! jobs and results, samplers execute jobs against posted collateral:
//! - A five-state job lifecycle with verifier-gated transitions
//! - Reward and collateral custody delegated to the host
//! - Per-status counters kept in lockstep with the ledger
//!
//! ## Ledger Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Atomicity | A rejected call changes no state and issues no transfer |
//! | Stats mirror | `stats[s]` equals the number of jobs in status `s` |
//! | Sequential ids | The n-th job gets id n; ids are never reused |
//! | Distinct roles | A sampler is never the job's owner or verifier |
//! | Fund conservation | Every reward and every deposit is disposed of exactly once |
//!
//! ## Module Structure
//!
//! ```text
//! dqpu-contract/
//! ├── domain/          # Job, JobStatus, AccountId, errors, invariants
//! ├── market/          # AccessControl, EscrowAccounting, JobLedger, StatsAggregator
//! ├── ports/           # JobMarketApi, JobMarketQuery, host capabilities
//! ├── adapters/        # InMemoryHost
//! ├── persistence      # StateSnapshot
//! └── service          # JobMarketService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod market;
pub mod metrics;
pub mod persistence;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::InMemoryHost;
pub use config::{ConfigError, MarketConfig};
pub use domain::{
    AccountId, Balance, ContractError, InputError, InvariantViolation, Job, JobId, JobRequest,
    JobStats, JobStatus, Role,
};
pub use events::MarketEvent;
pub use market::JobMarket;
pub use persistence::{PersistenceError, StateSnapshot};
pub use ports::{
    CallerContext, EventSink, Host, JobMarketApi, JobMarketQuery, Transfer, ValueTransfer,
};
pub use service::{JobMarketService, ServiceStats};

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        AccountId, Balance, ContractError, Host, InMemoryHost, Job, JobId, JobMarket,
        JobMarketApi, JobMarketQuery, JobRequest, JobStatus,
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
