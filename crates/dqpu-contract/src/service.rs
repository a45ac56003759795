//! # Job Market Service
//!
//! Thread-safe wrapper around [`JobMarket`] for embedding in a multi-threaded
//! host.
//!
//! ## Concurrency
//!
//! - Mutating calls hold the write lock for the whole invocation, so two
//!   invocations never interleave their mutations
//! - Views take the read lock and may run concurrently
//! - Statistics live behind their own lock and never block views

use crate::domain::{AccountId, Balance, ContractError, JobId, JobRequest, JobStatus};
use crate::market::JobMarket;
use crate::metrics;
use crate::persistence::StateSnapshot;
use crate::ports::inbound::JobMarketApi;
use crate::ports::outbound::Host;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// Statistics for the Job Market Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Total mutating invocations.
    pub invocations: u64,
    /// Invocations that committed.
    pub successes: u64,
    /// Rejected invocations, by error kind.
    pub rejections: BTreeMap<&'static str, u64>,
}

impl ServiceStats {
    /// Total rejected invocations.
    pub fn rejected(&self) -> u64 {
        self.rejections.values().sum()
    }
}

/// Thread-safe job market.
#[derive(Debug)]
pub struct JobMarketService {
    market: RwLock<JobMarket>,
    stats: RwLock<ServiceStats>,
}

impl JobMarketService {
    /// Wrap a market.
    pub fn new(market: JobMarket) -> Self {
        Self {
            market: RwLock::new(market),
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Get current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Run a view under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&JobMarket) -> T) -> T {
        f(&self.market.read())
    }

    /// Capture the complete state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.market.read().snapshot()
    }

    /// Run one mutating invocation under the write lock.
    pub fn execute<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut JobMarket) -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        metrics::record_invocation(operation);
        let mut market = self.market.write();
        let result = f(&mut market);

        let mut stats = self.stats.write();
        stats.invocations += 1;
        match &result {
            Ok(_) => stats.successes += 1,
            Err(err) => {
                *stats.rejections.entry(err.kind()).or_insert(0) += 1;
                metrics::record_rejection(err.kind());
            }
        }
        metrics::set_job_counts(market.stats().counts());
        debug!(operation, ok = result.is_ok(), "Invocation finished");
        result
    }

    /// See [`JobMarketApi::submit_job`].
    pub fn submit_job(
        &self,
        host: &mut dyn Host,
        request: JobRequest,
    ) -> Result<JobId, ContractError> {
        self.execute("submit_job", |market| market.submit_job(host, request))
    }

    /// See [`JobMarketApi::remove_job`].
    pub fn remove_job(&self, host: &mut dyn Host, id: JobId) -> Result<Balance, ContractError> {
        self.execute("remove_job", |market| market.remove_job(host, id))
    }

    /// See [`JobMarketApi::set_job_validity`].
    pub fn set_job_validity(
        &self,
        host: &mut dyn Host,
        id: JobId,
        valid: bool,
        trapped_file: Option<String>,
    ) -> Result<JobStatus, ContractError> {
        self.execute("set_job_validity", |market| {
            market.set_job_validity(host, id, valid, trapped_file)
        })
    }

    /// See [`JobMarketApi::submit_job_result`].
    pub fn submit_job_result(
        &self,
        host: &mut dyn Host,
        id: JobId,
        result_file: String,
    ) -> Result<(), ContractError> {
        self.execute("submit_job_result", |market| {
            market.submit_job_result(host, id, result_file)
        })
    }

    /// See [`JobMarketApi::set_result_validity`].
    pub fn set_result_validity(
        &self,
        host: &mut dyn Host,
        id: JobId,
        valid: bool,
        trap_file: Option<String>,
    ) -> Result<JobStatus, ContractError> {
        self.execute("set_result_validity", |market| {
            market.set_result_validity(host, id, valid, trap_file)
        })
    }

    /// See [`JobMarketApi::add_verifier`].
    pub fn add_verifier(&self, host: &mut dyn Host, account: AccountId) -> Result<bool, ContractError> {
        self.execute("add_verifier", |market| market.add_verifier(host, account))
    }

    /// See [`JobMarketApi::remove_verifier`].
    pub fn remove_verifier(
        &self,
        host: &mut dyn Host,
        account: AccountId,
    ) -> Result<bool, ContractError> {
        self.execute("remove_verifier", |market| {
            market.remove_verifier(host, account)
        })
    }

    /// See [`JobMarketApi::set_owner`].
    pub fn set_owner(&self, host: &mut dyn Host, new_owner: AccountId) -> Result<(), ContractError> {
        self.execute("set_owner", |market| market.set_owner(host, new_owner))
    }

    /// See [`JobMarketApi::clear_jobs`].
    pub fn clear_jobs(&self, host: &mut dyn Host) -> Result<u64, ContractError> {
        self.execute("clear_jobs", |market| market.clear_jobs(host))
    }
}
