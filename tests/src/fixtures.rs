//! # Test Fixtures
//!
//! A [`Harness`] pairs a [`JobMarket`] with an [`InMemoryHost`] and runs
//! every call as one host invocation, so failed calls roll back exactly as
//! they would on a real host.

use dqpu_contract::prelude::*;
use dqpu_contract::{JobStats, StateSnapshot};
use dqpu_telemetry::{init_tracing, TelemetryConfig};
use std::sync::Once;

/// Contract owner in every harness.
pub const OWNER: &str = "owner";

/// A verifier added by [`Harness::with_verifier`].
pub const VERIFIER: &str = "victor";

/// Standard job reward.
pub const REWARD: u64 = 1_000;

/// Minimum collateral for [`REWARD`].
pub const COLLATERAL: u64 = REWARD / 10;

static TRACING: Once = Once::new();

/// Install an error-level subscriber once per test binary.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let config = TelemetryConfig::default().with_log_level("error");
        // a subscriber installed elsewhere in the process is fine
        let _ = init_tracing(&config);
    });
}

/// Shorthand for an account id.
pub fn account(name: &str) -> AccountId {
    AccountId::new(name)
}

/// Shorthand for a balance.
pub fn amount(value: u64) -> Balance {
    Balance::from(value)
}

/// Standard job request.
pub fn request() -> JobRequest {
    JobRequest::new(4, 12, 512, "QmJobCircuit")
}

/// Market plus host.
pub struct Harness {
    /// Market under test.
    pub market: JobMarket,
    /// Host recording transfers and events.
    pub host: InMemoryHost,
}

impl Harness {
    /// Fresh market owned by [`OWNER`].
    pub fn new() -> Self {
        init_test_tracing();
        Self {
            market: JobMarket::new(account(OWNER)),
            host: InMemoryHost::new(OWNER),
        }
    }

    /// Fresh market with [`VERIFIER`] in the verifier set.
    pub fn with_verifier() -> Self {
        let mut harness = Self::new();
        harness
            .call(OWNER, 0, |market, host| {
                market.add_verifier(host, account(VERIFIER))
            })
            .expect("owner adds verifier");
        harness
    }

    /// Run one invocation as `caller` with `deposit` attached.
    pub fn call<T>(
        &mut self,
        caller: &str,
        deposit: u64,
        f: impl FnOnce(&mut JobMarket, &mut dyn Host) -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        let Self { market, host } = self;
        host.invoke(&account(caller), amount(deposit), |host| f(market, host))
    }

    /// Submit the standard request.
    pub fn submit(&mut self, owner: &str, reward: u64) -> Result<JobId, ContractError> {
        self.call(owner, reward, |market, host| market.submit_job(host, request()))
    }

    /// Rule on a pending job.
    pub fn validate_job(
        &mut self,
        verifier: &str,
        id: JobId,
        valid: bool,
    ) -> Result<JobStatus, ContractError> {
        self.call(verifier, 0, |market, host| {
            market.set_job_validity(host, id, valid, None)
        })
    }

    /// Post a result with `deposit` collateral.
    pub fn submit_result(
        &mut self,
        sampler: &str,
        id: JobId,
        deposit: u64,
    ) -> Result<(), ContractError> {
        self.call(sampler, deposit, |market, host| {
            market.submit_job_result(host, id, "QmResultSamples".into())
        })
    }

    /// Rule on a posted result; approvals carry a trap file.
    pub fn validate_result(
        &mut self,
        verifier: &str,
        id: JobId,
        valid: bool,
    ) -> Result<JobStatus, ContractError> {
        let trap = valid.then(|| "QmTrapFile".to_string());
        self.call(verifier, 0, |market, host| {
            market.set_result_validity(host, id, valid, trap)
        })
    }

    /// Remove a job.
    pub fn remove(&mut self, caller: &str, id: JobId) -> Result<Balance, ContractError> {
        self.call(caller, 0, |market, host| market.remove_job(host, id))
    }

    /// Submit and approve a job, leaving it `Waiting`.
    pub fn waiting_job(&mut self, owner: &str) -> JobId {
        let id = self.submit(owner, REWARD).expect("submit");
        self.validate_job(VERIFIER, id, true).expect("approve job");
        id
    }

    /// Drive a job to `ValidatingResult` with `sampler` bound.
    pub fn job_with_result(&mut self, owner: &str, sampler: &str) -> JobId {
        let id = self.waiting_job(owner);
        self.submit_result(sampler, id, COLLATERAL)
            .expect("submit result");
        id
    }

    /// Total transferred to `name`.
    pub fn received(&self, name: &str) -> Balance {
        self.host.received(&account(name))
    }

    /// Status of job `id`.
    pub fn status(&self, id: JobId) -> JobStatus {
        self.market.get_job_status(id).expect("job exists")
    }

    /// Current state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.market.snapshot()
    }

    /// Per-status counts.
    pub fn stats(&self) -> JobStats {
        self.market.get_jobs_stats()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
