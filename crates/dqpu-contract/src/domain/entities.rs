//! # Domain Entities
//!
//! The job record, the request that creates it, and the per-status counters.

use super::errors::ContractError;
use super::value_objects::{AccountId, Balance, JobId, JobStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sizing and payload of a job, as submitted by its owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Number of qubits.
    pub qubits: u32,
    /// Circuit depth.
    pub depth: u32,
    /// Number of shots.
    pub shots: u32,
    /// Content reference of the job payload.
    pub job_file: String,
}

impl JobRequest {
    /// Create a request.
    pub fn new(qubits: u32, depth: u32, shots: u32, job_file: impl Into<String>) -> Self {
        Self {
            qubits,
            depth,
            shots,
            job_file: job_file.into(),
        }
    }
}

/// A job tracked by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Sequential identifier.
    pub id: JobId,
    /// Account that submitted and funded the job.
    pub owner_id: AccountId,
    /// Reward escrowed at submission.
    pub reward_amount: Balance,
    /// Collateral escrowed by the bound sampler, zero when none.
    pub sampler_deposit: Balance,
    /// Lifecycle status.
    pub status: JobStatus,

    /// Number of qubits.
    pub qubits: u32,
    /// Circuit depth.
    pub depth: u32,
    /// Number of shots.
    pub shots: u32,

    /// Job payload; may be rewritten once when a verifier approves the job.
    pub job_file: String,
    /// Result posted by the sampler.
    #[serde(default)]
    pub result_file: Option<String>,
    /// Verification artifact, set when a result is accepted.
    #[serde(default)]
    pub trap_file: Option<String>,

    /// Verifier that adjudicated the request.
    #[serde(default)]
    pub verifier_id: Option<AccountId>,
    /// Sampler currently bound to the job.
    #[serde(default)]
    pub sampler_id: Option<AccountId>,
}

impl Job {
    /// Create a freshly submitted job.
    pub fn new(id: JobId, owner_id: AccountId, reward_amount: Balance, request: JobRequest) -> Self {
        Self {
            id,
            owner_id,
            reward_amount,
            sampler_deposit: Balance::zero(),
            status: JobStatus::PendingValidation,
            qubits: request.qubits,
            depth: request.depth,
            shots: request.shots,
            job_file: request.job_file,
            result_file: None,
            trap_file: None,
            verifier_id: None,
            sampler_id: None,
        }
    }

    /// Fail unless the job is in one of `expected`.
    pub fn ensure_status(&self, expected: &'static [JobStatus]) -> Result<(), ContractError> {
        if expected.contains(&self.status) {
            Ok(())
        } else {
            Err(ContractError::InvalidState {
                id: self.id,
                expected,
                actual: self.status,
            })
        }
    }

    /// Move to `next`, returning the previous status.
    pub fn transition_to(&mut self, next: JobStatus) -> Result<JobStatus, ContractError> {
        if !self.status.can_transition_to(next) {
            return Err(ContractError::InvalidState {
                id: self.id,
                expected: predecessors(next),
                actual: self.status,
            });
        }
        let previous = self.status;
        self.status = next;
        Ok(previous)
    }

    /// Reward still held in escrow for this job.
    ///
    /// Zero once the reward was paid (`Executed`) or refunded (`Invalid`).
    pub fn outstanding_reward(&self) -> Balance {
        if self.status.is_terminal() {
            Balance::zero()
        } else {
            self.reward_amount
        }
    }

    /// Sampler collateral still held in escrow for this job.
    pub fn outstanding_deposit(&self) -> Balance {
        if self.status == JobStatus::ValidatingResult {
            self.sampler_deposit
        } else {
            Balance::zero()
        }
    }

    /// Check whether `account` owns this job.
    pub fn is_owned_by(&self, account: &AccountId) -> bool {
        &self.owner_id == account
    }

    /// Bind a sampler and its collateral.
    pub(crate) fn attach_result(
        &mut self,
        sampler: AccountId,
        deposit: Balance,
        result_file: String,
    ) -> Result<JobStatus, ContractError> {
        let previous = self.transition_to(JobStatus::ValidatingResult)?;
        self.sampler_id = Some(sampler);
        self.sampler_deposit = deposit;
        self.result_file = Some(result_file);
        Ok(previous)
    }

    /// Unbind the sampler after a rejected result, returning its forfeited deposit.
    pub(crate) fn detach_sampler(&mut self) -> Result<(JobStatus, Balance), ContractError> {
        let previous = self.transition_to(JobStatus::Waiting)?;
        self.sampler_id = None;
        let forfeited = std::mem::take(&mut self.sampler_deposit);
        Ok((previous, forfeited))
    }
}

/// Statuses from which `next` is reachable.
fn predecessors(next: JobStatus) -> &'static [JobStatus] {
    match next {
        JobStatus::Waiting => &[JobStatus::PendingValidation, JobStatus::ValidatingResult],
        JobStatus::Invalid => &[JobStatus::PendingValidation],
        JobStatus::ValidatingResult => &[JobStatus::Waiting],
        JobStatus::Executed => &[JobStatus::ValidatingResult],
        JobStatus::PendingValidation => &[],
    }
}

/// Per-status job counts.
///
/// Every status is always present, zero-filled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobStats(BTreeMap<JobStatus, u64>);

impl Default for JobStats {
    fn default() -> Self {
        Self(JobStatus::ALL.iter().map(|status| (*status, 0)).collect())
    }
}

impl JobStats {
    /// Count for one status.
    pub fn get(&self, status: JobStatus) -> u64 {
        self.0.get(&status).copied().unwrap_or(0)
    }

    /// Sum over all statuses.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Iterate `(status, count)` in lifecycle order.
    pub fn iter(&self) -> impl Iterator<Item = (JobStatus, u64)> + '_ {
        self.0.iter().map(|(status, count)| (*status, *count))
    }

    /// Recount from a set of jobs.
    pub fn from_jobs<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Self {
        let mut stats = Self::default();
        for job in jobs {
            *stats.0.entry(job.status).or_insert(0) += 1;
        }
        stats
    }

    pub(crate) fn increment(&mut self, status: JobStatus) {
        *self.0.entry(status).or_insert(0) += 1;
    }

    pub(crate) fn decrement(&mut self, status: JobStatus) {
        let count = self.0.entry(status).or_insert(0);
        *count = count.saturating_sub(1);
    }
}
