//! # Job Ledger
//!
//! Owns every job record and the id counter, and drives the job state
//! machine:
//!
//! ```text
//! PendingValidation --valid--> Waiting --result--> ValidatingResult --valid--> Executed
//!        |                        ^                        |
//!        +--invalid--> Invalid    +--------invalid---------+
//! ```
//!
//! Each operation runs its guards first and mutates only once all of them
//! pass, so a rejected call leaves the ledger, the counters and the host
//! untouched.

use super::access_control::AccessControl;
use super::escrow::EscrowAccounting;
use super::stats::StatsAggregator;
use crate::domain::{
    invariant_distinct_roles, invariant_non_empty, invariant_positive_reward,
    invariant_sufficient_collateral, invariant_valid_request, AccountId, Balance, ContractError,
    InputError, Job, JobId, JobRequest, JobStatus, Role,
};
use crate::events::MarketEvent;
use crate::ports::outbound::Host;
use std::collections::BTreeMap;
use tracing::info;

/// Statuses in which the job owner may withdraw a job.
const OWNER_REMOVABLE: &[JobStatus] = &[JobStatus::PendingValidation, JobStatus::Waiting];

/// Collaborators a ledger operation touches besides the ledger itself.
pub struct LedgerContext<'a> {
    /// Owner and verifier set.
    pub access: &'a AccessControl,
    /// Transfer issuer and processed-funds counter.
    pub escrow: &'a mut EscrowAccounting,
    /// Per-status counters.
    pub stats: &'a mut StatsAggregator,
    /// The invocation's host.
    pub host: &'a mut dyn Host,
}

/// Job records keyed by id, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobLedger {
    jobs: BTreeMap<JobId, Job>,
    next_id: JobId,
    collateral_divisor: u64,
}

impl JobLedger {
    /// Create an empty ledger whose first job gets id 1.
    pub fn new(collateral_divisor: u64) -> Self {
        Self {
            jobs: BTreeMap::new(),
            next_id: JobId::FIRST,
            collateral_divisor,
        }
    }

    /// Rebuild from persisted parts.
    pub(crate) fn from_parts(
        jobs: BTreeMap<JobId, Job>,
        next_id: JobId,
        collateral_divisor: u64,
    ) -> Self {
        Self {
            jobs,
            next_id,
            collateral_divisor,
        }
    }

    /// Id the next submitted job will receive.
    pub fn next_id(&self) -> JobId {
        self.next_id
    }

    /// Look up a job.
    pub fn get(&self, id: JobId) -> Result<&Job, ContractError> {
        self.jobs.get(&id).ok_or(ContractError::NotFound(id))
    }

    /// Number of stored jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Check if the ledger holds no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Stored jobs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub(crate) fn entries(&self) -> &BTreeMap<JobId, Job> {
        &self.jobs
    }

    /// Accept a new job funded by the attached deposit.
    pub fn submit_job(
        &mut self,
        ctx: LedgerContext<'_>,
        request: JobRequest,
    ) -> Result<JobId, ContractError> {
        let owner = ctx.host.caller().clone();
        let reward = ctx.host.attached_deposit();
        invariant_positive_reward(reward)?;
        invariant_valid_request(&request)?;

        let id = self.next_id;
        let next_id = id.next().ok_or(ContractError::IdSpaceExhausted(id))?;

        self.next_id = next_id;
        let job = Job::new(id, owner.clone(), reward, request);
        ctx.stats.record_created(job.status);
        self.jobs.insert(id, job);
        ctx.escrow.record_processed(reward);

        info!(job_id = %id, owner = %owner, reward = %reward, "Job submitted");
        ctx.host.emit(MarketEvent::JobSubmitted { id, owner, reward });
        Ok(id)
    }

    /// Verifier ruling on a pending job.
    ///
    /// Approval moves the job to `Waiting` and, when `trapped_file` is given,
    /// replaces its payload. Rejection makes it `Invalid` and refunds the
    /// reward to its owner.
    pub fn set_job_validity(
        &mut self,
        ctx: LedgerContext<'_>,
        id: JobId,
        valid: bool,
        trapped_file: Option<String>,
    ) -> Result<JobStatus, ContractError> {
        let verifier = ctx.host.caller().clone();
        ctx.access.ensure_verifier(&verifier)?;
        let job = self.jobs.get_mut(&id).ok_or(ContractError::NotFound(id))?;
        job.ensure_status(&[JobStatus::PendingValidation])?;
        if let Some(file) = &trapped_file {
            invariant_non_empty("trapped_file", file)?;
        }

        let next = if valid {
            JobStatus::Waiting
        } else {
            JobStatus::Invalid
        };
        let previous = job.transition_to(next)?;
        job.verifier_id = Some(verifier.clone());
        if valid {
            if let Some(file) = trapped_file {
                job.job_file = file;
            }
        } else {
            ctx.escrow
                .transfer(ctx.host, &job.owner_id, job.reward_amount);
        }
        ctx.stats.record_transition(previous, next);

        info!(
            job_id = %id,
            verifier = %verifier,
            from = %previous,
            to = %next,
            "Job validated"
        );
        ctx.host.emit(MarketEvent::JobValidated {
            id,
            verifier,
            status: next,
        });
        Ok(next)
    }

    /// Bind the caller as sampler of a waiting job, escrowing its collateral.
    pub fn submit_job_result(
        &mut self,
        ctx: LedgerContext<'_>,
        id: JobId,
        result_file: String,
    ) -> Result<(), ContractError> {
        let sampler = ctx.host.caller().clone();
        let deposit = ctx.host.attached_deposit();
        let job = self.jobs.get_mut(&id).ok_or(ContractError::NotFound(id))?;
        job.ensure_status(&[JobStatus::Waiting])?;
        invariant_distinct_roles(job, &sampler)?;
        invariant_non_empty("result_file", &result_file)?;
        invariant_sufficient_collateral(job.reward_amount, deposit, self.collateral_divisor)?;

        let previous = job.attach_result(sampler.clone(), deposit, result_file)?;
        ctx.stats
            .record_transition(previous, JobStatus::ValidatingResult);
        ctx.escrow.record_processed(deposit);

        info!(job_id = %id, sampler = %sampler, deposit = %deposit, "Result submitted");
        ctx.host.emit(MarketEvent::ResultSubmitted {
            id,
            sampler,
            deposit,
        });
        Ok(())
    }

    /// Verifier ruling on a posted result.
    ///
    /// Approval requires a non-empty `trap_file`, makes the job `Executed`,
    /// pays the collateral to the job's verifier and the reward to the
    /// sampler. Rejection sends the job back to `Waiting` and forfeits the
    /// collateral to the rejecting verifier.
    pub fn set_result_validity(
        &mut self,
        ctx: LedgerContext<'_>,
        id: JobId,
        valid: bool,
        trap_file: Option<String>,
    ) -> Result<JobStatus, ContractError> {
        let verifier = ctx.host.caller().clone();
        ctx.access.ensure_verifier(&verifier)?;
        let job = self.jobs.get_mut(&id).ok_or(ContractError::NotFound(id))?;
        job.ensure_status(&[JobStatus::ValidatingResult])?;
        let sampler = job.sampler_id.clone().ok_or(ContractError::InvalidState {
            id,
            expected: &[JobStatus::ValidatingResult],
            actual: job.status,
        })?;
        let trap_file = if valid {
            let file = trap_file.ok_or(InputError::EmptyField("trap_file"))?;
            invariant_non_empty("trap_file", &file)?;
            Some(file)
        } else {
            None
        };

        let (previous, next) = match trap_file {
            Some(file) => {
                let previous = job.transition_to(JobStatus::Executed)?;
                job.trap_file = Some(file);
                // a job whose approving verifier is unknown pays the approver of the result
                let job_verifier = job.verifier_id.clone().unwrap_or_else(|| verifier.clone());
                ctx.escrow
                    .transfer(ctx.host, &job_verifier, job.sampler_deposit);
                ctx.escrow.transfer(ctx.host, &sampler, job.reward_amount);
                (previous, JobStatus::Executed)
            }
            None => {
                let (previous, forfeited) = job.detach_sampler()?;
                ctx.escrow.transfer(ctx.host, &verifier, forfeited);
                (previous, JobStatus::Waiting)
            }
        };
        ctx.stats.record_transition(previous, next);

        info!(
            job_id = %id,
            verifier = %verifier,
            sampler = %sampler,
            to = %next,
            "Result validated"
        );
        ctx.host.emit(MarketEvent::ResultValidated {
            id,
            verifier,
            status: next,
        });
        Ok(next)
    }

    /// Remove a job and refund whatever it still holds in escrow.
    ///
    /// The job owner may withdraw while the job is `PendingValidation` or
    /// `Waiting`; the contract owner may remove in any status. A bound
    /// sampler gets its collateral back. Returns the reward refunded to the
    /// job owner.
    pub fn remove_job(&mut self, ctx: LedgerContext<'_>, id: JobId) -> Result<Balance, ContractError> {
        let caller = ctx.host.caller().clone();
        let job = self.jobs.get(&id).ok_or(ContractError::NotFound(id))?;
        let by_contract_owner = ctx.access.is_owner(&caller);
        if !by_contract_owner && !job.is_owned_by(&caller) {
            return Err(ContractError::Unauthorized {
                caller,
                required: Role::JobOwner,
            });
        }
        if !by_contract_owner {
            job.ensure_status(OWNER_REMOVABLE)?;
        }

        let job = match self.jobs.remove(&id) {
            Some(job) => job,
            None => return Err(ContractError::NotFound(id)),
        };
        let refunded = job.outstanding_reward();
        ctx.escrow.transfer(ctx.host, &job.owner_id, refunded);
        if let Some(sampler) = &job.sampler_id {
            ctx.escrow
                .transfer(ctx.host, sampler, job.outstanding_deposit());
        }
        ctx.stats.record_removed(job.status);

        info!(
            job_id = %id,
            by = %caller,
            status = %job.status,
            refunded = %refunded,
            "Job removed"
        );
        ctx.host.emit(MarketEvent::JobRemoved {
            id,
            by: caller,
            refunded,
        });
        Ok(refunded)
    }

    /// Drop every job. The id counter keeps running. Returns the number removed.
    pub fn clear(&mut self) -> u64 {
        let count = self.jobs.len() as u64;
        self.jobs.clear();
        count
    }
}
