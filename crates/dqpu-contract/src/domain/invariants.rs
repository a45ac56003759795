//! # Domain Invariants
//!
//! Business rules of the marketplace.
//!
//! Input rules are checked on every call before any mutation. Ledger-wide
//! rules (stats mirror, id counter) are checked when restoring a snapshot
//! and by the property tests after every operation.

use super::entities::{Job, JobRequest, JobStats};
use super::errors::InputError;
use super::value_objects::{AccountId, Balance, JobId, JobStatus, Role};
use thiserror::Error;

/// Default ratio between a job's reward and the minimum sampler collateral.
pub const DEFAULT_COLLATERAL_DIVISOR: u64 = 10;

/// Ledger-wide invariant violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A status counter disagrees with the ledger.
    #[error("stats mismatch for {status}: recorded {recorded}, ledger has {actual}")]
    StatsMismatch {
        /// Status whose counter is wrong.
        status: JobStatus,
        /// Counter value.
        recorded: u64,
        /// Jobs actually in that status.
        actual: u64,
    },

    /// A job id was not issued by the counter.
    #[error("job {id} is not below the next id {next_id}")]
    IdBeyondCounter {
        /// Offending id.
        id: JobId,
        /// Next id the counter will issue.
        next_id: JobId,
    },

    /// A job is keyed under a different id than it carries.
    #[error("job stored under {key} carries id {id}")]
    KeyMismatch {
        /// Ledger key.
        key: JobId,
        /// Id in the record.
        id: JobId,
    },

    /// The id counter is below the first issuable id.
    #[error("next id {0} is below the first job id")]
    CounterBelowFirst(JobId),

    /// A job awaiting result validation has no sampler bound.
    #[error("job {0} is validating a result without a sampler")]
    UnboundSampler(JobId),

    /// A job that accepts no result still holds a sampler or its collateral.
    #[error("job {0} holds a sampler outside result validation")]
    StaleSampler(JobId),

    /// A job's sampler is also its owner or its verifier.
    #[error("sampler of job {id} is also its {role}")]
    SamplerRoleConflict {
        /// Offending job.
        id: JobId,
        /// Role the sampler collides with.
        role: Role,
    },

    /// The contract owner is missing.
    #[error("owner identity is empty")]
    MissingOwner,
}

/// Invariant: a job is funded with a positive reward.
pub fn invariant_positive_reward(reward: Balance) -> Result<(), InputError> {
    if reward.is_zero() {
        return Err(InputError::ZeroReward);
    }
    Ok(())
}

/// Invariant: required text fields are present.
pub fn invariant_non_empty(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.is_empty() {
        return Err(InputError::EmptyField(field));
    }
    Ok(())
}

/// Invariant: a job request carries a payload reference.
pub fn invariant_valid_request(request: &JobRequest) -> Result<(), InputError> {
    invariant_non_empty("job_file", &request.job_file)
}

/// Minimum collateral a sampler must post for `reward`.
pub fn required_collateral(reward: Balance, divisor: u64) -> Balance {
    reward / Balance::from(divisor.max(1))
}

/// Invariant: sampler collateral covers `reward / divisor`.
pub fn invariant_sufficient_collateral(
    reward: Balance,
    deposit: Balance,
    divisor: u64,
) -> Result<(), InputError> {
    let required = required_collateral(reward, divisor);
    if deposit < required {
        return Err(InputError::InsufficientCollateral {
            required,
            provided: deposit,
        });
    }
    Ok(())
}

/// Invariant: the sampler is neither the job's owner nor its verifier.
pub fn invariant_distinct_roles(job: &Job, sampler: &AccountId) -> Result<(), InputError> {
    if job.is_owned_by(sampler) {
        return Err(InputError::SelfDealing {
            role: Role::JobOwner,
        });
    }
    if job.verifier_id.as_ref() == Some(sampler) {
        return Err(InputError::SelfDealing {
            role: Role::JobVerifier,
        });
    }
    Ok(())
}

/// Invariant: `stats[s]` equals the number of jobs in status `s`, for every `s`.
pub fn invariant_stats_mirror<'a>(
    jobs: impl IntoIterator<Item = &'a Job>,
    stats: &JobStats,
) -> Result<(), InvariantViolation> {
    let actual = JobStats::from_jobs(jobs);
    for status in JobStatus::ALL {
        if stats.get(status) != actual.get(status) {
            return Err(InvariantViolation::StatsMismatch {
                status,
                recorded: stats.get(status),
                actual: actual.get(status),
            });
        }
    }
    Ok(())
}

/// Invariant: every stored id was issued by the counter and keys its own record.
pub fn invariant_ids_issued<'a>(
    jobs: impl IntoIterator<Item = (&'a JobId, &'a Job)>,
    next_id: JobId,
) -> Result<(), InvariantViolation> {
    if next_id < JobId::FIRST {
        return Err(InvariantViolation::CounterBelowFirst(next_id));
    }
    for (key, job) in jobs {
        if *key != job.id {
            return Err(InvariantViolation::KeyMismatch {
                key: *key,
                id: job.id,
            });
        }
        if job.id >= next_id {
            return Err(InvariantViolation::IdBeyondCounter {
                id: job.id,
                next_id,
            });
        }
    }
    Ok(())
}

/// Invariant: a sampler is bound while a result awaits validation, stays bound
/// once the job is executed, holds nothing before a result is posted, and never
/// doubles as the job's owner or verifier.
pub fn invariant_sampler_bound<'a>(
    jobs: impl IntoIterator<Item = &'a Job>,
) -> Result<(), InvariantViolation> {
    for job in jobs {
        match job.status {
            JobStatus::ValidatingResult if job.sampler_id.is_none() => {
                return Err(InvariantViolation::UnboundSampler(job.id));
            }
            JobStatus::PendingValidation | JobStatus::Waiting | JobStatus::Invalid
                if job.sampler_id.is_some() || !job.sampler_deposit.is_zero() =>
            {
                return Err(InvariantViolation::StaleSampler(job.id));
            }
            _ => {}
        }
        if let Some(sampler) = &job.sampler_id {
            if let Err(InputError::SelfDealing { role }) = invariant_distinct_roles(job, sampler) {
                return Err(InvariantViolation::SamplerRoleConflict { id: job.id, role });
            }
        }
    }
    Ok(())
}
