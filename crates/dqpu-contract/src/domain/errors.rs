//! # Domain Errors
//!
//! Every failure is detected before any mutation, so an error always means
//! the invocation changed nothing.

use super::value_objects::{AccountId, Balance, JobId, JobStatus, Role};
use thiserror::Error;

/// Errors returned by marketplace operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Caller lacks the required role.
    #[error("Unauthorized: {caller} is not the {required}")]
    Unauthorized {
        /// Identity that attempted the call.
        caller: AccountId,
        /// Role the operation requires.
        required: Role,
    },

    /// The job is not in a status the operation accepts.
    #[error("Invalid state for job {id}: {actual} (expected one of {expected:?})")]
    InvalidState {
        /// Job the operation targeted.
        id: JobId,
        /// Statuses the operation accepts.
        expected: &'static [JobStatus],
        /// Status the job is actually in.
        actual: JobStatus,
    },

    /// Arguments or attached funds were rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Unknown job id.
    #[error("Job not found: {0}")]
    NotFound(JobId),

    /// The id counter cannot issue another id.
    #[error("Job id space exhausted at {0}")]
    IdSpaceExhausted(JobId),
}

impl ContractError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::InvalidState { .. } => "invalid_state",
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::IdSpaceExhausted(_) => "id_space_exhausted",
        }
    }
}

/// Reasons an input is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A job must be funded with a positive reward.
    #[error("reward must be positive")]
    ZeroReward,

    /// A required text field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Sampler collateral below the required share of the reward.
    #[error("insufficient collateral: required {required}, provided {provided}")]
    InsufficientCollateral {
        /// Minimum deposit.
        required: Balance,
        /// Deposit attached to the call.
        provided: Balance,
    },

    /// The contract owner keeps its verifier seat.
    #[error("the contract owner cannot leave the verifier set")]
    OwnerSeat,

    /// The caller already holds a conflicting role on the job.
    #[error("caller is the {role} of this job")]
    SelfDealing {
        /// Role that collides with the sampler role.
        role: Role,
    },
}
