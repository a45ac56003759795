//! # Lifecycle Events
//!
//! One event per successful mutating operation, handed to the host's
//! [`EventSink`](crate::ports::outbound::EventSink). Events of a failed
//! invocation are discarded together with its other effects.
//!
//! ## Log format
//!
//! ```text
//! EVENT_JSON:{"standard":"dqpu","version":"1.0.0","event":"job_submitted","data":{...}}
//! ```

use crate::domain::{AccountId, Balance, JobId, JobStatus};
use serde::{Deserialize, Serialize};

/// Event standard name.
pub const EVENT_STANDARD: &str = "dqpu";

/// Event standard version.
pub const EVENT_VERSION: &str = "1.0.0";

/// Prefix of a serialized event log line.
pub const EVENT_LOG_PREFIX: &str = "EVENT_JSON:";

/// Marketplace events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum MarketEvent {
    /// A job was submitted and its reward escrowed.
    JobSubmitted {
        /// New job id.
        id: JobId,
        /// Submitting account.
        owner: AccountId,
        /// Escrowed reward.
        reward: Balance,
    },
    /// A verifier ruled on a pending job.
    JobValidated {
        /// Job id.
        id: JobId,
        /// Ruling verifier.
        verifier: AccountId,
        /// Status after the ruling.
        status: JobStatus,
    },
    /// A sampler posted a result with collateral.
    ResultSubmitted {
        /// Job id.
        id: JobId,
        /// Posting sampler.
        sampler: AccountId,
        /// Escrowed collateral.
        deposit: Balance,
    },
    /// A verifier ruled on a posted result.
    ResultValidated {
        /// Job id.
        id: JobId,
        /// Ruling verifier.
        verifier: AccountId,
        /// Status after the ruling.
        status: JobStatus,
    },
    /// A job was removed from the ledger.
    JobRemoved {
        /// Job id.
        id: JobId,
        /// Removing account.
        by: AccountId,
        /// Reward refunded to the job owner.
        refunded: Balance,
    },
    /// The whole ledger was wiped.
    JobsCleared {
        /// Number of jobs removed.
        count: u64,
    },
    /// An account joined the verifier set.
    VerifierAdded {
        /// Added account.
        account: AccountId,
    },
    /// An account left the verifier set.
    VerifierRemoved {
        /// Removed account.
        account: AccountId,
    },
    /// Contract ownership moved.
    OwnerChanged {
        /// Previous owner.
        previous: AccountId,
        /// New owner.
        owner: AccountId,
    },
}

#[derive(Serialize)]
struct Envelope<'a> {
    standard: &'static str,
    version: &'static str,
    #[serde(flatten)]
    event: &'a MarketEvent,
}

impl MarketEvent {
    /// Event name as it appears in the log line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JobSubmitted { .. } => "job_submitted",
            Self::JobValidated { .. } => "job_validated",
            Self::ResultSubmitted { .. } => "result_submitted",
            Self::ResultValidated { .. } => "result_validated",
            Self::JobRemoved { .. } => "job_removed",
            Self::JobsCleared { .. } => "jobs_cleared",
            Self::VerifierAdded { .. } => "verifier_added",
            Self::VerifierRemoved { .. } => "verifier_removed",
            Self::OwnerChanged { .. } => "owner_changed",
        }
    }

    /// Job the event concerns, if any.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            Self::JobSubmitted { id, .. }
            | Self::JobValidated { id, .. }
            | Self::ResultSubmitted { id, .. }
            | Self::ResultValidated { id, .. }
            | Self::JobRemoved { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Render the event as a host log line.
    pub fn to_log_line(&self) -> Result<String, serde_json::Error> {
        let envelope = Envelope {
            standard: EVENT_STANDARD,
            version: EVENT_VERSION,
            event: self,
        };
        Ok(format!(
            "{EVENT_LOG_PREFIX}{}",
            serde_json::to_string(&envelope)?
        ))
    }
}
