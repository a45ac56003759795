//! # Domain Value Objects
//!
//! Immutable value types shared by every marketplace component: account
//! identities, job identifiers, balances, lifecycle states and roles.

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Amount of native value (smallest denomination).
pub type Balance = primitive_types::U256;

/// Identity of an account, as asserted by the host environment.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap a host-supplied account name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the account name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty identity never refers to a real account.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Sequential job identifier.
///
/// Serialized as its decimal string so it can key the persisted ledger.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct JobId(u64);

impl JobId {
    /// Id handed to the first submitted job.
    pub const FIRST: JobId = JobId(1);

    /// Create an id from its numeric value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one, `None` at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<u64> for JobId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Job lifecycle state machine.
///
/// ```text
/// PendingValidation ──valid──▶ Waiting ──result──▶ ValidatingResult ──valid──▶ Executed
///        │                        ▲                        │
///        └──invalid──▶ Invalid    └────────invalid─────────┘
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    /// Submitted and funded, awaiting a verifier's verdict on the request.
    #[default]
    PendingValidation,
    /// Approved, open for a sampler to post a result.
    Waiting,
    /// A sampler posted a result and collateral, awaiting a verdict.
    ValidatingResult,
    /// Result accepted, reward paid out.
    Executed,
    /// Request rejected, reward refunded.
    Invalid,
}

impl JobStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [JobStatus; 5] = [
        JobStatus::PendingValidation,
        JobStatus::Waiting,
        JobStatus::ValidatingResult,
        JobStatus::Executed,
        JobStatus::Invalid,
    ];

    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::PendingValidation, Self::Waiting)
                | (Self::PendingValidation, Self::Invalid)
                | (Self::Waiting, Self::ValidatingResult)
                | (Self::ValidatingResult, Self::Executed)
                | (Self::ValidatingResult, Self::Waiting)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Invalid)
    }

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingValidation => "pending-validation",
            Self::Waiting => "waiting",
            Self::ValidatingResult => "validating-result",
            Self::Executed => "executed",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a caller must hold (or must not hold) for an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// The contract owner.
    Owner,
    /// A member of the verifier set.
    Verifier,
    /// The account that submitted a given job.
    JobOwner,
    /// The verifier bound to a given job.
    JobVerifier,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Owner => "contract owner",
            Self::Verifier => "verifier",
            Self::JobOwner => "job owner",
            Self::JobVerifier => "job verifier",
        })
    }
}
