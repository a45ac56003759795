//! # State Snapshots
//!
//! Persisted layout of the marketplace: owner, verifier set, job map keyed
//! by stringified id, id counter, processed-funds counter and per-status
//! counts.
//!
//! Binary format: \[MAGIC (8)\]\[VERSION (u32 LE)\]\[bincode payload\]
//!
//! A snapshot is re-checked against the ledger invariants before it is
//! accepted, so a restored market is always consistent.

use crate::config::{ConfigError, MarketConfig};
use crate::domain::{
    invariant_ids_issued, invariant_sampler_bound, invariant_stats_mirror, AccountId, Balance,
    InvariantViolation, Job, JobId, JobStats,
};
use crate::market::{AccessControl, EscrowAccounting, JobLedger, JobMarket, StatsAggregator};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::info;

/// Magic bytes at the start of every encoded snapshot.
const SNAPSHOT_MAGIC: &[u8; 8] = b"DQPUSNAP";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + 4;

/// Errors while encoding, decoding or restoring a snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Data shorter than the header.
    #[error("snapshot truncated: {len} bytes")]
    Truncated {
        /// Bytes available.
        len: usize,
    },

    /// Header does not start with the snapshot magic.
    #[error("invalid snapshot magic")]
    BadMagic,

    /// Snapshot written by an unknown format version.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    /// Payload could not be encoded or decoded.
    #[error("snapshot codec error: {0}")]
    Codec(String),

    /// Snapshot contents break a ledger invariant.
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(#[from] InvariantViolation),

    /// Configuration supplied for the restore is unusable.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Complete marketplace state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Contract owner.
    pub owner: AccountId,
    /// Verifier set.
    pub verifiers: BTreeSet<AccountId>,
    /// Jobs keyed by id.
    pub jobs: BTreeMap<JobId, Job>,
    /// Id the next job will receive.
    pub next_id: JobId,
    /// Cumulative funds accepted into escrow.
    pub money_handled: Balance,
    /// Per-status counts.
    pub stats: JobStats,
}

impl StateSnapshot {
    /// Check the ledger-wide invariants.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        if self.owner.is_empty() {
            return Err(InvariantViolation::MissingOwner);
        }
        invariant_ids_issued(&self.jobs, self.next_id)?;
        invariant_stats_mirror(self.jobs.values(), &self.stats)?;
        invariant_sampler_bound(self.jobs.values())?;
        Ok(())
    }

    /// Encode with the snapshot header.
    pub fn encode(&self) -> Result<Vec<u8>, PersistenceError> {
        let payload =
            bincode::serialize(self).map_err(|e| PersistenceError::Codec(e.to_string()))?;
        let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
        buf.extend_from_slice(SNAPSHOT_MAGIC);
        buf.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Decode bytes produced by [`StateSnapshot::encode`].
    pub fn decode(data: &[u8]) -> Result<Self, PersistenceError> {
        if data.len() < HEADER_LEN {
            return Err(PersistenceError::Truncated { len: data.len() });
        }
        let (magic, rest) = data.split_at(SNAPSHOT_MAGIC.len());
        if magic != SNAPSHOT_MAGIC {
            return Err(PersistenceError::BadMagic);
        }
        let (version, payload) = rest.split_at(4);
        let mut version_bytes = [0u8; 4];
        version_bytes.copy_from_slice(version);
        let version = u32::from_le_bytes(version_bytes);
        if version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(version));
        }
        bincode::deserialize(payload).map_err(|e| PersistenceError::Codec(e.to_string()))
    }

    /// Pretty JSON export.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(|e| PersistenceError::Codec(e.to_string()))
    }

    /// Parse a JSON export.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(json).map_err(|e| PersistenceError::Codec(e.to_string()))
    }
}

impl JobMarket {
    /// Capture the complete state.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            owner: self.access.owner().clone(),
            verifiers: self.access.verifiers().cloned().collect(),
            jobs: self.ledger.entries().clone(),
            next_id: self.ledger.next_id(),
            money_handled: self.escrow.money_handled(),
            stats: self.stats.counts().clone(),
        }
    }

    /// Rebuild a market from a snapshot, after checking its invariants.
    pub fn restore(snapshot: StateSnapshot, config: MarketConfig) -> Result<Self, PersistenceError> {
        config.validate()?;
        snapshot.verify()?;
        info!(
            owner = %snapshot.owner,
            jobs = snapshot.jobs.len(),
            next_id = %snapshot.next_id,
            "Restoring job market"
        );
        Ok(Self {
            access: AccessControl::from_parts(snapshot.owner, snapshot.verifiers),
            escrow: EscrowAccounting::with_handled(snapshot.money_handled),
            ledger: JobLedger::from_parts(
                snapshot.jobs,
                snapshot.next_id,
                config.collateral_divisor,
            ),
            stats: StatsAggregator::from_counts(snapshot.stats),
            config,
        })
    }
}
