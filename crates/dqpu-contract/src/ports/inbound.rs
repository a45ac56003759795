//! # Inbound Ports
//!
//! The operations the marketplace exposes to its callers.
//!
//! Mutating operations receive the invocation's [`Host`]; the caller identity
//! and attached funds are read from it, never passed as arguments.

use crate::domain::{AccountId, Balance, ContractError, Job, JobId, JobRequest, JobStats, JobStatus};
use crate::ports::outbound::Host;

/// Mutating marketplace API - inbound port.
pub trait JobMarketApi {
    /// Submit a new job funded by the attached deposit. Returns its id.
    fn submit_job(&mut self, host: &mut dyn Host, request: JobRequest)
        -> Result<JobId, ContractError>;

    /// Remove a job and refund its outstanding reward to its owner.
    ///
    /// Callable by the job owner while the job is `PendingValidation` or
    /// `Waiting`, and by the contract owner in any status.
    fn remove_job(&mut self, host: &mut dyn Host, id: JobId) -> Result<Balance, ContractError>;

    /// Verifier ruling on a pending job.
    ///
    /// `trapped_file`, when given, replaces the job payload on approval;
    /// `None` keeps the submitted payload.
    fn set_job_validity(
        &mut self,
        host: &mut dyn Host,
        id: JobId,
        valid: bool,
        trapped_file: Option<String>,
    ) -> Result<JobStatus, ContractError>;

    /// Post a result for a waiting job, backed by the attached collateral.
    fn submit_job_result(
        &mut self,
        host: &mut dyn Host,
        id: JobId,
        result_file: String,
    ) -> Result<(), ContractError>;

    /// Verifier ruling on a posted result. Approval requires a trap file.
    fn set_result_validity(
        &mut self,
        host: &mut dyn Host,
        id: JobId,
        valid: bool,
        trap_file: Option<String>,
    ) -> Result<JobStatus, ContractError>;

    /// Add a verifier. Returns whether the set changed.
    fn add_verifier(&mut self, host: &mut dyn Host, account: AccountId)
        -> Result<bool, ContractError>;

    /// Remove a verifier. Returns whether the set changed.
    fn remove_verifier(
        &mut self,
        host: &mut dyn Host,
        account: AccountId,
    ) -> Result<bool, ContractError>;

    /// Hand contract ownership to another account.
    fn set_owner(&mut self, host: &mut dyn Host, new_owner: AccountId)
        -> Result<(), ContractError>;

    /// Wipe the ledger and reset the stats. Returns the number of jobs removed.
    fn clear_jobs(&mut self, host: &mut dyn Host) -> Result<u64, ContractError>;
}

/// Read-only marketplace API - inbound port.
pub trait JobMarketQuery {
    /// Look up a job.
    fn get_job(&self, id: JobId) -> Result<Job, ContractError>;

    /// Look up a job's status.
    fn get_job_status(&self, id: JobId) -> Result<JobStatus, ContractError>;

    /// Jobs in insertion order, starting at position `from_index`.
    fn get_jobs(&self, from_index: u64, limit: Option<u32>) -> Vec<Job>;

    /// The most recent jobs, oldest first.
    fn get_latest_jobs(&self, limit: Option<u32>) -> Vec<Job>;

    /// Number of jobs in the ledger.
    fn get_number_of_jobs(&self) -> u64;

    /// Per-status job counts.
    fn get_jobs_stats(&self) -> JobStats;

    /// Number of verifiers.
    fn get_number_of_verifiers(&self) -> u64;

    /// Verifiers in account order, starting at position `from_index`.
    fn get_verifiers(&self, from_index: u64, limit: Option<u32>) -> Vec<AccountId>;

    /// Cumulative funds accepted into escrow.
    fn get_handled_amount(&self) -> Balance;

    /// Check verifier membership.
    fn is_a_verifier(&self, account: &AccountId) -> bool;

    /// Current contract owner.
    fn get_owner(&self) -> AccountId;
}
