//! # Query Facade
//!
//! Read-only views over the marketplace. Nothing here needs a host or an
//! authenticated caller, and every list is bounded by the configured page
//! limit.

use super::JobMarket;
use crate::domain::{AccountId, Balance, ContractError, Job, JobId, JobStats, JobStatus};
use crate::ports::inbound::JobMarketQuery;
use tracing::debug;

impl JobMarketQuery for JobMarket {
    fn get_job(&self, id: JobId) -> Result<Job, ContractError> {
        self.ledger.get(id).cloned()
    }

    fn get_job_status(&self, id: JobId) -> Result<JobStatus, ContractError> {
        self.ledger.get(id).map(|job| job.status)
    }

    fn get_jobs(&self, from_index: u64, limit: Option<u32>) -> Vec<Job> {
        let limit = self.config.page_limit(limit);
        debug!(from_index, limit, "Listing jobs");
        self.ledger
            .iter()
            .skip(saturating_index(from_index))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Returns the newest `limit` jobs oldest first; the page is not reversed.
    fn get_latest_jobs(&self, limit: Option<u32>) -> Vec<Job> {
        let limit = self.config.page_limit(limit);
        let skip = self.ledger.len().saturating_sub(limit);
        debug!(skip, limit, "Listing latest jobs");
        self.ledger.iter().skip(skip).cloned().collect()
    }

    fn get_number_of_jobs(&self) -> u64 {
        self.ledger.len() as u64
    }

    fn get_jobs_stats(&self) -> JobStats {
        self.stats.counts().clone()
    }

    fn get_number_of_verifiers(&self) -> u64 {
        self.access.verifier_count()
    }

    fn get_verifiers(&self, from_index: u64, limit: Option<u32>) -> Vec<AccountId> {
        let limit = self.config.page_limit(limit);
        debug!(from_index, limit, "Listing verifiers");
        self.access
            .verifiers()
            .skip(saturating_index(from_index))
            .take(limit)
            .cloned()
            .collect()
    }

    fn get_handled_amount(&self) -> Balance {
        self.escrow.money_handled()
    }

    fn is_a_verifier(&self, account: &AccountId) -> bool {
        self.access.is_verifier(account)
    }

    fn get_owner(&self) -> AccountId {
        self.access.owner().clone()
    }
}

fn saturating_index(index: u64) -> usize {
    usize::try_from(index).unwrap_or(usize::MAX)
}
