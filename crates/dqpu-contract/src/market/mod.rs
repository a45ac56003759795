//! # Job Market
//!
//! Wires the four components together behind the inbound ports.
//!
//! - [`AccessControl`] owns the owner identity and verifier set
//! - [`EscrowAccounting`] issues transfers and counts processed funds
//! - [`JobLedger`] owns the jobs and the state machine
//! - [`StatsAggregator`] mirrors the ledger per status
//!
//! Components never share mutable state; the ledger receives the others
//! through a [`LedgerContext`] for the duration of one operation.

pub mod access_control;
pub mod escrow;
pub mod ledger;
mod query;
pub mod stats;

pub use access_control::AccessControl;
pub use escrow::EscrowAccounting;
pub use ledger::{JobLedger, LedgerContext};
pub use stats::StatsAggregator;

use crate::config::{ConfigError, MarketConfig};
use crate::domain::{AccountId, Balance, ContractError, JobId, JobRequest, JobStatus};
use crate::events::MarketEvent;
use crate::ports::inbound::JobMarketApi;
use crate::ports::outbound::Host;
use tracing::{info, instrument, warn};

/// The job marketplace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobMarket {
    pub(crate) config: MarketConfig,
    pub(crate) access: AccessControl,
    pub(crate) escrow: EscrowAccounting,
    pub(crate) ledger: JobLedger,
    pub(crate) stats: StatsAggregator,
}

impl JobMarket {
    /// Initialize with `owner` as contract owner and first verifier.
    pub fn new(owner: AccountId) -> Self {
        Self::build(owner, MarketConfig::default())
    }

    /// Initialize with a custom configuration.
    pub fn with_config(owner: AccountId, config: MarketConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(owner, config))
    }

    fn build(owner: AccountId, config: MarketConfig) -> Self {
        info!(owner = %owner, "Job market initialized");
        Self {
            ledger: JobLedger::new(config.collateral_divisor),
            access: AccessControl::new(owner),
            escrow: EscrowAccounting::new(),
            stats: StatsAggregator::new(),
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Owner and verifier set.
    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    /// Job records.
    pub fn ledger(&self) -> &JobLedger {
        &self.ledger
    }

    /// Per-status counters.
    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    /// Split into the ledger and the context its operations need.
    fn split<'a>(&'a mut self, host: &'a mut dyn Host) -> (&'a mut JobLedger, LedgerContext<'a>) {
        let ctx = LedgerContext {
            access: &self.access,
            escrow: &mut self.escrow,
            stats: &mut self.stats,
            host,
        };
        (&mut self.ledger, ctx)
    }
}

fn rejected(operation: &'static str, caller: &AccountId, err: ContractError) -> ContractError {
    warn!(
        operation,
        caller = %caller,
        kind = err.kind(),
        error = %err,
        "Invocation rejected"
    );
    err
}

impl JobMarketApi for JobMarket {
    #[instrument(skip_all, fields(caller = %host.caller()))]
    fn submit_job(
        &mut self,
        host: &mut dyn Host,
        request: JobRequest,
    ) -> Result<JobId, ContractError> {
        let caller = host.caller().clone();
        let (ledger, ctx) = self.split(host);
        ledger
            .submit_job(ctx, request)
            .map_err(|err| rejected("submit_job", &caller, err))
    }

    #[instrument(skip_all, fields(caller = %host.caller(), job_id = %id))]
    fn remove_job(&mut self, host: &mut dyn Host, id: JobId) -> Result<Balance, ContractError> {
        let caller = host.caller().clone();
        let (ledger, ctx) = self.split(host);
        ledger
            .remove_job(ctx, id)
            .map_err(|err| rejected("remove_job", &caller, err))
    }

    #[instrument(skip_all, fields(caller = %host.caller(), job_id = %id, valid = valid))]
    fn set_job_validity(
        &mut self,
        host: &mut dyn Host,
        id: JobId,
        valid: bool,
        trapped_file: Option<String>,
    ) -> Result<JobStatus, ContractError> {
        let caller = host.caller().clone();
        let (ledger, ctx) = self.split(host);
        ledger
            .set_job_validity(ctx, id, valid, trapped_file)
            .map_err(|err| rejected("set_job_validity", &caller, err))
    }

    #[instrument(skip_all, fields(caller = %host.caller(), job_id = %id))]
    fn submit_job_result(
        &mut self,
        host: &mut dyn Host,
        id: JobId,
        result_file: String,
    ) -> Result<(), ContractError> {
        let caller = host.caller().clone();
        let (ledger, ctx) = self.split(host);
        ledger
            .submit_job_result(ctx, id, result_file)
            .map_err(|err| rejected("submit_job_result", &caller, err))
    }

    #[instrument(skip_all, fields(caller = %host.caller(), job_id = %id, valid = valid))]
    fn set_result_validity(
        &mut self,
        host: &mut dyn Host,
        id: JobId,
        valid: bool,
        trap_file: Option<String>,
    ) -> Result<JobStatus, ContractError> {
        let caller = host.caller().clone();
        let (ledger, ctx) = self.split(host);
        ledger
            .set_result_validity(ctx, id, valid, trap_file)
            .map_err(|err| rejected("set_result_validity", &caller, err))
    }

    #[instrument(skip_all, fields(caller = %host.caller(), account = %account))]
    fn add_verifier(
        &mut self,
        host: &mut dyn Host,
        account: AccountId,
    ) -> Result<bool, ContractError> {
        let caller = host.caller().clone();
        let added = self
            .access
            .add_verifier(&caller, account.clone())
            .map_err(|err| rejected("add_verifier", &caller, err))?;
        if added {
            host.emit(MarketEvent::VerifierAdded { account });
        }
        Ok(added)
    }

    #[instrument(skip_all, fields(caller = %host.caller(), account = %account))]
    fn remove_verifier(
        &mut self,
        host: &mut dyn Host,
        account: AccountId,
    ) -> Result<bool, ContractError> {
        let caller = host.caller().clone();
        let removed = self
            .access
            .remove_verifier(&caller, &account)
            .map_err(|err| rejected("remove_verifier", &caller, err))?;
        if removed {
            host.emit(MarketEvent::VerifierRemoved { account });
        }
        Ok(removed)
    }

    #[instrument(skip_all, fields(caller = %host.caller(), new_owner = %new_owner))]
    fn set_owner(&mut self, host: &mut dyn Host, new_owner: AccountId) -> Result<(), ContractError> {
        let caller = host.caller().clone();
        let previous = self
            .access
            .transfer_ownership(&caller, new_owner.clone())
            .map_err(|err| rejected("set_owner", &caller, err))?;
        host.emit(MarketEvent::OwnerChanged {
            previous,
            owner: new_owner,
        });
        Ok(())
    }

    #[instrument(skip_all, fields(caller = %host.caller()))]
    fn clear_jobs(&mut self, host: &mut dyn Host) -> Result<u64, ContractError> {
        let caller = host.caller().clone();
        self.access
            .ensure_owner(&caller)
            .map_err(|err| rejected("clear_jobs", &caller, err))?;

        let count = self.ledger.clear();
        self.stats.reset();
        info!(count, by = %caller, "Ledger cleared");
        host.emit(MarketEvent::JobsCleared { count });
        Ok(count)
    }
}
