//! In-Memory Host Adapter
//!
//! Implements the outbound host ports with a deterministic value ledger.
//! Each [`InMemoryHost::invoke`] behaves like one host transaction: transfers
//! and events are buffered and only committed when the invocation succeeds.
//! Committed events are written to the host log as `EVENT_JSON:` lines.

use crate::domain::{AccountId, Balance, ContractError};
use crate::events::MarketEvent;
use crate::ports::outbound::{CallerContext, EventSink, Transfer, ValueTransfer};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// In-memory host for tests and embedding.
#[derive(Debug)]
pub struct InMemoryHost {
    caller: AccountId,
    attached: Balance,
    /// Total attached by each account to successful invocations.
    paid_in: BTreeMap<AccountId, Balance>,
    /// Total transferred to each account.
    received: BTreeMap<AccountId, Balance>,
    pending_transfers: Vec<Transfer>,
    pending_events: Vec<MarketEvent>,
    transfers: Vec<Transfer>,
    events: Vec<MarketEvent>,
}

impl InMemoryHost {
    /// Create a host whose ambient caller is `caller` with nothing attached.
    pub fn new(caller: impl Into<AccountId>) -> Self {
        Self {
            caller: caller.into(),
            attached: Balance::zero(),
            paid_in: BTreeMap::new(),
            received: BTreeMap::new(),
            pending_transfers: Vec::new(),
            pending_events: Vec::new(),
            transfers: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Run one invocation as `caller` with `deposit` attached.
    ///
    /// On `Ok` the deposit moves into custody and buffered transfers and
    /// events are committed. On `Err` all of them are dropped and the deposit
    /// stays with the caller.
    pub fn invoke<T>(
        &mut self,
        caller: &AccountId,
        deposit: Balance,
        f: impl FnOnce(&mut Self) -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        self.caller = caller.clone();
        self.attached = deposit;
        self.pending_transfers.clear();
        self.pending_events.clear();

        let result = f(self);

        match &result {
            Ok(_) => {
                if !deposit.is_zero() {
                    *self.paid_in.entry(caller.clone()).or_default() += deposit;
                }
                for transfer in self.pending_transfers.drain(..) {
                    *self.received.entry(transfer.to.clone()).or_default() += transfer.amount;
                    self.transfers.push(transfer);
                }
                for event in self.pending_events.drain(..) {
                    log_event(&event);
                    self.events.push(event);
                }
            }
            Err(err) => {
                debug!(
                    caller = %caller,
                    error = err.kind(),
                    dropped_transfers = self.pending_transfers.len(),
                    "Invocation rolled back"
                );
                self.pending_transfers.clear();
                self.pending_events.clear();
            }
        }

        self.attached = Balance::zero();
        result
    }

    /// Total transferred to `account`.
    pub fn received(&self, account: &AccountId) -> Balance {
        self.received.get(account).copied().unwrap_or_default()
    }

    /// Total `account` attached to successful invocations.
    pub fn paid_in(&self, account: &AccountId) -> Balance {
        self.paid_in.get(account).copied().unwrap_or_default()
    }

    /// Funds currently held on behalf of the contract.
    pub fn custody(&self) -> Balance {
        let inflow = self
            .paid_in
            .values()
            .fold(Balance::zero(), |acc, amount| acc + *amount);
        let outflow = self
            .received
            .values()
            .fold(Balance::zero(), |acc, amount| acc + *amount);
        inflow.saturating_sub(outflow)
    }

    /// Committed transfers, in issue order.
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Committed events, in emission order.
    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    /// Committed events rendered as host log lines.
    pub fn event_log(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| event.to_log_line().ok())
            .collect()
    }
}

fn log_event(event: &MarketEvent) {
    match event.to_log_line() {
        Ok(line) => debug!(target: "dqpu::events", "{line}"),
        Err(err) => warn!(event = event.name(), error = %err, "Event could not be rendered"),
    }
}

impl CallerContext for InMemoryHost {
    fn caller(&self) -> &AccountId {
        &self.caller
    }

    fn attached_deposit(&self) -> Balance {
        self.attached
    }
}

impl ValueTransfer for InMemoryHost {
    fn transfer(&mut self, to: &AccountId, amount: Balance) {
        self.pending_transfers.push(Transfer {
            to: to.clone(),
            amount,
        });
    }
}

impl EventSink for InMemoryHost {
    fn emit(&mut self, event: MarketEvent) {
        self.pending_events.push(event);
    }
}
