//! # Escrow Accounting
//!
//! Issues outbound transfers through the host and keeps the cumulative
//! `money_handled` counter. Funds themselves are custodied by the host.

use crate::domain::{AccountId, Balance};
use crate::ports::outbound::ValueTransfer;
use tracing::debug;

/// Transfer issuer and processed-funds counter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EscrowAccounting {
    money_handled: Balance,
}

impl EscrowAccounting {
    /// Create with an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild with a persisted counter value.
    pub(crate) fn with_handled(money_handled: Balance) -> Self {
        Self { money_handled }
    }

    /// Count funds accepted into escrow. Never decreases.
    pub fn record_processed(&mut self, amount: Balance) {
        self.money_handled = self.money_handled.saturating_add(amount);
    }

    /// Cumulative funds accepted into escrow.
    pub fn money_handled(&self) -> Balance {
        self.money_handled
    }

    /// Pay `amount` to `to`. Zero amounts are not issued.
    ///
    /// Returns whether a transfer was issued.
    pub fn transfer<H: ValueTransfer + ?Sized>(
        &self,
        host: &mut H,
        to: &AccountId,
        amount: Balance,
    ) -> bool {
        if amount.is_zero() {
            return false;
        }
        debug!(to = %to, amount = %amount, "Issuing transfer");
        host.transfer(to, amount);
        true
    }
}
