//! # Outbound Ports
//!
//! Capabilities the host environment supplies to every invocation: the
//! asserted caller, the funds attached to the call, irrevocable value
//! transfer and the event log.
//!
//! All ports are synchronous. The core never suspends; the host sequences
//! invocations and rolls back every effect of an invocation that fails.

use crate::domain::{AccountId, Balance};
use crate::events::MarketEvent;

/// Identity and attached funds of the current invocation.
pub trait CallerContext {
    /// Account asserted to be calling.
    fn caller(&self) -> &AccountId;

    /// Funds attached to the call.
    fn attached_deposit(&self) -> Balance;
}

/// Irrevocable outbound payment.
///
/// The core treats a transfer as always succeeding. A host that cannot
/// honor one must fail the enclosing invocation as a whole.
pub trait ValueTransfer {
    /// Pay `amount` to `to`.
    fn transfer(&mut self, to: &AccountId, amount: Balance);
}

/// Sink for lifecycle events.
pub trait EventSink {
    /// Record an event.
    fn emit(&mut self, event: MarketEvent);
}

/// Everything an invocation needs from its host.
pub trait Host: CallerContext + ValueTransfer + EventSink {}

impl<T: CallerContext + ValueTransfer + EventSink> Host for T {}

/// One issued transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// Recipient.
    pub to: AccountId,
    /// Amount.
    pub amount: Balance,
}
