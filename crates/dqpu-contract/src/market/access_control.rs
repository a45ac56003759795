//! # Access Control
//!
//! Owns the contract owner identity and the verifier set, and answers
//! authorization queries for the ledger.

use crate::domain::{AccountId, ContractError, InputError, Role};
use std::collections::BTreeSet;
use tracing::info;

/// Owner identity and verifier set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessControl {
    owner: AccountId,
    verifiers: BTreeSet<AccountId>,
}

impl AccessControl {
    /// Bootstrap with `owner`, who also becomes the first verifier.
    pub fn new(owner: AccountId) -> Self {
        let mut verifiers = BTreeSet::new();
        verifiers.insert(owner.clone());
        Self { owner, verifiers }
    }

    /// Rebuild from persisted parts, without the bootstrap membership rule.
    pub(crate) fn from_parts(owner: AccountId, verifiers: BTreeSet<AccountId>) -> Self {
        Self { owner, verifiers }
    }

    /// Current contract owner.
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Check if `account` is the contract owner.
    pub fn is_owner(&self, account: &AccountId) -> bool {
        &self.owner == account
    }

    /// Check if `account` is in the verifier set.
    pub fn is_verifier(&self, account: &AccountId) -> bool {
        self.verifiers.contains(account)
    }

    /// Fail unless `caller` is the contract owner.
    pub fn ensure_owner(&self, caller: &AccountId) -> Result<(), ContractError> {
        if !self.is_owner(caller) {
            return Err(ContractError::Unauthorized {
                caller: caller.clone(),
                required: Role::Owner,
            });
        }
        Ok(())
    }

    /// Fail unless `caller` is a verifier.
    pub fn ensure_verifier(&self, caller: &AccountId) -> Result<(), ContractError> {
        if !self.is_verifier(caller) {
            return Err(ContractError::Unauthorized {
                caller: caller.clone(),
                required: Role::Verifier,
            });
        }
        Ok(())
    }

    /// Owner-only. Adding a member twice is a no-op; returns whether the set changed.
    pub fn add_verifier(
        &mut self,
        caller: &AccountId,
        account: AccountId,
    ) -> Result<bool, ContractError> {
        self.ensure_owner(caller)?;
        if account.is_empty() {
            return Err(InputError::EmptyField("account").into());
        }
        let added = self.verifiers.insert(account.clone());
        if added {
            info!(verifier = %account, "Verifier added");
        }
        Ok(added)
    }

    /// Owner-only. Removing a non-member is a no-op; returns whether the set changed.
    ///
    /// The current owner cannot be removed.
    pub fn remove_verifier(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<bool, ContractError> {
        self.ensure_owner(caller)?;
        if self.is_owner(account) {
            return Err(InputError::OwnerSeat.into());
        }
        let removed = self.verifiers.remove(account);
        if removed {
            info!(verifier = %account, "Verifier removed");
        }
        Ok(removed)
    }

    /// Owner-only. Replaces the owner and returns the previous one.
    ///
    /// The new owner does not join the verifier set.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> Result<AccountId, ContractError> {
        self.ensure_owner(caller)?;
        if new_owner.is_empty() {
            return Err(InputError::EmptyField("new_owner").into());
        }
        let previous = std::mem::replace(&mut self.owner, new_owner);
        info!(previous = %previous, owner = %self.owner, "Ownership transferred");
        Ok(previous)
    }

    /// Number of verifiers.
    pub fn verifier_count(&self) -> u64 {
        self.verifiers.len() as u64
    }

    /// Verifiers in account order.
    pub fn verifiers(&self) -> impl Iterator<Item = &AccountId> {
        self.verifiers.iter()
    }
}
