//! Capped-supply token ledger.
//!
//! Sole authority over balances and total supply. Invariants:
//! - `sum(balances) == total_supply <= max_supply`
//! - `minters` is only changed by the owner
//! - while paused, `mint`, `burn` and `transfer` fail; queries always work
//!
//! Every command validates fully before touching state, so a failed command
//! leaves the ledger exactly as it was.

use super::amount::Amount;
use crate::account::Account;
use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Token metadata (ERC-20 style).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Token ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    metadata: TokenMetadata,
    owner: Account,
    max_supply: Amount,
    total_supply: Amount,
    /// Zero balances are not stored.
    balances: BTreeMap<Account, Amount>,
    minters: BTreeSet<Account>,
    paused: bool,
}

impl TokenLedger {
    /// Create the ledger, crediting `initial_supply` to the deployer (owner).
    pub fn genesis(
        owner: Account,
        metadata: TokenMetadata,
        initial_supply: Amount,
        max_supply: Amount,
    ) -> LedgerResult<Self> {
        if initial_supply > max_supply {
            return Err(LedgerError::InvalidInput(
                "initial supply exceeds max supply".to_string(),
            ));
        }

        let mut balances = BTreeMap::new();
        if initial_supply > 0 {
            balances.insert(owner, initial_supply);
        }

        info!(
            owner = %owner,
            initial_supply = %initial_supply,
            max_supply = %max_supply,
            symbol = %metadata.symbol,
            "token ledger created"
        );

        Ok(Self {
            metadata,
            owner,
            max_supply,
            total_supply: initial_supply,
            balances,
            minters: BTreeSet::new(),
            paused: false,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn owner(&self) -> Account {
        self.owner
    }

    pub fn max_supply(&self) -> Amount {
        self.max_supply
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Account) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn is_minter(&self, account: &Account) -> bool {
        self.minters.contains(account)
    }

    pub fn minters(&self) -> impl Iterator<Item = &Account> {
        self.minters.iter()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Accounts with a non-zero balance, in account order.
    pub fn holders(&self) -> impl Iterator<Item = (&Account, &Amount)> {
        self.balances.iter()
    }

    /// Check `sum(balances) == total_supply <= max_supply`.
    pub fn supply_is_consistent(&self) -> bool {
        let sum = self
            .balances
            .values()
            .try_fold(0u128, |acc, balance| acc.checked_add(*balance));
        sum == Some(self.total_supply) && self.total_supply <= self.max_supply
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Mint new supply to `to`. Caller must be a minter or the owner.
    pub fn mint(&mut self, caller: &Account, to: &Account, amount: Amount) -> LedgerResult<()> {
        if !self.can_mint(caller) {
            return Err(LedgerError::Unauthorized(*caller));
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .filter(|supply| *supply <= self.max_supply)
            .ok_or(LedgerError::SupplyExceeded)?;

        self.ensure_not_paused()?;

        // Cannot overflow: the balance is bounded by total supply.
        let new_balance = self.balance_of(to) + amount;

        self.total_supply = new_supply;
        self.set_balance(to, new_balance);

        info!(minter = %caller, to = %to, amount = %amount, total_supply = %new_supply, "minted");
        Ok(())
    }

    /// Burn `amount` from the caller's own balance.
    pub fn burn(&mut self, caller: &Account, amount: Amount) -> LedgerResult<()> {
        self.ensure_not_paused()?;

        let balance = self.balance_of(caller);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance(*caller));
        }

        self.set_balance(caller, balance - amount);
        self.total_supply -= amount;

        info!(holder = %caller, amount = %amount, total_supply = %self.total_supply, "burned");
        Ok(())
    }

    /// Move `amount` from the caller to `to`.
    pub fn transfer(&mut self, caller: &Account, to: &Account, amount: Amount) -> LedgerResult<()> {
        self.ensure_not_paused()?;

        let from_balance = self.balance_of(caller);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance(*caller));
        }

        if caller != to {
            let to_balance = self.balance_of(to);
            self.set_balance(caller, from_balance - amount);
            self.set_balance(to, to_balance + amount);
        }

        info!(from = %caller, to = %to, amount = %amount, "transferred");
        Ok(())
    }

    /// Authorize `account` to mint. Owner only; adding twice is a no-op.
    ///
    /// Returns whether the set changed.
    pub fn add_minter(&mut self, caller: &Account, account: &Account) -> LedgerResult<bool> {
        self.ensure_owner(caller)?;
        let added = self.minters.insert(*account);
        if added {
            info!(minter = %account, "minter added");
        }
        Ok(added)
    }

    /// Revoke minting rights. Owner only; removing a non-minter is a no-op.
    pub fn remove_minter(&mut self, caller: &Account, account: &Account) -> LedgerResult<bool> {
        self.ensure_owner(caller)?;
        let removed = self.minters.remove(account);
        if removed {
            info!(minter = %account, "minter removed");
        }
        Ok(removed)
    }

    /// Pause mint, burn and transfer. Owner only.
    pub fn pause(&mut self, caller: &Account) -> LedgerResult<bool> {
        self.set_paused(caller, true)
    }

    /// Resume mint, burn and transfer. Owner only.
    pub fn unpause(&mut self, caller: &Account) -> LedgerResult<bool> {
        self.set_paused(caller, false)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn can_mint(&self, caller: &Account) -> bool {
        *caller == self.owner || self.minters.contains(caller)
    }

    fn ensure_owner(&self, caller: &Account) -> LedgerResult<()> {
        if *caller != self.owner {
            return Err(LedgerError::Unauthorized(*caller));
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> LedgerResult<()> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    fn set_paused(&mut self, caller: &Account, paused: bool) -> LedgerResult<bool> {
        self.ensure_owner(caller)?;
        let changed = self.paused != paused;
        self.paused = paused;
        if changed {
            info!(paused, "pause state changed");
        }
        Ok(changed)
    }

    fn set_balance(&mut self, account: &Account, balance: Amount) {
        if balance == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, balance);
        }
    }
}
