//! Fee payment and burn
//!
//! The registry charges fees through the [`Treasury`] trait. Both calls
//! receive the transition's store, so a debit made before a failing burn is
//! discarded with the rest of the transition.

use log::debug;

use crate::error::{RegistryError, Result};
use crate::keys;
use crate::models::{AccountId, Coin};
use crate::store::{self, KvStore};

/// Name of the module account holding fees between debit and burn
pub const MODULE_ACCOUNT: &str = "xid";

/// Balance service used to charge registration fees
#[cfg_attr(test, mockall::automock)]
pub trait Treasury {
    /// Move `coin` from `from` into the registry holding account
    fn debit(&self, store: &mut dyn KvStore, from: &AccountId, coin: &Coin) -> Result<()>;

    /// Remove `coin` from the holding account and from total supply
    fn burn(&self, store: &mut dyn KvStore, coin: &Coin) -> Result<()>;
}

/// Treasury keeping balances and supply in the registry's own store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTreasury {
    holding: AccountId,
}

impl Default for LedgerTreasury {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerTreasury {
    /// Treasury whose holding account is the `xid` module account
    pub fn new() -> Self {
        LedgerTreasury {
            holding: AccountId::module(MODULE_ACCOUNT),
        }
    }

    /// The holding account
    pub fn holding_account(&self) -> AccountId {
        self.holding
    }

    /// Spendable balance of `account` in `denom`
    pub fn balance(&self, store: &dyn KvStore, account: &AccountId, denom: &str) -> Result<u128> {
        store::read_u128(store, &keys::balance_key(account, denom))
    }

    /// Total supply of `denom`
    pub fn supply(&self, store: &dyn KvStore, denom: &str) -> Result<u128> {
        store::read_u128(store, &keys::supply_key(denom))
    }

    /// Create `coin` in `to`'s balance
    pub fn mint(&self, store: &mut dyn KvStore, to: &AccountId, coin: &Coin) -> Result<()> {
        let supply = self
            .supply(store, &coin.denom)?
            .checked_add(coin.amount)
            .ok_or_else(|| RegistryError::CorruptedState(format!("{} supply overflow", coin.denom)))?;
        let balance = self.balance(store, to, &coin.denom)?;
        store::write_u128(store, &keys::supply_key(&coin.denom), supply);
        self.write_balance(store, to, &coin.denom, balance + coin.amount);
        Ok(())
    }

    fn write_balance(&self, store: &mut dyn KvStore, account: &AccountId, denom: &str, amount: u128) {
        let key = keys::balance_key(account, denom);
        if amount == 0 {
            store.delete(&key);
        } else {
            store::write_u128(store, &key, amount);
        }
    }
}

impl Treasury for LedgerTreasury {
    fn debit(&self, store: &mut dyn KvStore, from: &AccountId, coin: &Coin) -> Result<()> {
        let available = self.balance(store, from, &coin.denom)?;
        let remaining = available.checked_sub(coin.amount).ok_or_else(|| {
            RegistryError::InsufficientFee(format!(
                "{} holds {}{}, fee is {}",
                from, available, coin.denom, coin
            ))
        })?;
        let held = self.balance(store, &self.holding, &coin.denom)?;
        self.write_balance(store, from, &coin.denom, remaining);
        self.write_balance(store, &self.holding, &coin.denom, held + coin.amount);
        debug!("debited {} from {}", coin, from);
        Ok(())
    }

    fn burn(&self, store: &mut dyn KvStore, coin: &Coin) -> Result<()> {
        let held = self.balance(store, &self.holding, &coin.denom)?;
        let remaining = held.checked_sub(coin.amount).ok_or_else(|| {
            RegistryError::BurnFailed(format!("holding account has {}{}, burn of {}", held, coin.denom, coin))
        })?;
        let supply = self
            .supply(store, &coin.denom)?
            .checked_sub(coin.amount)
            .ok_or_else(|| RegistryError::BurnFailed(format!("burn of {} exceeds supply", coin)))?;
        self.write_balance(store, &self.holding, &coin.denom, remaining);
        store::write_u128(store, &keys::supply_key(&coin.denom), supply);
        debug!("burned {}", coin);
        Ok(())
    }
}
