//! The name registry
//!
//! [`Registry`] holds the host configuration and the treasury used to charge
//! fees. State transitions take a [`Context`](crate::store::Context) and are
//! meant to run inside [`transact`](crate::store::transact), which commits
//! their writes and events together or not at all. Queries take any
//! [`KvStore`] and never write.
//!
//! Names and TLDs are case-insensitive: every entry point lowercases them
//! before use.

mod attachments;
mod governance;
mod names;
mod queries;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::keys;
use crate::models::{full_name, AccountId, NameRecord};
use crate::store::KvStore;
use crate::treasury::{LedgerTreasury, Treasury};
use crate::validation;

/// Registry state machine over a treasury
#[derive(Debug, Clone)]
pub struct Registry<T = LedgerTreasury> {
    config: RegistryConfig,
    treasury: T,
}

impl Registry<LedgerTreasury> {
    /// Registry charging fees through the store-backed ledger
    pub fn new(config: RegistryConfig) -> Result<Self> {
        Self::with_treasury(config, LedgerTreasury::new())
    }
}

impl<T: Treasury> Registry<T> {
    /// Registry charging fees through `treasury`
    pub fn with_treasury(config: RegistryConfig, treasury: T) -> Result<Self> {
        config.validate()?;
        Ok(Registry { config, treasury })
    }

    /// Host configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Fee treasury
    pub fn treasury(&self) -> &T {
        &self.treasury
    }

    fn authorize(&self, authority: &AccountId) -> Result<()> {
        if *authority != self.config.authority {
            return Err(RegistryError::Unauthorized(format!(
                "invalid authority; expected {}, got {}",
                self.config.authority, authority
            )));
        }
        Ok(())
    }
}

/// Lowercased `(tld, name)`
///
/// Either component longer than a store key can carry is rejected here, so
/// every entry point fails with `InvalidTld` / `InvalidName` on it.
fn normalized(tld: &str, name: &str) -> Result<(String, String)> {
    if tld.len() > keys::MAX_COMPONENT_LEN {
        return Err(RegistryError::InvalidTld(format!(
            "TLD too long: {} bytes (max {})",
            tld.len(),
            keys::MAX_COMPONENT_LEN
        )));
    }
    if name.len() > keys::MAX_COMPONENT_LEN {
        return Err(RegistryError::InvalidName(format!(
            "name too long: {} bytes (max {})",
            name.len(),
            keys::MAX_COMPONENT_LEN
        )));
    }
    Ok((validation::normalize(tld), validation::normalize(name)))
}

/// Record of `(tld, name)`, or `NameNotFound`
fn require_record(store: &dyn KvStore, tld: &str, name: &str) -> Result<NameRecord> {
    crate::records::get_name_record(store, tld, name)?
        .ok_or_else(|| RegistryError::NameNotFound(full_name(tld, name)))
}

/// Record of `(tld, name)` held by `caller`, or `NameNotFound` / `NotOwner`
fn require_owned(store: &dyn KvStore, caller: &AccountId, tld: &str, name: &str) -> Result<NameRecord> {
    let record = require_record(store, tld, name)?;
    if record.owner != *caller {
        return Err(RegistryError::NotOwner(format!(
            "sender {} is not the owner of {}",
            caller,
            record.full_name()
        )));
    }
    Ok(record)
}
