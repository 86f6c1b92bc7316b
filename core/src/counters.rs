//! O(1) totals kept alongside the records they summarize
//!
//! Counts are read by pagination and statistics queries instead of
//! scanning. They are only adjusted from the same transition that mutates
//! the records, so the mutators are crate-private; [`audit`] recomputes
//! everything by full scan to check that they stayed exact.

use std::collections::BTreeMap;

use log::warn;

use crate::error::{RegistryError, Result};
use crate::keys::{self, KeyPrefix};
use crate::models::AccountId;
use crate::records;
use crate::store::{self, KvStore};

/// Names held by `owner`
pub fn owner_count(store: &dyn KvStore, owner: &AccountId) -> Result<u64> {
    store::read_u64(store, &keys::owner_count_key(owner))
}

/// Names registered across all TLDs
pub fn global_name_count(store: &dyn KvStore) -> Result<u64> {
    store::read_u64(store, &keys::global_name_count_key())
}

/// Names registered under `tld`
pub fn tld_name_count(store: &dyn KvStore, tld: &str) -> Result<u64> {
    store::read_u64(store, &keys::tld_name_count_key(tld))
}

/// Registration fees burned across all TLDs
pub fn global_fees_burned(store: &dyn KvStore) -> Result<u128> {
    store::read_u128(store, &keys::global_fees_burned_key())
}

/// Registration fees burned under `tld`
pub fn tld_fees_burned(store: &dyn KvStore, tld: &str) -> Result<u128> {
    store::read_u128(store, &keys::tld_fees_burned_key(tld))
}

fn increment(store: &mut dyn KvStore, key: &[u8]) -> Result<()> {
    let count = store::read_u64(store, key)?;
    let next = count
        .checked_add(1)
        .ok_or_else(|| RegistryError::CorruptedState(format!("counter {} overflow", hex::encode(key))))?;
    store::write_u64(store, key, next);
    Ok(())
}

pub(crate) fn increment_owner_count(store: &mut dyn KvStore, owner: &AccountId) -> Result<()> {
    increment(store, &keys::owner_count_key(owner))
}

/// Decrement saturates at zero; an underflow means the counter was already
/// out of step with the index and is logged rather than failing the
/// transition.
pub(crate) fn decrement_owner_count(store: &mut dyn KvStore, owner: &AccountId) -> Result<()> {
    let key = keys::owner_count_key(owner);
    let count = store::read_u64(store, &key)?;
    if count == 0 {
        warn!("owner count underflow for {}", owner);
        return Ok(());
    }
    if count == 1 {
        store.delete(&key);
    } else {
        store::write_u64(store, &key, count - 1);
    }
    Ok(())
}

/// Count one new name under `tld` and globally
pub(crate) fn increment_name_counts(store: &mut dyn KvStore, tld: &str) -> Result<()> {
    increment(store, &keys::tld_name_count_key(tld))?;
    increment(store, &keys::global_name_count_key())
}

/// Add `amount` to the burned totals of `tld` and globally
pub(crate) fn add_fees_burned(store: &mut dyn KvStore, tld: &str, amount: u128) -> Result<()> {
    for key in [keys::tld_fees_burned_key(tld), keys::global_fees_burned_key()] {
        let total = store::read_u128(store, &key)?;
        let next = total
            .checked_add(amount)
            .ok_or_else(|| RegistryError::CorruptedState("burned fee total overflow".to_string()))?;
        store::write_u128(store, &key, next);
    }
    Ok(())
}

/// A counter whose stored value disagrees with the records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterMismatch {
    /// Which counter, e.g. `owner 0x..` or `tld epix`
    pub counter: String,

    /// Value held in the store
    pub stored: u128,

    /// Value recomputed from the records
    pub expected: u128,
}

/// Result of a full recomputation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterAudit {
    /// Counters that disagree
    pub mismatches: Vec<CounterMismatch>,

    /// Name records with no owner index entry, and index entries with no
    /// matching record, as `name.tld`
    pub index_errors: Vec<String>,
}

impl CounterAudit {
    /// Whether every counter and index entry matched
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty() && self.index_errors.is_empty()
    }

    fn compare(&mut self, counter: String, stored: u128, expected: u128) {
        if stored != expected {
            self.mismatches.push(CounterMismatch {
                counter,
                stored,
                expected,
            });
        }
    }
}

/// Recompute every count from the name records and compare with the store
///
/// Fee totals cannot be recomputed from records, so only the global total
/// is checked against the sum of the per-TLD totals.
pub fn audit(store: &dyn KvStore) -> Result<CounterAudit> {
    let mut report = CounterAudit::default();

    let records = records::name_records(store)?;
    let mut by_owner: BTreeMap<AccountId, u64> = BTreeMap::new();
    let mut by_tld: BTreeMap<String, u64> = BTreeMap::new();
    for record in &records {
        *by_owner.entry(record.owner).or_default() += 1;
        *by_tld.entry(record.tld.clone()).or_default() += 1;
        if !records::has_owner_index(store, &record.owner, &record.tld, &record.name) {
            report.index_errors.push(record.full_name());
        }
    }

    for (key, _) in store.prefix(&KeyPrefix::OwnerIndex.bytes()) {
        let (owner, tld, name) = keys::decode_owner_index_key(&key).ok_or_else(|| {
            RegistryError::CorruptedState(format!("malformed owner index key {}", hex::encode(&key)))
        })?;
        match records::get_name_record(store, &tld, &name)? {
            Some(record) if record.owner == owner => {}
            _ => report.index_errors.push(format!("{}.{} for {}", name, tld, owner)),
        }
    }

    // Owners with a stored count but no records
    for (key, _) in store.prefix(&KeyPrefix::OwnerCount.bytes()) {
        let owner = AccountId::from_slice(&key[1..])?;
        by_owner.entry(owner).or_default();
    }
    for (owner, expected) in by_owner {
        let stored = owner_count(store, &owner)?;
        report.compare(format!("owner {}", owner), stored as u128, expected as u128);
    }

    let mut burned_sum: u128 = 0;
    for config in records::tld_configs(store)? {
        by_tld.entry(config.tld.clone()).or_default();
        burned_sum = burned_sum.saturating_add(tld_fees_burned(store, &config.tld)?);
    }
    for (tld, expected) in by_tld {
        let stored = tld_name_count(store, &tld)?;
        report.compare(format!("tld {}", tld), stored as u128, expected as u128);
    }

    report.compare(
        "global names".to_string(),
        global_name_count(store)? as u128,
        records.len() as u128,
    );
    report.compare("global fees burned".to_string(), global_fees_burned(store)?, burned_sum);

    Ok(report)
}
