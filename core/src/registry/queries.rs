//! Read-only queries

use super::{normalized, require_record, Registry};
use crate::content_root;
use crate::counters;
use crate::error::{to_state_error, RegistryError, Result};
use crate::fees;
use crate::keys::{self, KeyPrefix};
use crate::merkle::PeerProof;
use crate::models::{
    full_name, AccountId, Coin, ContentRoot, DnsRecord, NameRecord, Params, Peer, Profile, RegistryStats,
    TldConfig, TldStats,
};
use crate::pagination::{paginate, Page, PageRequest};
use crate::records;
use crate::store::KvStore;
use crate::treasury::Treasury;
use crate::validation;

impl<T: Treasury> Registry<T> {
    /// Record of `name.tld`
    pub fn resolve(&self, store: &dyn KvStore, tld: &str, name: &str) -> Result<NameRecord> {
        let (tld, name) = normalized(tld, name)?;
        require_record(store, &tld, &name)
    }

    /// First name held by `owner` in owner-index order
    pub fn reverse_resolve(&self, store: &dyn KvStore, owner: &AccountId) -> Result<Option<NameRecord>> {
        match records::owned_names(store, owner).into_iter().next() {
            Some((tld, name)) => Ok(Some(indexed_record(store, &tld, &name)?)),
            None => Ok(None),
        }
    }

    /// Names held by `owner`, paged; the total comes from the owner counter
    pub fn names_by_owner(
        &self,
        store: &dyn KvStore,
        owner: &AccountId,
        request: &PageRequest,
    ) -> Result<Page<NameRecord>> {
        paginate(
            store,
            &keys::owner_index_prefix(owner),
            request,
            self.config.max_page_size,
            |key, _| {
                let (_, tld, name) = keys::decode_owner_index_key(key)
                    .ok_or_else(|| to_state_error(format!("malformed owner index key {}", hex::encode(key))))?;
                indexed_record(store, &tld, &name)
            },
            || counters::owner_count(store, owner),
        )
    }

    /// Every registered name, paged; the total comes from the global counter
    pub fn list_all_names(&self, store: &dyn KvStore, request: &PageRequest) -> Result<Page<NameRecord>> {
        paginate(
            store,
            &KeyPrefix::NameRecord.bytes(),
            request,
            self.config.max_page_size,
            |_, value| Ok(bincode::deserialize::<NameRecord>(value)?),
            || counters::global_name_count(store),
        )
    }

    /// Profile of `name.tld`; empty fields if never set
    pub fn profile(&self, store: &dyn KvStore, tld: &str, name: &str) -> Result<Profile> {
        let (tld, name) = normalized(tld, name)?;
        require_record(store, &tld, &name)?;
        Ok(records::get_profile(store, &tld, &name)?.unwrap_or_default())
    }

    /// DNS records of `name.tld` in record-type order
    pub fn dns_records(&self, store: &dyn KvStore, tld: &str, name: &str) -> Result<Vec<DnsRecord>> {
        let (tld, name) = normalized(tld, name)?;
        require_record(store, &tld, &name)?;
        records::dns_records(store, &tld, &name)
    }

    /// The record of `record_type` on `name.tld`
    pub fn dns_record(&self, store: &dyn KvStore, tld: &str, name: &str, record_type: u16) -> Result<DnsRecord> {
        let (tld, name) = normalized(tld, name)?;
        require_record(store, &tld, &name)?;
        records::get_dns_record(store, &tld, &name, record_type)?.ok_or_else(|| {
            RegistryError::DnsRecordNotFound(format!(
                "record type {} not found for {}",
                record_type,
                full_name(&tld, &name)
            ))
        })
    }

    /// Configuration of `tld`
    pub fn tld(&self, store: &dyn KvStore, tld: &str) -> Result<TldConfig> {
        let tld = validation::normalize(tld);
        records::get_tld_config(store, &tld)?.ok_or(RegistryError::TldNotFound(tld))
    }

    /// Every TLD configuration in key order
    pub fn list_tlds(&self, store: &dyn KvStore) -> Result<Vec<TldConfig>> {
        records::tld_configs(store)
    }

    /// Fee that registering `name.tld` would charge now
    pub fn registration_fee(&self, store: &dyn KvStore, tld: &str, name: &str) -> Result<Coin> {
        let (tld, name) = normalized(tld, name)?;
        validation::validate_name(&name)?;
        validation::validate_tld(&tld)?;
        let amount = fees::calculate_fee(store, &tld, &name)?;
        Ok(Coin::new(records::get_params(store)?.fee_denom, amount))
    }

    /// Peers of `name.tld`, active and revoked, in key order
    pub fn peers(&self, store: &dyn KvStore, tld: &str, name: &str) -> Result<Vec<Peer>> {
        let (tld, name) = normalized(tld, name)?;
        require_record(store, &tld, &name)?;
        records::peers(store, &tld, &name)
    }

    /// Stored content root of `name.tld`; empty if no peer was ever set
    pub fn content_root(&self, store: &dyn KvStore, tld: &str, name: &str) -> Result<ContentRoot> {
        let (tld, name) = normalized(tld, name)?;
        content_root::get_root(store, &tld, &name)
    }

    /// Proof that active peer `address` is under the content root of `name.tld`
    pub fn peer_proof(&self, store: &dyn KvStore, tld: &str, name: &str, address: &str) -> Result<PeerProof> {
        let (tld, name) = normalized(tld, name)?;
        content_root::peer_proof(store, &tld, &name, address)?.ok_or_else(|| {
            RegistryError::PeerNotFound(format!(
                "no active peer {} for {}",
                address,
                full_name(&tld, &name)
            ))
        })
    }

    /// Global and per-TLD counts, read from the counters
    pub fn stats(&self, store: &dyn KvStore) -> Result<RegistryStats> {
        let tlds = records::tld_configs(store)?
            .into_iter()
            .map(|config| {
                Ok(TldStats {
                    name_count: counters::tld_name_count(store, &config.tld)?,
                    fees_burned: counters::tld_fees_burned(store, &config.tld)?,
                    enabled: config.enabled,
                    tld: config.tld,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RegistryStats {
            total_names: counters::global_name_count(store)?,
            total_fees_burned: counters::global_fees_burned(store)?,
            tlds,
        })
    }

    /// Module parameters
    pub fn params(&self, store: &dyn KvStore) -> Result<Params> {
        records::get_params(store)
    }
}

/// Record behind an owner-index entry; a dangling entry is corruption
fn indexed_record(store: &dyn KvStore, tld: &str, name: &str) -> Result<NameRecord> {
    records::get_name_record(store, tld, name)?.ok_or_else(|| {
        to_state_error(format!("owner index points at missing record {}", full_name(tld, name)))
    })
}
