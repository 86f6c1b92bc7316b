//! Genesis import and export
//!
//! [`init_genesis`] writes names through the same ownership path as
//! registration, minus the fee, so every counter and index entry is exact
//! from the first block. Content roots are recomputed from the imported
//! peers rather than trusted from the file.

use std::collections::{BTreeMap, BTreeSet};

use log::info;
use serde::{Deserialize, Serialize};

use crate::content_root;
use crate::error::{RegistryError, Result};
use crate::models::{DnsRecord, NameRecord, Params, Peer, PeerLink, PriceTier, Profile, TldConfig};
use crate::ownership;
use crate::records;
use crate::store::KvStore;
use crate::validation;

/// Base units per EPIX
const EPIX: u128 = 1_000_000_000_000_000_000;

/// A name with everything attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    /// Ownership record
    pub record: NameRecord,

    /// Profile, if one was set
    #[serde(default)]
    pub profile: Option<Profile>,

    /// DNS records
    #[serde(default)]
    pub dns_records: Vec<DnsRecord>,

    /// Peers, active and revoked
    #[serde(default)]
    pub peers: Vec<Peer>,
}

/// Complete registry state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    /// Module parameters
    pub params: Params,

    /// TLD configurations
    pub tlds: Vec<TldConfig>,

    /// Registered names
    #[serde(default)]
    pub names: Vec<NameEntry>,
}

impl Default for GenesisState {
    fn default() -> Self {
        GenesisState {
            params: Params::default(),
            tlds: vec![TldConfig::new(
                "epix",
                true,
                vec![
                    PriceTier::new(1, 100_000_000 * EPIX),
                    PriceTier::new(2, 1_000_000 * EPIX),
                    PriceTier::new(3, 500_000 * EPIX),
                    PriceTier::new(4, 100_000 * EPIX),
                    PriceTier::new(u32::MAX, 10_000 * EPIX),
                ],
            )],
            names: Vec::new(),
        }
    }
}

impl GenesisState {
    /// Check the state is internally consistent before anything is written
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;

        let mut tlds = BTreeSet::new();
        for config in &self.tlds {
            validation::validate_tld(&config.tld)?;
            if config.tld != validation::normalize(&config.tld) {
                return Err(RegistryError::InvalidTld(format!("TLD {:?} is not lowercase", config.tld)));
            }
            config.validate_tiers()?;
            if !tlds.insert(config.tld.as_str()) {
                return Err(RegistryError::TldAlreadyExists(format!("duplicate TLD {}", config.tld)));
            }
        }

        let mut names = BTreeSet::new();
        let mut links: BTreeMap<&str, String> = BTreeMap::new();
        for entry in &self.names {
            let record = &entry.record;
            validation::validate_name(&record.name)?;
            if record.name != validation::normalize(&record.name) {
                return Err(RegistryError::InvalidName(format!("name {:?} is not lowercase", record.name)));
            }
            if !tlds.contains(record.tld.as_str()) {
                return Err(RegistryError::TldNotFound(format!(
                    "{} is under an unknown TLD",
                    record.full_name()
                )));
            }
            if !names.insert((record.tld.as_str(), record.name.as_str())) {
                return Err(RegistryError::NameTaken(format!("duplicate name {}", record.full_name())));
            }

            for dns in &entry.dns_records {
                validation::validate_dns_record(dns)?;
            }
            for peer in &entry.peers {
                validation::validate_peer(&peer.address, &peer.label)?;
                if !peer.is_active() {
                    continue;
                }
                if let Some(other) = links.insert(&peer.address, record.full_name()) {
                    return Err(RegistryError::PeerAlreadyLinked(format!(
                        "{} is active on both {} and {}",
                        peer.address,
                        other,
                        record.full_name()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Write `state` into an empty store
///
/// Content roots are stamped with `height`.
pub fn init_genesis(store: &mut dyn KvStore, state: &GenesisState, height: u64) -> Result<()> {
    state.validate()?;

    records::set_params(store, &state.params)?;
    for config in &state.tlds {
        records::set_tld_config(store, config)?;
    }

    for entry in &state.names {
        let record = &entry.record;
        ownership::record_registration(store, record)?;
        if let Some(profile) = &entry.profile {
            records::set_profile(store, &record.tld, &record.name, profile)?;
        }
        for dns in &entry.dns_records {
            records::set_dns_record(store, &record.tld, &record.name, dns)?;
        }
        if entry.peers.is_empty() {
            continue;
        }
        for peer in &entry.peers {
            records::set_peer(store, &record.tld, &record.name, peer)?;
            if peer.is_active() {
                records::set_peer_link(
                    store,
                    &PeerLink {
                        tld: record.tld.clone(),
                        name: record.name.clone(),
                        address: peer.address.clone(),
                    },
                )?;
            }
        }
        content_root::recompute_root(store, &record.tld, &record.name, height)?;
    }

    info!(
        "genesis initialized with {} TLDs and {} names",
        state.tlds.len(),
        state.names.len()
    );
    Ok(())
}

/// Read the complete registry state back out of `store`
pub fn export_genesis(store: &dyn KvStore) -> Result<GenesisState> {
    let names = records::name_records(store)?
        .into_iter()
        .map(|record| {
            let profile = records::get_profile(store, &record.tld, &record.name)?;
            let dns_records = records::dns_records(store, &record.tld, &record.name)?;
            let peers = records::peers(store, &record.tld, &record.name)?;
            Ok(NameEntry {
                record,
                profile,
                dns_records,
                peers,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GenesisState {
        params: records::get_params(store)?,
        tlds: records::tld_configs(store)?,
        names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters;
    use crate::merkle;
    use crate::models::{dns_types, AccountId};
    use crate::store::MemStore;

    fn owner(byte: u8) -> AccountId {
        AccountId::new([byte; 20])
    }

    fn entry(name: &str, owner_byte: u8) -> NameEntry {
        NameEntry {
            record: NameRecord {
                name: name.to_string(),
                tld: "epix".to_string(),
                owner: owner(owner_byte),
                registered_at: 1,
            },
            profile: None,
            dns_records: Vec::new(),
            peers: Vec::new(),
        }
    }

    fn sample() -> GenesisState {
        let mut alice = entry("alice", 1);
        alice.profile = Some(Profile {
            avatar: "ipfs://a".to_string(),
            bio: "".to_string(),
        });
        alice.dns_records = vec![DnsRecord::new(dns_types::A, "10.0.0.1", 60)];
        let mut revoked = Peer::active("p3", "old", 1);
        revoked.revoke(2);
        alice.peers = vec![Peer::active("p1", "home", 1), Peer::active("p2", "", 1), revoked];

        GenesisState {
            names: vec![alice, entry("bob", 2), entry("carol", 1)],
            ..GenesisState::default()
        }
    }

    #[test]
    fn test_default_genesis() {
        let state = GenesisState::default();
        assert!(state.validate().is_ok());
        assert_eq!(state.tlds[0].tld, "epix");
        assert_eq!(state.tlds[0].price_tiers[0].price, 100_000_000 * EPIX);
        assert_eq!(state.tlds[0].price_tiers[4], PriceTier::new(u32::MAX, 10_000 * EPIX));
    }

    #[test]
    fn test_init_rebuilds_counters_and_roots() {
        let mut store = MemStore::new();
        init_genesis(&mut store, &sample(), 7).unwrap();

        assert!(counters::audit(&store).unwrap().is_consistent());
        assert_eq!(counters::global_name_count(&store).unwrap(), 3);
        assert_eq!(counters::tld_name_count(&store, "epix").unwrap(), 3);
        assert_eq!(counters::owner_count(&store, &owner(1)).unwrap(), 2);
        assert_eq!(counters::global_fees_burned(&store).unwrap(), 0);

        let root = content_root::get_root(&store, "epix", "alice").unwrap();
        assert_eq!(root.root, merkle::content_root("epix", "alice", ["p1", "p2"]));
        assert_eq!(root.updated_at, 7);
        assert!(content_root::get_root(&store, "epix", "bob").unwrap().is_empty());

        assert!(records::get_peer_link(&store, "p1").unwrap().is_some());
        assert!(records::get_peer_link(&store, "p3").unwrap().is_none());
    }

    #[test]
    fn test_export_round_trip() {
        let state = sample();
        let mut store = MemStore::new();
        init_genesis(&mut store, &state, 1).unwrap();

        let exported = export_genesis(&store).unwrap();
        assert_eq!(exported.params, state.params);
        assert_eq!(exported.tlds, state.tlds);
        // Exported in key order
        let names: Vec<_> = exported.names.iter().map(|e| e.record.name.as_str()).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);

        // Peers come back in key order, which follows the address digest
        let by_address = |entry: &NameEntry| {
            let mut entry = entry.clone();
            entry.peers.sort_by(|a, b| a.address.cmp(&b.address));
            entry
        };
        assert_eq!(by_address(&exported.names[0]), by_address(&state.names[0]));
        assert_eq!(exported.names[0].peers.len(), 3);
        assert_eq!(exported.names[1..], state.names[1..]);

        let json = serde_json::to_string(&exported).unwrap();
        let decoded: GenesisState = serde_json::from_str(&json).unwrap();
        let mut again = MemStore::new();
        init_genesis(&mut again, &decoded, 1).unwrap();
        assert_eq!(again, store);
    }

    #[test]
    fn test_validate_rejects() {
        let mut state = sample();
        state.tlds.push(state.tlds[0].clone());
        assert!(matches!(state.validate(), Err(RegistryError::TldAlreadyExists(_))));

        let mut state = sample();
        state.tlds[0].price_tiers.clear();
        assert!(matches!(state.validate(), Err(RegistryError::InvalidPriceTier(_))));

        let mut state = sample();
        state.names.push(entry("bob", 3));
        assert!(matches!(state.validate(), Err(RegistryError::NameTaken(_))));

        let mut state = sample();
        state.names[1].record.tld = "nope".to_string();
        assert!(matches!(state.validate(), Err(RegistryError::TldNotFound(_))));

        let mut state = sample();
        state.names[1].peers.push(Peer::active("p1", "", 1));
        assert!(matches!(state.validate(), Err(RegistryError::PeerAlreadyLinked(_))));

        let mut state = sample();
        state.params.min_name_length = 0;
        assert!(matches!(state.validate(), Err(RegistryError::InvalidParams(_))));

        let mut state = sample();
        state.names[0].record.name = "Alice".to_string();
        assert!(matches!(state.validate(), Err(RegistryError::InvalidName(_))));
    }

    #[test]
    fn test_invalid_state_writes_nothing() {
        let mut state = sample();
        state.names.push(entry("alice", 4));
        let mut store = MemStore::new();
        assert!(init_genesis(&mut store, &state, 1).is_err());
        assert!(store.is_empty());
    }
}
