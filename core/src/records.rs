//! Typed access to stored entities
//!
//! Each accessor pairs a key from [`keys`] with the value codec from
//! [`store`]. Getters return `Ok(None)` for a missing entry and an error for
//! an entry that cannot be decoded. Setters overwrite the whole value.
//! Lookups under a TLD or name too long to encode as a key report the
//! entry as absent, since nothing can be stored there.
//!
//! Name records and owner index entries are only written through
//! [`ownership`](crate::ownership), which keeps them paired with the
//! counters, so their mutators are crate-private.

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::keys;
use crate::models::{
    AccountId, ContentRoot, DnsRecord, NameRecord, Params, Peer, PeerLink, Profile, TldConfig,
};
use crate::store::{self, KvStore};

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes)?)
}

// Name records

/// Record for `(tld, name)`
pub fn get_name_record(store: &dyn KvStore, tld: &str, name: &str) -> Result<Option<NameRecord>> {
    store::load(store, &keys::name_record_key(tld, name)?)
}

/// Whether `(tld, name)` is registered
pub fn has_name_record(store: &dyn KvStore, tld: &str, name: &str) -> bool {
    keys::name_record_key(tld, name).map_or(false, |key| store.has(&key))
}

pub(crate) fn set_name_record(store: &mut dyn KvStore, record: &NameRecord) -> Result<()> {
    store::save(store, &keys::name_record_key(&record.tld, &record.name)?, record)
}

/// Every name record in key order
pub fn name_records(store: &dyn KvStore) -> Result<Vec<NameRecord>> {
    store
        .prefix(&keys::KeyPrefix::NameRecord.bytes())
        .map(|(_, value)| decode(&value))
        .collect()
}

// Owner index

pub(crate) fn set_owner_index(
    store: &mut dyn KvStore,
    owner: &AccountId,
    tld: &str,
    name: &str,
) -> Result<()> {
    store.set(&keys::owner_index_key(owner, tld, name)?, Vec::new());
    Ok(())
}

pub(crate) fn delete_owner_index(
    store: &mut dyn KvStore,
    owner: &AccountId,
    tld: &str,
    name: &str,
) -> Result<()> {
    store.delete(&keys::owner_index_key(owner, tld, name)?);
    Ok(())
}

/// Whether `owner` is indexed as holding `(tld, name)`
pub fn has_owner_index(store: &dyn KvStore, owner: &AccountId, tld: &str, name: &str) -> bool {
    keys::owner_index_key(owner, tld, name).map_or(false, |key| store.has(&key))
}

/// `(tld, name)` pairs indexed under `owner`, in key order
pub fn owned_names(store: &dyn KvStore, owner: &AccountId) -> Vec<(String, String)> {
    store
        .prefix(&keys::owner_index_prefix(owner))
        .filter_map(|(key, _)| keys::decode_owner_index_key(&key))
        .map(|(_, tld, name)| (tld, name))
        .collect()
}

// Profiles

/// Profile of `(tld, name)`
pub fn get_profile(store: &dyn KvStore, tld: &str, name: &str) -> Result<Option<Profile>> {
    store::load(store, &keys::profile_key(tld, name)?)
}

/// Overwrite the profile of `(tld, name)`
pub fn set_profile(store: &mut dyn KvStore, tld: &str, name: &str, profile: &Profile) -> Result<()> {
    store::save(store, &keys::profile_key(tld, name)?, profile)
}

/// Whether `(tld, name)` has a stored profile
pub fn has_profile(store: &dyn KvStore, tld: &str, name: &str) -> bool {
    keys::profile_key(tld, name).map_or(false, |key| store.has(&key))
}

/// Remove the profile of `(tld, name)`
pub fn delete_profile(store: &mut dyn KvStore, tld: &str, name: &str) -> Result<()> {
    store.delete(&keys::profile_key(tld, name)?);
    Ok(())
}

// DNS records

/// DNS record of `record_type` for `(tld, name)`
pub fn get_dns_record(
    store: &dyn KvStore,
    tld: &str,
    name: &str,
    record_type: u16,
) -> Result<Option<DnsRecord>> {
    store::load(store, &keys::dns_record_key(tld, name, record_type)?)
}

/// Overwrite the DNS record of `record.record_type` for `(tld, name)`
pub fn set_dns_record(store: &mut dyn KvStore, tld: &str, name: &str, record: &DnsRecord) -> Result<()> {
    store::save(store, &keys::dns_record_key(tld, name, record.record_type)?, record)
}

/// Whether a record of `record_type` exists for `(tld, name)`
pub fn has_dns_record(store: &dyn KvStore, tld: &str, name: &str, record_type: u16) -> bool {
    keys::dns_record_key(tld, name, record_type).map_or(false, |key| store.has(&key))
}

/// Remove the DNS record of `record_type` for `(tld, name)`
pub fn delete_dns_record(store: &mut dyn KvStore, tld: &str, name: &str, record_type: u16) -> Result<()> {
    store.delete(&keys::dns_record_key(tld, name, record_type)?);
    Ok(())
}

/// All DNS records of `(tld, name)`, ordered by record type
pub fn dns_records(store: &dyn KvStore, tld: &str, name: &str) -> Result<Vec<DnsRecord>> {
    store
        .prefix(&keys::dns_record_prefix(tld, name)?)
        .map(|(_, value)| decode(&value))
        .collect()
}

// TLD configurations

/// Configuration of `tld`
pub fn get_tld_config(store: &dyn KvStore, tld: &str) -> Result<Option<TldConfig>> {
    store::load(store, &keys::tld_config_key(tld))
}

/// Overwrite the configuration of `config.tld`
pub fn set_tld_config(store: &mut dyn KvStore, config: &TldConfig) -> Result<()> {
    store::save(store, &keys::tld_config_key(&config.tld), config)
}

/// Whether `tld` is configured
pub fn has_tld_config(store: &dyn KvStore, tld: &str) -> bool {
    store.has(&keys::tld_config_key(tld))
}

/// Every TLD configuration in key order
pub fn tld_configs(store: &dyn KvStore) -> Result<Vec<TldConfig>> {
    store
        .prefix(&keys::KeyPrefix::TldConfig.bytes())
        .map(|(_, value)| decode(&value))
        .collect()
}

// Params

/// Stored parameters, defaults if never set
pub fn get_params(store: &dyn KvStore) -> Result<Params> {
    Ok(store::load(store, &keys::params_key())?.unwrap_or_default())
}

/// Overwrite the parameters
pub fn set_params(store: &mut dyn KvStore, params: &Params) -> Result<()> {
    store::save(store, &keys::params_key(), params)
}

// Peers

/// Peer `address` of `(tld, name)`
pub fn get_peer(store: &dyn KvStore, tld: &str, name: &str, address: &str) -> Result<Option<Peer>> {
    let peer: Option<Peer> = store::load(store, &keys::peer_key(tld, name, address)?)?;
    Ok(peer.filter(|p| p.address == address))
}

/// Overwrite peer `peer.address` of `(tld, name)`
pub fn set_peer(store: &mut dyn KvStore, tld: &str, name: &str, peer: &Peer) -> Result<()> {
    store::save(store, &keys::peer_key(tld, name, &peer.address)?, peer)
}

/// All peers of `(tld, name)`, active and revoked, in key order
pub fn peers(store: &dyn KvStore, tld: &str, name: &str) -> Result<Vec<Peer>> {
    store
        .prefix(&keys::peer_prefix(tld, name)?)
        .map(|(_, value)| decode(&value))
        .collect()
}

/// The name `address` is linked to, if any
pub fn get_peer_link(store: &dyn KvStore, address: &str) -> Result<Option<PeerLink>> {
    let link: Option<PeerLink> = store::load(store, &keys::peer_reverse_key(address))?;
    Ok(link.filter(|l| l.address == address))
}

/// Link `link.address` to `(link.tld, link.name)`
pub fn set_peer_link(store: &mut dyn KvStore, link: &PeerLink) -> Result<()> {
    store::save(store, &keys::peer_reverse_key(&link.address), link)
}

/// Drop the reverse link of `address`
pub fn delete_peer_link(store: &mut dyn KvStore, address: &str) {
    store.delete(&keys::peer_reverse_key(address));
}

// Content roots

/// Stored content root of `(tld, name)`
pub fn get_content_root(store: &dyn KvStore, tld: &str, name: &str) -> Result<Option<ContentRoot>> {
    store::load(store, &keys::content_root_key(tld, name)?)
}

pub(crate) fn set_content_root(
    store: &mut dyn KvStore,
    tld: &str,
    name: &str,
    root: &ContentRoot,
) -> Result<()> {
    store::save(store, &keys::content_root_key(tld, name)?, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{dns_types, PriceTier};
    use crate::store::MemStore;

    fn owner(byte: u8) -> AccountId {
        AccountId::new([byte; 20])
    }

    #[test]
    fn test_name_record_round_trip() {
        let mut store = MemStore::new();
        assert_eq!(get_name_record(&store, "epix", "alice").unwrap(), None);

        let record = NameRecord {
            name: "alice".to_string(),
            tld: "epix".to_string(),
            owner: owner(1),
            registered_at: 12,
        };
        set_name_record(&mut store, &record).unwrap();
        assert_eq!(get_name_record(&store, "epix", "alice").unwrap(), Some(record.clone()));
        assert!(has_name_record(&store, "epix", "alice"));
        assert!(!has_name_record(&store, "epix", "alic"));
        assert_eq!(name_records(&store).unwrap(), vec![record]);
    }

    #[test]
    fn test_owner_index() {
        let mut store = MemStore::new();
        set_owner_index(&mut store, &owner(1), "epix", "bob").unwrap();
        set_owner_index(&mut store, &owner(1), "epix", "alice").unwrap();
        set_owner_index(&mut store, &owner(2), "epix", "carol").unwrap();

        assert_eq!(
            owned_names(&store, &owner(1)),
            vec![
                ("epix".to_string(), "alice".to_string()),
                ("epix".to_string(), "bob".to_string())
            ]
        );
        delete_owner_index(&mut store, &owner(1), "epix", "alice").unwrap();
        assert!(!has_owner_index(&store, &owner(1), "epix", "alice"));
        assert!(has_owner_index(&store, &owner(2), "epix", "carol"));
    }

    #[test]
    fn test_profile_overwrite_and_delete() {
        let mut store = MemStore::new();
        let first = Profile {
            avatar: "ipfs://a".to_string(),
            bio: "hello".to_string(),
        };
        set_profile(&mut store, "epix", "alice", &first).unwrap();
        let second = Profile {
            avatar: String::new(),
            bio: "bye".to_string(),
        };
        set_profile(&mut store, "epix", "alice", &second).unwrap();
        assert_eq!(get_profile(&store, "epix", "alice").unwrap(), Some(second));

        delete_profile(&mut store, "epix", "alice").unwrap();
        assert!(!has_profile(&store, "epix", "alice"));
        assert_eq!(get_profile(&store, "epix", "alice").unwrap(), None);
    }

    #[test]
    fn test_dns_records_are_per_type_and_scoped_to_name() {
        let mut store = MemStore::new();
        set_dns_record(&mut store, "epix", "ab", &DnsRecord::new(dns_types::TXT, "v=1", 60)).unwrap();
        set_dns_record(&mut store, "epix", "ab", &DnsRecord::new(dns_types::A, "1.2.3.4", 300)).unwrap();
        set_dns_record(&mut store, "epix", "ab", &DnsRecord::new(dns_types::A, "5.6.7.8", 300)).unwrap();
        set_dns_record(&mut store, "epix", "abc", &DnsRecord::new(dns_types::A, "9.9.9.9", 300)).unwrap();

        let records = dns_records(&store, "epix", "ab").unwrap();
        assert_eq!(
            records,
            vec![DnsRecord::new(dns_types::A, "5.6.7.8", 300), DnsRecord::new(dns_types::TXT, "v=1", 60)]
        );

        delete_dns_record(&mut store, "epix", "ab", dns_types::A).unwrap();
        assert!(!has_dns_record(&store, "epix", "ab", dns_types::A));
        assert!(has_dns_record(&store, "epix", "abc", dns_types::A));
    }

    #[test]
    fn test_tld_configs_and_params() {
        let mut store = MemStore::new();
        assert_eq!(get_params(&store).unwrap(), Params::default());

        let epix = TldConfig::new("epix", true, vec![PriceTier::new(u32::MAX, 1)]);
        let ab = TldConfig::new("ab", false, vec![PriceTier::new(3, 5)]);
        set_tld_config(&mut store, &epix).unwrap();
        set_tld_config(&mut store, &ab).unwrap();
        assert!(has_tld_config(&store, "epix"));
        assert_eq!(tld_configs(&store).unwrap(), vec![ab, epix]);

        let params = Params {
            min_name_length: 3,
            ..Params::default()
        };
        set_params(&mut store, &params).unwrap();
        assert_eq!(get_params(&store).unwrap(), params);
    }

    #[test]
    fn test_peers_and_links() {
        let mut store = MemStore::new();
        let peer = Peer::active("peer-1", "home", 5);
        set_peer(&mut store, "epix", "alice", &peer).unwrap();
        assert_eq!(get_peer(&store, "epix", "alice", "peer-1").unwrap(), Some(peer.clone()));
        assert_eq!(get_peer(&store, "epix", "alice", "peer-2").unwrap(), None);
        assert_eq!(peers(&store, "epix", "alice").unwrap(), vec![peer]);
        assert!(peers(&store, "epix", "bob").unwrap().is_empty());

        let link = PeerLink {
            tld: "epix".to_string(),
            name: "alice".to_string(),
            address: "peer-1".to_string(),
        };
        set_peer_link(&mut store, &link).unwrap();
        assert_eq!(get_peer_link(&store, "peer-1").unwrap(), Some(link));
        delete_peer_link(&mut store, "peer-1");
        assert_eq!(get_peer_link(&store, "peer-1").unwrap(), None);
    }

    #[test]
    fn test_content_root_round_trip() {
        let mut store = MemStore::new();
        assert_eq!(get_content_root(&store, "epix", "alice").unwrap(), None);
        let root = ContentRoot {
            root: "ab".repeat(32),
            updated_at: 9,
        };
        set_content_root(&mut store, "epix", "alice", &root).unwrap();
        assert_eq!(get_content_root(&store, "epix", "alice").unwrap(), Some(root));
    }

    #[test]
    fn test_unencodable_tld_reads_as_absent_and_rejects_writes() {
        let mut store = MemStore::new();
        let long = "x".repeat(keys::MAX_COMPONENT_LEN + 1);

        assert!(!has_name_record(&store, &long, "alice"));
        assert!(!has_profile(&store, &long, "alice"));
        assert!(!has_dns_record(&store, "epix", &long, dns_types::A));
        assert!(get_name_record(&store, &long, "alice").is_err());
        assert!(peers(&store, "epix", &long).is_err());

        let profile = Profile::default();
        assert!(set_profile(&mut store, &long, "alice", &profile).is_err());
        assert!(set_owner_index(&mut store, &owner(1), &long, "alice").is_err());
        assert!(store.is_empty());
    }
}
