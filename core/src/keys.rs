//! Store key encoding
//!
//! Every logical key space starts with a one-byte [`KeyPrefix`]. Variable
//! length components are preceded by a single length byte, except for the
//! trailing component of a key, so keys split unambiguously and all entries
//! of one kind for one `(tld, name)` or one owner sit contiguously under
//! byte-lexicographic iteration. Owners are encoded as their fixed 20 bytes
//! and DNS record types as 2 big-endian bytes. Peer addresses are hashed to
//! an 8-byte digest to bound key length; a digest collision between two
//! addresses under the same name is accepted as negligible.
//!
//! Layouts:
//!
//! ```text
//! name record   [0x01][len tld][tld][name]
//! owner index   [0x02][owner 20][len tld][tld][name]
//! profile       [0x03][len tld][tld][name]
//! dns record    [0x04][len tld][tld][len name][name][type u16 BE]
//! tld config    [0x05][tld]
//! params        [0x06]
//! owner count   [0x07][owner 20]
//! global count  [0x08]
//! tld count     [0x09][tld]
//! global burned [0x0a]
//! tld burned    [0x0b][tld]
//! peer          [0x0c][len tld][tld][len name][name][sha256(addr)[..8]]
//! peer reverse  [0x0d][sha256(addr)[..8]]
//! content root  [0x0e][len tld][tld][name]
//! balance       [0x40][account 20][denom]
//! supply        [0x41][denom]
//! ```

use bytes::{Buf, BufMut};

use crate::crypto;
use crate::error::{RegistryError, Result};
use crate::models::AccountId;

/// Longest component a length byte can describe
pub const MAX_COMPONENT_LEN: usize = u8::MAX as usize;

/// Leading byte of every key space
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Name records
    NameRecord = 0x01,
    /// Owner reverse index
    OwnerIndex = 0x02,
    /// Profiles
    Profile = 0x03,
    /// DNS records
    DnsRecord = 0x04,
    /// TLD configurations
    TldConfig = 0x05,
    /// Module parameters
    Params = 0x06,
    /// Per-owner name counts
    OwnerCount = 0x07,
    /// Global name count
    GlobalNameCount = 0x08,
    /// Per-TLD name counts
    TldNameCount = 0x09,
    /// Global burned-fee total
    GlobalFeesBurned = 0x0a,
    /// Per-TLD burned-fee totals
    TldFeesBurned = 0x0b,
    /// Peers
    Peer = 0x0c,
    /// Peer address to name reverse link
    PeerReverse = 0x0d,
    /// Content roots
    ContentRoot = 0x0e,
    /// Treasury balances
    Balance = 0x40,
    /// Treasury supply per denom
    Supply = 0x41,
}

impl KeyPrefix {
    /// The prefix as a single-byte key
    pub fn bytes(self) -> Vec<u8> {
        vec![self as u8]
    }
}

fn put_len_prefixed(buf: &mut Vec<u8>, component: &[u8]) -> std::result::Result<(), String> {
    let len = u8::try_from(component.len()).map_err(|_| {
        format!(
            "{} bytes does not fit a key component of at most {} bytes",
            component.len(),
            MAX_COMPONENT_LEN
        )
    })?;
    buf.put_u8(len);
    buf.put_slice(component);
    Ok(())
}

fn put_tld(buf: &mut Vec<u8>, tld: &str) -> Result<()> {
    put_len_prefixed(buf, tld.as_bytes()).map_err(|e| RegistryError::InvalidTld(format!("TLD of {}", e)))
}

fn put_name(buf: &mut Vec<u8>, name: &str) -> Result<()> {
    put_len_prefixed(buf, name.as_bytes()).map_err(|e| RegistryError::InvalidName(format!("name of {}", e)))
}

/// `[prefix][len tld][tld][name]`, shared by name records, profiles and
/// content roots
fn tld_name_key(prefix: KeyPrefix, tld: &str, name: &str) -> Result<Vec<u8>> {
    let mut key = Vec::with_capacity(2 + tld.len() + name.len());
    key.put_u8(prefix as u8);
    put_tld(&mut key, tld)?;
    key.put_slice(name.as_bytes());
    Ok(key)
}

/// `[prefix][len tld][tld][len name][name]`, the per-name prefix of the
/// multi-entry spaces
fn tld_name_prefix(prefix: KeyPrefix, tld: &str, name: &str) -> Result<Vec<u8>> {
    let mut key = Vec::with_capacity(3 + tld.len() + name.len());
    key.put_u8(prefix as u8);
    put_tld(&mut key, tld)?;
    put_name(&mut key, name)?;
    Ok(key)
}

fn prefix_with_tail(prefix: KeyPrefix, tail: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + tail.len());
    key.put_u8(prefix as u8);
    key.put_slice(tail);
    key
}

/// Key of the record for `(tld, name)`
///
/// Fails when `tld` is too long for its length byte, as do the other
/// builders with a length-prefixed component.
pub fn name_record_key(tld: &str, name: &str) -> Result<Vec<u8>> {
    tld_name_key(KeyPrefix::NameRecord, tld, name)
}

/// Owner index entry for `(owner, tld, name)`
pub fn owner_index_key(owner: &AccountId, tld: &str, name: &str) -> Result<Vec<u8>> {
    let mut key = owner_index_prefix(owner);
    put_tld(&mut key, tld)?;
    key.put_slice(name.as_bytes());
    Ok(key)
}

/// Prefix of all owner index entries of `owner`
pub fn owner_index_prefix(owner: &AccountId) -> Vec<u8> {
    prefix_with_tail(KeyPrefix::OwnerIndex, owner.as_bytes())
}

/// Profile of `(tld, name)`
pub fn profile_key(tld: &str, name: &str) -> Result<Vec<u8>> {
    tld_name_key(KeyPrefix::Profile, tld, name)
}

/// DNS record of type `record_type` for `(tld, name)`
pub fn dns_record_key(tld: &str, name: &str, record_type: u16) -> Result<Vec<u8>> {
    let mut key = dns_record_prefix(tld, name)?;
    key.put_u16(record_type);
    Ok(key)
}

/// Prefix of all DNS records of `(tld, name)`
pub fn dns_record_prefix(tld: &str, name: &str) -> Result<Vec<u8>> {
    tld_name_prefix(KeyPrefix::DnsRecord, tld, name)
}

/// Configuration of `tld`
pub fn tld_config_key(tld: &str) -> Vec<u8> {
    prefix_with_tail(KeyPrefix::TldConfig, tld.as_bytes())
}

/// Module parameters
pub fn params_key() -> Vec<u8> {
    KeyPrefix::Params.bytes()
}

/// Name count of `owner`
pub fn owner_count_key(owner: &AccountId) -> Vec<u8> {
    prefix_with_tail(KeyPrefix::OwnerCount, owner.as_bytes())
}

/// Global name count
pub fn global_name_count_key() -> Vec<u8> {
    KeyPrefix::GlobalNameCount.bytes()
}

/// Name count of `tld`
pub fn tld_name_count_key(tld: &str) -> Vec<u8> {
    prefix_with_tail(KeyPrefix::TldNameCount, tld.as_bytes())
}

/// Global burned-fee total
pub fn global_fees_burned_key() -> Vec<u8> {
    KeyPrefix::GlobalFeesBurned.bytes()
}

/// Burned-fee total of `tld`
pub fn tld_fees_burned_key(tld: &str) -> Vec<u8> {
    prefix_with_tail(KeyPrefix::TldFeesBurned, tld.as_bytes())
}

/// Peer `address` of `(tld, name)`
pub fn peer_key(tld: &str, name: &str, address: &str) -> Result<Vec<u8>> {
    let mut key = peer_prefix(tld, name)?;
    key.put_slice(&crypto::short_digest(address.as_bytes()));
    Ok(key)
}

/// Prefix of all peers of `(tld, name)`
pub fn peer_prefix(tld: &str, name: &str) -> Result<Vec<u8>> {
    tld_name_prefix(KeyPrefix::Peer, tld, name)
}

/// Reverse link of peer `address`
pub fn peer_reverse_key(address: &str) -> Vec<u8> {
    prefix_with_tail(KeyPrefix::PeerReverse, &crypto::short_digest(address.as_bytes()))
}

/// Content root of `(tld, name)`
pub fn content_root_key(tld: &str, name: &str) -> Result<Vec<u8>> {
    tld_name_key(KeyPrefix::ContentRoot, tld, name)
}

/// Treasury balance of `account` in `denom`
pub fn balance_key(account: &AccountId, denom: &str) -> Vec<u8> {
    let mut key = prefix_with_tail(KeyPrefix::Balance, account.as_bytes());
    key.put_slice(denom.as_bytes());
    key
}

/// Treasury supply of `denom`
pub fn supply_key(denom: &str) -> Vec<u8> {
    prefix_with_tail(KeyPrefix::Supply, denom.as_bytes())
}

/// Split `[len tld][tld][name]` back into `(tld, name)`
///
/// Returns `None` for malformed input.
pub fn decode_tld_name(mut suffix: &[u8]) -> Option<(String, String)> {
    if !suffix.has_remaining() {
        return None;
    }
    let tld_len = suffix.get_u8() as usize;
    if suffix.remaining() < tld_len {
        return None;
    }
    let tld = std::str::from_utf8(&suffix[..tld_len]).ok()?.to_string();
    suffix.advance(tld_len);
    let name = std::str::from_utf8(suffix).ok()?.to_string();
    Some((tld, name))
}

/// Decode a full name record key
pub fn decode_name_record_key(key: &[u8]) -> Option<(String, String)> {
    match key.split_first() {
        Some((&prefix, rest)) if prefix == KeyPrefix::NameRecord as u8 => decode_tld_name(rest),
        _ => None,
    }
}

/// Decode a full owner index key into `(owner, tld, name)`
pub fn decode_owner_index_key(key: &[u8]) -> Option<(AccountId, String, String)> {
    let (&prefix, rest) = key.split_first()?;
    if prefix != KeyPrefix::OwnerIndex as u8 || rest.len() < AccountId::LEN {
        return None;
    }
    let owner = AccountId::from_slice(&rest[..AccountId::LEN]).ok()?;
    let (tld, name) = decode_tld_name(&rest[AccountId::LEN..])?;
    Some((owner, tld, name))
}

/// Smallest key greater than every key starting with `prefix`, or `None` if
/// the prefix is all `0xff`
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
