//! Stateless validation of user-supplied labels and record fields

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{RegistryError, Result};
use crate::models::DnsRecord;

/// Hard upper bound on a name label, independent of module parameters
pub const MAX_NAME_LENGTH: usize = 64;

/// Longest accepted peer address
pub const MAX_PEER_ADDRESS_LENGTH: usize = 256;

/// Longest accepted peer label
pub const MAX_PEER_LABEL_LENGTH: usize = 64;

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("static regex"))
}

fn tld_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z]{2,16}$").expect("static regex"))
}

fn denom_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9/:._-]{2,127}$").expect("static regex"))
}

/// Lowercase a label; names and TLDs are case-insensitive
pub fn normalize(label: &str) -> String {
    label.to_lowercase()
}

/// Check that a name label is 1-64 lowercase alphanumerics with optional
/// internal hyphens
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RegistryError::InvalidName("name cannot be empty".to_string()));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(RegistryError::InvalidName(format!(
            "name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if !name_regex().is_match(&normalize(name)) {
        return Err(RegistryError::InvalidName(
            "name must be lowercase alphanumeric with optional hyphens, cannot start or end with a hyphen"
                .to_string(),
        ));
    }
    Ok(())
}

/// Check that a TLD is 2-16 lowercase alphabetic characters
pub fn validate_tld(tld: &str) -> Result<()> {
    if tld.is_empty() {
        return Err(RegistryError::InvalidTld("TLD cannot be empty".to_string()));
    }
    if !tld_regex().is_match(&normalize(tld)) {
        return Err(RegistryError::InvalidTld(
            "TLD must be 2-16 lowercase alphabetic characters".to_string(),
        ));
    }
    Ok(())
}

/// Check a coin denomination
pub fn validate_denom(denom: &str) -> Result<()> {
    if !denom_regex().is_match(denom) {
        return Err(RegistryError::InvalidParams(format!("invalid denom: {denom:?}")));
    }
    Ok(())
}

/// Check the fields of a DNS record
pub fn validate_dns_record(record: &DnsRecord) -> Result<()> {
    if record.record_type == 0 {
        return Err(RegistryError::InvalidDnsRecord("record type cannot be 0".to_string()));
    }
    if record.value.is_empty() {
        return Err(RegistryError::InvalidDnsRecord("record value cannot be empty".to_string()));
    }
    Ok(())
}

/// Check peer address and label bounds
pub fn validate_peer(address: &str, label: &str) -> Result<()> {
    if address.is_empty() {
        return Err(RegistryError::InvalidPeer("peer address cannot be empty".to_string()));
    }
    if address.len() > MAX_PEER_ADDRESS_LENGTH {
        return Err(RegistryError::InvalidPeer(format!(
            "peer address exceeds {} bytes",
            MAX_PEER_ADDRESS_LENGTH
        )));
    }
    if label.len() > MAX_PEER_LABEL_LENGTH {
        return Err(RegistryError::InvalidPeer(format!(
            "peer label exceeds {} bytes",
            MAX_PEER_LABEL_LENGTH
        )));
    }
    Ok(())
}
