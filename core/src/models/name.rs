//! Name records and the side records attached to them

use serde::{Deserialize, Serialize};

use super::account::AccountId;

/// Authoritative ownership entry for one `(tld, name)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Name label, lowercase
    pub name: String,

    /// Top-level label, lowercase
    pub tld: String,

    /// Current owner
    pub owner: AccountId,

    /// Block height at creation
    pub registered_at: u64,
}

impl NameRecord {
    /// The complete name, e.g. `alice.epix`
    pub fn full_name(&self) -> String {
        full_name(&self.tld, &self.name)
    }
}

/// `name.tld` for display and hashing
pub fn full_name(tld: &str, name: &str) -> String {
    format!("{}.{}", name, tld)
}

/// Owner-controlled profile, overwritten wholesale on update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Avatar URI
    pub avatar: String,

    /// Free-form biography
    pub bio: String,
}

/// DNS record type codes
pub mod dns_types {
    /// IPv4 address
    pub const A: u16 = 1;
    /// Name server
    pub const NS: u16 = 2;
    /// Canonical name
    pub const CNAME: u16 = 5;
    /// Mail exchange
    pub const MX: u16 = 15;
    /// Text
    pub const TXT: u16 = 16;
    /// IPv6 address
    pub const AAAA: u16 = 28;
    /// Service locator
    pub const SRV: u16 = 33;
}

/// One DNS entry; a name holds at most one value per record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Numeric record type, see [`dns_types`]
    pub record_type: u16,

    /// Record payload
    pub value: String,

    /// Time to live in seconds
    pub ttl: u32,
}

impl DnsRecord {
    /// Create a record
    pub fn new(record_type: u16, value: impl Into<String>, ttl: u32) -> Self {
        DnsRecord {
            record_type,
            value: value.into(),
            ttl,
        }
    }
}
