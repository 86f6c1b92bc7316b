//! Data models for the registry
//!
//! This module provides the records persisted by the registry: name records
//! and their side records (profile, DNS entries, peers, content root), TLD
//! configurations, module parameters and the statistics derived from the
//! counters.

mod account;
mod name;
mod params;
mod peer;
mod stats;
mod tld;

pub use account::AccountId;
pub use name::{dns_types, full_name, DnsRecord, NameRecord, Profile};
pub use params::{Coin, Params, DEFAULT_FEE_DENOM, DEFAULT_MAX_NAME_LENGTH, DEFAULT_MIN_NAME_LENGTH};
pub use peer::{ContentRoot, Peer, PeerLink, PeerStatus};
pub use stats::{RegistryStats, TldStats};
pub use tld::{PriceTier, TldConfig};
