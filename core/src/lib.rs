//! # xID Registry Core
//!
//! Deterministic state machine for the xID name registry: hierarchical
//! `name.tld` ownership with tiered registration fees that are burned, DNS
//! records and profiles attached to names, and a Merkle content root over
//! each name's linked network peers.
//!
//! Every state transition runs against a [`store::Context`] and commits
//! through [`store::transact`], so a failed operation leaves no trace.
//! [`store::transact_into`] additionally hands the committed events to an
//! [`EventSink`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod content_root;
pub mod counters;
pub mod crypto;
pub mod error;
pub mod events;
pub mod fees;
pub mod genesis;
pub mod keys;
pub mod logging;
pub mod merkle;
pub mod models;
mod ownership;
pub mod pagination;
pub mod records;
pub mod registry;
pub mod store;
pub mod treasury;
pub mod validation;

/// Re-export common types for ease of use
pub use config::RegistryConfig;
pub use error::{ErrorKind, RegistryError, Result};
pub use events::{Event, EventSink};
pub use genesis::{export_genesis, init_genesis, GenesisState};
pub use merkle::{PeerProof, PeerTree};
pub use models::{AccountId, Coin, ContentRoot, DnsRecord, NameRecord, Params, Peer, Profile, TldConfig};
pub use pagination::{Cursor, Page, PageRequest};
pub use registry::Registry;
pub use store::{transact, transact_into, Context, KvStore, MemStore};
pub use treasury::{LedgerTreasury, Treasury};

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Content root of `name.tld` over `addresses`, as published in state
///
/// Order and duplicates in `addresses` do not matter. Returns the empty
/// string when there are no addresses.
pub fn compute_content_root<I, S>(tld: &str, name: &str, addresses: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    merkle::content_root(tld, name, addresses)
}
