//! Aggregate statistics served from the O(1) counters

use serde::{Deserialize, Serialize};

/// Per-TLD statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TldStats {
    /// The label
    pub tld: String,

    /// Names registered under it
    pub name_count: u64,

    /// Registration fees burned under it
    pub fees_burned: u128,

    /// Whether registrations are open
    pub enabled: bool,
}

/// Registry-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Total registered names
    pub total_names: u64,

    /// Total registration fees burned
    pub total_fees_burned: u128,

    /// Per-TLD breakdown in key order
    pub tlds: Vec<TldStats>,
}
