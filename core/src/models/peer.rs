//! EpixNet peers and the content root derived from them

use serde::{Deserialize, Serialize};

/// Lifecycle of a peer link. Peers are never deleted; revocation is recorded
/// in place so the link history stays auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerStatus {
    /// Linked and counted in the content root
    Active,

    /// Unlinked at the given height
    Revoked {
        /// Height of revocation
        at: u64,
    },
}

/// A network peer linked to a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    /// Peer address, opaque to the registry
    pub address: String,

    /// Owner-chosen label
    pub label: String,

    /// Height at which the peer was (last) linked
    pub added_at: u64,

    /// Current status
    pub status: PeerStatus,
}

impl Peer {
    /// A freshly linked peer
    pub fn active(address: impl Into<String>, label: impl Into<String>, added_at: u64) -> Self {
        Peer {
            address: address.into(),
            label: label.into(),
            added_at,
            status: PeerStatus::Active,
        }
    }

    /// Whether the peer counts toward the content root
    pub fn is_active(&self) -> bool {
        self.status == PeerStatus::Active
    }

    /// Revocation height, zero if never revoked
    pub fn revoked_at(&self) -> u64 {
        match self.status {
            PeerStatus::Active => 0,
            PeerStatus::Revoked { at } => at,
        }
    }

    /// Mark the peer revoked at `height`
    pub fn revoke(&mut self, height: u64) {
        self.status = PeerStatus::Revoked { at: height };
    }
}

/// Reverse link from a peer address to the name it is linked to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerLink {
    /// Linked TLD
    pub tld: String,

    /// Linked name
    pub name: String,

    /// Full peer address, kept to rule out digest collisions
    pub address: String,
}

/// Published Merkle digest of a name's active peer set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRoot {
    /// Lowercase hex digest, empty when the name has no active peers
    pub root: String,

    /// Height of the last recomputation
    pub updated_at: u64,
}

impl ContentRoot {
    /// Whether the root is the "no content" sentinel
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
