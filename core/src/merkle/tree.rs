//! Binary Merkle tree over a set of peer addresses
//!
//! Leaves are `sha256(address)` in ascending address order. Each level pairs
//! adjacent nodes as `sha256(left || right)`; a trailing node without a
//! partner is promoted to the next level unchanged rather than paired with
//! itself.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use super::proof::{PeerProof, ProofDirection, ProofItem};
use super::domain_separate;
use crate::crypto;

/// Merkle tree over a sorted, de-duplicated address set
#[derive(Clone, PartialEq, Eq)]
pub struct PeerTree {
    /// Sorted leaf addresses
    addresses: Vec<String>,

    /// Levels from leaves (index 0) up to the single top node
    levels: Vec<Vec<[u8; 32]>>,
}

impl Debug for PeerTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "PeerTree {{ leaves: {}, height: {}, top: {} }}",
            self.addresses.len(),
            self.levels.len(),
            self.top_hash()
                .map(|h| hex::encode(&h[0..4]))
                .unwrap_or_else(|| "-".to_string())
        )
    }
}

impl PeerTree {
    /// Build the tree; input order and duplicates do not matter
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut addresses: Vec<String> = addresses.into_iter().map(Into::into).collect();
        addresses.sort();
        addresses.dedup();

        let mut levels = Vec::new();
        let mut level: Vec<[u8; 32]> = addresses.iter().map(|a| crypto::sha256(a.as_bytes())).collect();
        while level.len() > 1 {
            let next = level
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => crypto::sha256_concat(left, right),
                    _ => pair[0],
                })
                .collect();
            levels.push(level);
            level = next;
        }
        if !level.is_empty() {
            levels.push(level);
        }

        PeerTree { addresses, levels }
    }

    /// Number of leaves
    pub fn num_leaves(&self) -> usize {
        self.addresses.len()
    }

    /// Whether the tree has no leaves
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Number of levels including the leaves
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Sorted leaf addresses
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Top node before domain separation
    pub fn top_hash(&self) -> Option<[u8; 32]> {
        self.levels.last().and_then(|level| level.first()).copied()
    }

    /// Published root for `name.tld`, `None` for an empty tree
    pub fn root(&self, tld: &str, name: &str) -> Option<[u8; 32]> {
        self.top_hash().map(|top| domain_separate(tld, name, &top))
    }

    /// Hex encoded root, empty for an empty tree
    pub fn root_hex(&self, tld: &str, name: &str) -> String {
        self.root(tld, name).map(hex::encode).unwrap_or_default()
    }

    /// Inclusion proof for `address`, `None` if it is not a leaf
    pub fn generate_proof(&self, address: &str) -> Option<PeerProof> {
        let leaf = self
            .addresses
            .binary_search_by(|a| a.as_str().cmp(address))
            .ok()?;

        let mut items = Vec::new();
        let mut position = leaf;
        for level in &self.levels[..self.levels.len() - 1] {
            if position % 2 == 1 {
                items.push(ProofItem {
                    hash: level[position - 1],
                    direction: ProofDirection::Left,
                });
            } else if position + 1 < level.len() {
                items.push(ProofItem {
                    hash: level[position + 1],
                    direction: ProofDirection::Right,
                });
            }
            // A trailing node is promoted and contributes no item
            position /= 2;
        }

        Some(PeerProof::new(address.to_string(), leaf, items))
    }
}
