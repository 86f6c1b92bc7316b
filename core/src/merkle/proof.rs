//! Membership proofs for published content roots

use std::fmt::{Debug, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use super::domain_separate;
use crate::crypto;
use crate::error::Result;

/// Side on which the sibling sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofDirection {
    /// Sibling is the left child
    Left,

    /// Sibling is the right child
    Right,
}

/// One sibling on the path from a leaf to the top
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofItem {
    /// Hash of the sibling node
    pub hash: [u8; 32],

    /// Side of the sibling
    pub direction: ProofDirection,
}

impl Debug for ProofItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "ProofItem {{ hash: {}, direction: {:?} }}",
            hex::encode(&self.hash[0..4]),
            self.direction
        )
    }
}

/// Proof that an address is in the active peer set behind a content root
///
/// Levels where the node was promoted without a partner contribute no item,
/// so a proof can be shorter than the tree height.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerProof {
    /// The proven peer address
    pub address: String,

    /// Leaf position in sorted order
    pub position: usize,

    /// Siblings from the leaf upwards
    pub items: Vec<ProofItem>,
}

impl Debug for PeerProof {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "PeerProof {{ address: {}, position: {}, items: {:?} }}",
            self.address, self.position, self.items
        )
    }
}

impl PeerProof {
    /// Create a proof
    pub fn new(address: String, position: usize, items: Vec<ProofItem>) -> Self {
        PeerProof {
            address,
            position,
            items,
        }
    }

    /// Top hash implied by the proof, before domain separation
    pub fn calculate_top(&self) -> [u8; 32] {
        self.items
            .iter()
            .fold(crypto::sha256(self.address.as_bytes()), |current, item| match item.direction {
                ProofDirection::Left => crypto::sha256_concat(&item.hash, &current),
                ProofDirection::Right => crypto::sha256_concat(&current, &item.hash),
            })
    }

    /// Published root implied by the proof for `name.tld`
    pub fn calculate_root(&self, tld: &str, name: &str) -> [u8; 32] {
        domain_separate(tld, name, &self.calculate_top())
    }

    /// Check the proof against a hex encoded content root
    ///
    /// A malformed hex string is an error; a well-formed root of the wrong
    /// length, or the empty root, simply does not verify.
    pub fn verify(&self, tld: &str, name: &str, root_hex: &str) -> Result<bool> {
        let decoded = hex::decode(root_hex)?;
        let expected: [u8; 32] = match decoded.as_slice().try_into() {
            Ok(bytes) => bytes,
            Err(_) => return Ok(false),
        };
        Ok(crypto::verify_hash(&expected, &self.calculate_root(tld, name)))
    }

    /// Number of proof items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the proof has no items (single-leaf tree)
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{sha256, sha256_concat};
    use crate::merkle::PeerTree;

    #[test]
    fn test_manual_proof() {
        //        top
        //       /   \
        //     ab     c
        //    /  \
        //   a    b
        let (a, b, c) = (sha256(b"a"), sha256(b"b"), sha256(b"c"));
        let top = sha256_concat(&sha256_concat(&a, &b), &c);
        let root = hex::encode(domain_separate("epix", "alice", &top));

        let proof = PeerProof::new(
            "b".to_string(),
            1,
            vec![
                ProofItem {
                    hash: a,
                    direction: ProofDirection::Left,
                },
                ProofItem {
                    hash: c,
                    direction: ProofDirection::Right,
                },
            ],
        );
        assert_eq!(proof.calculate_top(), top);
        assert!(proof.verify("epix", "alice", &root).unwrap());
        assert!(!proof.verify("epix", "bob", &root).unwrap());
    }

    #[test]
    fn test_promoted_leaf_has_short_proof() {
        let tree = PeerTree::new(["a", "b", "c"]);
        let proof = tree.generate_proof("c").unwrap();
        assert_eq!(proof.len(), 1);
        assert_eq!(proof.items[0].direction, ProofDirection::Left);
    }

    #[test]
    fn test_tampered_proof() {
        let tree = PeerTree::new(["a", "b", "c", "d"]);
        let root = tree.root_hex("epix", "alice");
        let proof = tree.generate_proof("a").unwrap();

        let mut wrong_address = proof.clone();
        wrong_address.address = "x".to_string();
        assert!(!wrong_address.verify("epix", "alice", &root).unwrap());

        let mut flipped = proof.clone();
        flipped.items[0].hash[0] ^= 0xff;
        assert!(!flipped.verify("epix", "alice", &root).unwrap());
    }

    #[test]
    fn test_malformed_roots() {
        let tree = PeerTree::new(["a"]);
        let proof = tree.generate_proof("a").unwrap();
        assert!(proof.is_empty());
        assert!(proof.verify("epix", "alice", "zz").is_err());
        assert!(!proof.verify("epix", "alice", "").unwrap());
        assert!(!proof.verify("epix", "alice", "abcd").unwrap());
    }
}
