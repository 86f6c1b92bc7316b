//! Merkle commitments over peer sets
//!
//! The top of a [`PeerTree`] is bound to the name it belongs to by hashing
//! `sha256(name.tld) || top`, so two names with the same peers never share
//! a published root.

mod proof;
mod tree;

pub use proof::{PeerProof, ProofDirection, ProofItem};
pub use tree::PeerTree;

use crate::crypto;
use crate::models::full_name;

/// Digest of `name.tld`, the domain tag of its content root
pub fn name_digest(tld: &str, name: &str) -> [u8; 32] {
    crypto::sha256(full_name(tld, name).as_bytes())
}

/// Bind a tree top to `name.tld`
pub fn domain_separate(tld: &str, name: &str, top: &[u8; 32]) -> [u8; 32] {
    crypto::sha256_concat(&name_digest(tld, name), top)
}

/// Hex content root of `addresses` for `name.tld`, empty if there are none
pub fn content_root<I, S>(tld: &str, name: &str, addresses: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    PeerTree::new(addresses).root_hex(tld, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_domain_separation() {
        let peers = ["peer-1", "peer-2", "peer-3"];
        let alice = content_root("epix", "alice", peers);
        let bob = content_root("epix", "bob", peers);
        let other_tld = content_root("xid", "alice", peers);
        assert_ne!(alice, bob);
        assert_ne!(alice, other_tld);
        assert_eq!(alice.len(), 64);
    }

    #[test]
    fn test_known_single_peer_root() {
        let top = crypto::sha256(b"peer-1");
        let expected = hex::encode(crypto::sha256_concat(&crypto::sha256(b"alice.epix"), &top));
        assert_eq!(content_root("epix", "alice", ["peer-1"]), expected);
    }

    proptest! {
        #[test]
        fn root_is_independent_of_order_and_duplicates(
            (peers, shuffled) in proptest::collection::btree_set("[a-zA-Z0-9]{1,24}", 1..20)
                .prop_map(|set| set.into_iter().collect::<Vec<_>>())
                .prop_flat_map(|peers| (Just(peers.clone()), Just(peers).prop_shuffle())),
            repeat in 0usize..3,
        ) {
            let expected = content_root("epix", "alice", peers.clone());
            let mut input = shuffled.clone();
            input.extend(shuffled.into_iter().take(repeat));
            prop_assert_eq!(content_root("epix", "alice", input), expected);
        }
    }

    #[test]
    fn test_empty_set_has_empty_root() {
        assert_eq!(content_root("epix", "alice", Vec::<String>::new()), "");
    }
}
