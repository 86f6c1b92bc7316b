//! Content roots of names, derived from their active peers
//!
//! A root is recomputed and stored in the same transition as every peer
//! change, so reading it never touches the peer set.

use log::debug;

use crate::error::Result;
use crate::merkle::{PeerProof, PeerTree};
use crate::models::{full_name, ContentRoot};
use crate::records;
use crate::store::KvStore;

/// Addresses of the active peers of `(tld, name)`
pub fn active_addresses(store: &dyn KvStore, tld: &str, name: &str) -> Result<Vec<String>> {
    Ok(records::peers(store, tld, name)?
        .into_iter()
        .filter(|peer| peer.is_active())
        .map(|peer| peer.address)
        .collect())
}

/// Tree over the active peers of `(tld, name)`
pub fn peer_tree(store: &dyn KvStore, tld: &str, name: &str) -> Result<PeerTree> {
    Ok(PeerTree::new(active_addresses(store, tld, name)?))
}

/// Recompute and store the root of `(tld, name)` at `height`
pub fn recompute_root(store: &mut dyn KvStore, tld: &str, name: &str, height: u64) -> Result<ContentRoot> {
    let tree = peer_tree(store, tld, name)?;
    let root = ContentRoot {
        root: tree.root_hex(tld, name),
        updated_at: height,
    };
    records::set_content_root(store, tld, name, &root)?;
    debug!(
        "content root of {} is {:?} over {} active peers",
        full_name(tld, name),
        root.root,
        tree.num_leaves()
    );
    Ok(root)
}

/// Stored root of `(tld, name)`, the empty root if never computed
pub fn get_root(store: &dyn KvStore, tld: &str, name: &str) -> Result<ContentRoot> {
    Ok(records::get_content_root(store, tld, name)?.unwrap_or_default())
}

/// Membership proof for an active peer, `None` if the address is not active
pub fn peer_proof(store: &dyn KvStore, tld: &str, name: &str, address: &str) -> Result<Option<PeerProof>> {
    Ok(peer_tree(store, tld, name)?.generate_proof(address))
}
