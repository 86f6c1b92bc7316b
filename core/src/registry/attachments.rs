//! Owner-only mutations of the records attached to a name

use log::debug;

use super::{normalized, require_owned, Registry};
use crate::content_root;
use crate::error::{RegistryError, Result};
use crate::events::{attributes, types, Event};
use crate::models::{full_name, AccountId, ContentRoot, DnsRecord, Peer, PeerLink, Profile};
use crate::records;
use crate::store::Context;
use crate::treasury::Treasury;
use crate::validation;

impl<T: Treasury> Registry<T> {
    /// Overwrite the profile of `name.tld`
    pub fn update_profile(
        &self,
        ctx: &mut Context<'_>,
        owner: &AccountId,
        tld: &str,
        name: &str,
        profile: Profile,
    ) -> Result<()> {
        let (tld, name) = normalized(tld, name)?;
        require_owned(ctx, owner, &tld, &name)?;
        records::set_profile(ctx, &tld, &name, &profile)?;

        ctx.emit(
            Event::new(types::PROFILE_UPDATED)
                .attr(attributes::NAME, &name)
                .attr(attributes::TLD, &tld)
                .attr(attributes::OWNER, owner),
        );
        debug!("profile updated for {}", full_name(&tld, &name));
        Ok(())
    }

    /// Set the record of `record.record_type` on `name.tld`, replacing any
    /// previous value of that type
    pub fn set_dns_record(
        &self,
        ctx: &mut Context<'_>,
        owner: &AccountId,
        tld: &str,
        name: &str,
        record: DnsRecord,
    ) -> Result<()> {
        let (tld, name) = normalized(tld, name)?;
        require_owned(ctx, owner, &tld, &name)?;
        validation::validate_dns_record(&record)?;
        records::set_dns_record(ctx, &tld, &name, &record)?;

        ctx.emit(
            Event::new(types::DNS_RECORD_SET)
                .attr(attributes::NAME, full_name(&tld, &name))
                .attr(attributes::RECORD_TYPE, record.record_type)
                .attr("value", &record.value),
        );
        debug!("dns record {} set for {}", record.record_type, full_name(&tld, &name));
        Ok(())
    }

    /// Delete the record of `record_type` on `name.tld`; deleting a missing
    /// record is an error
    pub fn delete_dns_record(
        &self,
        ctx: &mut Context<'_>,
        owner: &AccountId,
        tld: &str,
        name: &str,
        record_type: u16,
    ) -> Result<()> {
        let (tld, name) = normalized(tld, name)?;
        if record_type == 0 {
            return Err(RegistryError::InvalidDnsRecord("record type cannot be 0".to_string()));
        }
        require_owned(ctx, owner, &tld, &name)?;
        if !records::has_dns_record(ctx, &tld, &name, record_type) {
            return Err(RegistryError::DnsRecordNotFound(format!(
                "record type {} not found for {}",
                record_type,
                full_name(&tld, &name)
            )));
        }
        records::delete_dns_record(ctx, &tld, &name, record_type)?;

        ctx.emit(
            Event::new(types::DNS_RECORD_DELETED)
                .attr(attributes::NAME, full_name(&tld, &name))
                .attr(attributes::RECORD_TYPE, record_type),
        );
        debug!("dns record {} deleted for {}", record_type, full_name(&tld, &name));
        Ok(())
    }

    /// Link peer `address` to `name.tld` and return the new content root
    ///
    /// Setting an address already on this name overwrites it as active. An
    /// address actively linked to another name is rejected.
    pub fn set_peer(
        &self,
        ctx: &mut Context<'_>,
        owner: &AccountId,
        tld: &str,
        name: &str,
        address: &str,
        label: &str,
    ) -> Result<ContentRoot> {
        let (tld, name) = normalized(tld, name)?;
        require_owned(ctx, owner, &tld, &name)?;
        validation::validate_peer(address, label)?;

        if let Some(link) = records::get_peer_link(ctx, address)? {
            let elsewhere = link.tld != tld || link.name != name;
            if elsewhere {
                let active = records::get_peer(ctx, &link.tld, &link.name, address)?
                    .map_or(false, |peer| peer.is_active());
                if active {
                    return Err(RegistryError::PeerAlreadyLinked(format!(
                        "{} is linked to {}",
                        address,
                        full_name(&link.tld, &link.name)
                    )));
                }
            }
        }

        let peer = Peer::active(address, label, ctx.height());
        records::set_peer(ctx, &tld, &name, &peer)?;
        records::set_peer_link(
            ctx,
            &PeerLink {
                tld: tld.clone(),
                name: name.clone(),
                address: address.to_string(),
            },
        )?;
        let height = ctx.height();
        let root = content_root::recompute_root(ctx, &tld, &name, height)?;

        ctx.emit(
            Event::new(types::PEER_SET)
                .attr(attributes::NAME, full_name(&tld, &name))
                .attr(attributes::ADDRESS, address)
                .attr(attributes::LABEL, label)
                .attr(attributes::CONTENT_ROOT, &root.root),
        );
        Ok(root)
    }

    /// Revoke active peer `address` of `name.tld` and return the new content
    /// root; the peer entry is kept with its revocation height
    pub fn revoke_peer(
        &self,
        ctx: &mut Context<'_>,
        owner: &AccountId,
        tld: &str,
        name: &str,
        address: &str,
    ) -> Result<ContentRoot> {
        let (tld, name) = normalized(tld, name)?;
        require_owned(ctx, owner, &tld, &name)?;

        let mut peer = match records::get_peer(ctx, &tld, &name, address)? {
            Some(peer) if peer.is_active() => peer,
            Some(_) => {
                return Err(RegistryError::PeerNotFound(format!(
                    "peer {} is already revoked for {}",
                    address,
                    full_name(&tld, &name)
                )))
            }
            None => {
                return Err(RegistryError::PeerNotFound(format!(
                    "peer {} not found for {}",
                    address,
                    full_name(&tld, &name)
                )))
            }
        };

        let height = ctx.height();
        peer.revoke(height);
        records::set_peer(ctx, &tld, &name, &peer)?;
        if let Some(link) = records::get_peer_link(ctx, address)? {
            if link.tld == tld && link.name == name {
                records::delete_peer_link(ctx, address);
            }
        }
        let root = content_root::recompute_root(ctx, &tld, &name, height)?;

        ctx.emit(
            Event::new(types::PEER_REVOKED)
                .attr(attributes::NAME, full_name(&tld, &name))
                .attr(attributes::ADDRESS, address)
                .attr(attributes::CONTENT_ROOT, &root.root),
        );
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::*;
    use crate::error::{ErrorKind, RegistryError};
    use crate::events::types;
    use crate::merkle;
    use crate::models::{dns_types, DnsRecord, PeerStatus, Profile};
    use crate::records;
    use crate::registry::Registry;
    use crate::store::MemStore;
    use rand::seq::SliceRandom;
    use rand::thread_rng;

    fn with_names() -> (Registry, MemStore) {
        let (registry, mut store) = setup();
        run(&mut store, 2, |ctx| {
            registry.register(ctx, &account(1), "epix", "alice")?;
            registry.register(ctx, &account(2), "epix", "bob")
        })
        .unwrap();
        (registry, store)
    }

    #[test]
    fn test_update_profile() {
        let (registry, mut store) = with_names();
        let profile = Profile {
            avatar: "ipfs://avatar".to_string(),
            bio: "hi".to_string(),
        };
        let committed = run(&mut store, 3, |ctx| {
            registry.update_profile(ctx, &account(1), "epix", "Alice", profile.clone())
        })
        .unwrap();
        assert_eq!(committed.events[0].kind, types::PROFILE_UPDATED);
        assert_eq!(records::get_profile(&store, "epix", "alice").unwrap(), Some(profile));

        let err = run(&mut store, 3, |ctx| {
            registry.update_profile(ctx, &account(2), "epix", "alice", Profile::default())
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let err = run(&mut store, 3, |ctx| {
            registry.update_profile(ctx, &account(1), "epix", "carol", Profile::default())
        })
        .unwrap_err();
        assert!(matches!(err, RegistryError::NameNotFound(_)));
    }

    #[test]
    fn test_dns_set_overwrite_delete() {
        let (registry, mut store) = with_names();
        run(&mut store, 3, |ctx| {
            registry.set_dns_record(ctx, &account(1), "epix", "alice", DnsRecord::new(dns_types::A, "1.1.1.1", 60))?;
            registry.set_dns_record(ctx, &account(1), "epix", "alice", DnsRecord::new(dns_types::A, "2.2.2.2", 60))?;
            registry.set_dns_record(ctx, &account(1), "epix", "alice", DnsRecord::new(dns_types::TXT, "hello", 60))
        })
        .unwrap();
        let stored = records::dns_records(&store, "epix", "alice").unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].value, "2.2.2.2");

        let committed = run(&mut store, 4, |ctx| {
            registry.delete_dns_record(ctx, &account(1), "epix", "alice", dns_types::A)
        })
        .unwrap();
        assert_eq!(committed.events[0].kind, types::DNS_RECORD_DELETED);
        assert_eq!(committed.events[0].attribute("name"), Some("alice.epix"));

        let err = run(&mut store, 5, |ctx| {
            registry.delete_dns_record(ctx, &account(1), "epix", "alice", dns_types::A)
        })
        .unwrap_err();
        assert!(matches!(err, RegistryError::DnsRecordNotFound(_)));
    }

    #[test]
    fn test_dns_validation_and_ownership() {
        let (registry, mut store) = with_names();
        let err = run(&mut store, 3, |ctx| {
            registry.set_dns_record(ctx, &account(1), "epix", "alice", DnsRecord::new(0, "x", 60))
        })
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDnsRecord(_)));

        let err = run(&mut store, 3, |ctx| {
            registry.set_dns_record(ctx, &account(1), "epix", "bob", DnsRecord::new(dns_types::A, "1.1.1.1", 60))
        })
        .unwrap_err();
        assert!(matches!(err, RegistryError::NotOwner(_)));
    }

    #[test]
    fn test_oversized_tld_fails_cleanly() {
        let (registry, mut store) = with_names();
        let before = store.clone();
        let long = "a".repeat(300);

        let results = [
            run(&mut store, 3, |ctx| registry.update_profile(ctx, &account(1), &long, "alice", Profile::default()))
                .map(|_| ()),
            run(&mut store, 3, |ctx| {
                registry.set_dns_record(ctx, &account(1), &long, "alice", DnsRecord::new(dns_types::A, "1.1.1.1", 60))
            })
            .map(|_| ()),
            run(&mut store, 3, |ctx| registry.set_peer(ctx, &account(1), &long, "alice", "peer-1", "")).map(|_| ()),
            run(&mut store, 3, |ctx| registry.revoke_peer(ctx, &account(1), &long, "alice", "peer-1")).map(|_| ()),
            run(&mut store, 3, |ctx| registry.transfer(ctx, &account(1), &account(2), &long, "alice")).map(|_| ()),
        ];
        for result in results {
            assert!(matches!(result, Err(RegistryError::InvalidTld(_))));
        }
        assert_eq!(store, before);
    }

    #[test]
    fn test_delete_dns_record_rejects_type_zero() {
        let (registry, mut store) = with_names();
        // Checked before ownership and before the lookup
        for owner in [account(1), account(2)] {
            let err = run(&mut store, 3, |ctx| registry.delete_dns_record(ctx, &owner, "epix", "alice", 0)).unwrap_err();
            assert!(matches!(err, RegistryError::InvalidDnsRecord(_)));
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn test_set_and_revoke_peer() {
        let (registry, mut store) = with_names();
        let root = run(&mut store, 3, |ctx| {
            registry.set_peer(ctx, &account(1), "epix", "alice", "peer-1", "home")?;
            registry.set_peer(ctx, &account(1), "epix", "alice", "peer-2", "office")
        })
        .unwrap()
        .value;
        assert_eq!(root.updated_at, 3);
        assert_eq!(root.root, merkle::content_root("epix", "alice", ["peer-1", "peer-2"]));

        let committed = run(&mut store, 4, |ctx| {
            registry.revoke_peer(ctx, &account(1), "epix", "alice", "peer-1")
        })
        .unwrap();
        assert_eq!(committed.events[0].kind, types::PEER_REVOKED);
        assert_eq!(committed.value.root, merkle::content_root("epix", "alice", ["peer-2"]));
        assert_eq!(committed.value.updated_at, 4);

        let revoked = records::get_peer(&store, "epix", "alice", "peer-1").unwrap().unwrap();
        assert_eq!(revoked.status, PeerStatus::Revoked { at: 4 });
        assert_eq!(revoked.added_at, 3);
        assert_eq!(records::get_peer_link(&store, "peer-1").unwrap(), None);

        let again = run(&mut store, 5, |ctx| {
            registry.revoke_peer(ctx, &account(1), "epix", "alice", "peer-1")
        });
        assert!(matches!(again, Err(RegistryError::PeerNotFound(_))));
        let missing = run(&mut store, 5, |ctx| {
            registry.revoke_peer(ctx, &account(1), "epix", "alice", "peer-9")
        });
        assert!(matches!(missing, Err(RegistryError::PeerNotFound(_))));

        let last = run(&mut store, 6, |ctx| {
            registry.revoke_peer(ctx, &account(1), "epix", "alice", "peer-2")
        })
        .unwrap()
        .value;
        assert!(last.is_empty());
    }

    #[test]
    fn test_readding_with_new_label_depends_only_on_set() {
        let (registry, mut store) = with_names();
        let first = run(&mut store, 3, |ctx| {
            registry.set_peer(ctx, &account(1), "epix", "alice", "peer-1", "one")?;
            registry.set_peer(ctx, &account(1), "epix", "alice", "peer-2", "two")
        })
        .unwrap()
        .value;
        let readded = run(&mut store, 4, |ctx| {
            registry.revoke_peer(ctx, &account(1), "epix", "alice", "peer-1")?;
            registry.set_peer(ctx, &account(1), "epix", "alice", "peer-1", "renamed")
        })
        .unwrap()
        .value;
        assert_eq!(first.root, readded.root);

        let peer = records::get_peer(&store, "epix", "alice", "peer-1").unwrap().unwrap();
        assert!(peer.is_active());
        assert_eq!(peer.revoked_at(), 0);
        assert_eq!(peer.label, "renamed");
    }

    #[test]
    fn test_peer_linked_elsewhere() {
        let (registry, mut store) = with_names();
        run(&mut store, 3, |ctx| {
            registry.set_peer(ctx, &account(1), "epix", "alice", "shared", "")
        })
        .unwrap();

        let err = run(&mut store, 4, |ctx| {
            registry.set_peer(ctx, &account(2), "epix", "bob", "shared", "")
        })
        .unwrap_err();
        assert!(matches!(err, RegistryError::PeerAlreadyLinked(_)));
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        // Released by revocation
        run(&mut store, 5, |ctx| {
            registry.revoke_peer(ctx, &account(1), "epix", "alice", "shared")
        })
        .unwrap();
        run(&mut store, 6, |ctx| {
            registry.set_peer(ctx, &account(2), "epix", "bob", "shared", "")
        })
        .unwrap();
        let link = records::get_peer_link(&store, "shared").unwrap().unwrap();
        assert_eq!(link.name, "bob");
    }

    #[test]
    fn test_peer_validation() {
        let (registry, mut store) = with_names();
        let err = run(&mut store, 3, |ctx| {
            registry.set_peer(ctx, &account(1), "epix", "alice", "", "")
        })
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPeer(_)));
    }

    #[test]
    fn test_root_independent_of_insertion_order() {
        let mut addresses: Vec<String> = (0..7).map(|i| format!("peer-{i}")).collect();
        let mut roots = Vec::new();
        for _ in 0..5 {
            addresses.shuffle(&mut thread_rng());
            let (registry, mut store) = with_names();
            let root = run(&mut store, 3, |ctx| {
                let mut root = None;
                for address in &addresses {
                    root = Some(registry.set_peer(ctx, &account(1), "epix", "alice", address, "")?);
                }
                Ok(root)
            })
            .unwrap()
            .value
            .unwrap();
            roots.push(root.root);
        }
        roots.dedup();
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_same_peers_under_different_names() {
        let (registry, mut store) = with_names();
        let alice = run(&mut store, 3, |ctx| {
            registry.set_peer(ctx, &account(1), "epix", "alice", "peer-1", "")
        })
        .unwrap()
        .value;
        run(&mut store, 4, |ctx| {
            registry.revoke_peer(ctx, &account(1), "epix", "alice", "peer-1")
        })
        .unwrap();
        let bob = run(&mut store, 5, |ctx| {
            registry.set_peer(ctx, &account(2), "epix", "bob", "peer-1", "")
        })
        .unwrap()
        .value;
        assert_ne!(alice.root, bob.root);
    }
}
