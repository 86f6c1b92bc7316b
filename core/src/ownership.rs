//! Paired maintenance of name records, the owner index and the counters
//!
//! These are the only functions that create a name record or change its
//! owner. Each one writes the record, the index entry and every affected
//! counter in the same context, so the three never drift apart.

use crate::error::Result;
use crate::counters;
use crate::models::{AccountId, NameRecord};
use crate::records;
use crate::store::KvStore;

/// Persist a new record with its index entry and counts
pub(crate) fn record_registration(store: &mut dyn KvStore, record: &NameRecord) -> Result<()> {
    records::set_name_record(store, record)?;
    records::set_owner_index(store, &record.owner, &record.tld, &record.name)?;
    counters::increment_owner_count(store, &record.owner)?;
    counters::increment_name_counts(store, &record.tld)
}

/// Move `record` to `new_owner`, returning the updated record
pub(crate) fn record_transfer(
    store: &mut dyn KvStore,
    record: &NameRecord,
    new_owner: AccountId,
) -> Result<NameRecord> {
    records::delete_owner_index(store, &record.owner, &record.tld, &record.name)?;
    records::set_owner_index(store, &new_owner, &record.tld, &record.name)?;
    counters::decrement_owner_count(store, &record.owner)?;
    counters::increment_owner_count(store, &new_owner)?;

    let updated = NameRecord {
        owner: new_owner,
        ..record.clone()
    };
    records::set_name_record(store, &updated)?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn record(name: &str, owner: u8) -> NameRecord {
        NameRecord {
            name: name.to_string(),
            tld: "epix".to_string(),
            owner: AccountId::new([owner; 20]),
            registered_at: 4,
        }
    }

    #[test]
    fn test_registration_writes_all_three() {
        let mut store = MemStore::new();
        let alice = record("alice", 1);
        record_registration(&mut store, &alice).unwrap();

        assert_eq!(records::get_name_record(&store, "epix", "alice").unwrap(), Some(alice.clone()));
        assert!(records::has_owner_index(&store, &alice.owner, "epix", "alice"));
        assert_eq!(counters::owner_count(&store, &alice.owner).unwrap(), 1);
        assert_eq!(counters::tld_name_count(&store, "epix").unwrap(), 1);
        assert_eq!(counters::global_name_count(&store).unwrap(), 1);
        assert!(counters::audit(&store).unwrap().is_consistent());
    }

    #[test]
    fn test_transfer_moves_index_and_counts() {
        let mut store = MemStore::new();
        let alice = record("alice", 1);
        record_registration(&mut store, &alice).unwrap();
        let bob = AccountId::new([2; 20]);

        let updated = record_transfer(&mut store, &alice, bob).unwrap();
        assert_eq!(updated.owner, bob);
        assert_eq!(updated.registered_at, alice.registered_at);
        assert!(!records::has_owner_index(&store, &alice.owner, "epix", "alice"));
        assert!(records::has_owner_index(&store, &bob, "epix", "alice"));
        assert_eq!(counters::owner_count(&store, &alice.owner).unwrap(), 0);
        assert_eq!(counters::owner_count(&store, &bob).unwrap(), 1);
        assert_eq!(counters::global_name_count(&store).unwrap(), 1);
        assert!(counters::audit(&store).unwrap().is_consistent());
    }
}
