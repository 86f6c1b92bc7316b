//! Value encoding for stored entries
//!
//! Structured values are bincode encoded. Counters are raw big-endian
//! integers so their width is fixed and they can be inspected directly.

use bytes::{Buf, BufMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KvStore;
use crate::error::{RegistryError, Result};

/// Decode the value under `key`, `None` if absent
pub fn load<T: DeserializeOwned>(store: &dyn KvStore, key: &[u8]) -> Result<Option<T>> {
    match store.get(key) {
        Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
        None => Ok(None),
    }
}

/// Encode and store `value` under `key`
pub fn save<T: Serialize>(store: &mut dyn KvStore, key: &[u8], value: &T) -> Result<()> {
    let bytes = bincode::serialize(value)?;
    store.set(key, bytes);
    Ok(())
}

/// Read a `u64` counter; missing reads as zero
pub fn read_u64(store: &dyn KvStore, key: &[u8]) -> Result<u64> {
    match store.get(key) {
        None => Ok(0),
        Some(bytes) if bytes.len() == 8 => Ok(bytes.as_slice().get_u64()),
        Some(bytes) => Err(RegistryError::CorruptedState(format!(
            "counter {} has {} bytes, expected 8",
            hex::encode(key),
            bytes.len()
        ))),
    }
}

/// Write a `u64` counter
pub fn write_u64(store: &mut dyn KvStore, key: &[u8], value: u64) {
    let mut buf = Vec::with_capacity(8);
    buf.put_u64(value);
    store.set(key, buf);
}

/// Read a `u128` amount; missing reads as zero
pub fn read_u128(store: &dyn KvStore, key: &[u8]) -> Result<u128> {
    match store.get(key) {
        None => Ok(0),
        Some(bytes) if bytes.len() == 16 => Ok(bytes.as_slice().get_u128()),
        Some(bytes) => Err(RegistryError::CorruptedState(format!(
            "amount {} has {} bytes, expected 16",
            hex::encode(key),
            bytes.len()
        ))),
    }
}

/// Write a `u128` amount
pub fn write_u128(store: &mut dyn KvStore, key: &[u8], value: u128) {
    let mut buf = Vec::with_capacity(16);
    buf.put_u128(value);
    store.set(key, buf);
}
