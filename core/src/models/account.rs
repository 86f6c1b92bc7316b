//! Account identities
//!
//! Owners are fixed-width 20-byte identities. They render as `0x`-prefixed
//! lowercase hex and serialize as that string so genesis files stay readable.

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto;
use crate::error::RegistryError;

/// A 20-byte account identity
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId([u8; AccountId::LEN]);

impl AccountId {
    /// Width of an identity in bytes
    pub const LEN: usize = 20;

    /// Wrap raw identity bytes
    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        AccountId(bytes)
    }

    /// Build an identity from a slice that must be exactly [`Self::LEN`] bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RegistryError> {
        let array: [u8; Self::LEN] = bytes.try_into().map_err(|_| {
            RegistryError::InvalidAccount(format!(
                "expected {} bytes, got {}",
                Self::LEN,
                bytes.len()
            ))
        })?;
        Ok(AccountId(array))
    }

    /// Deterministic identity of a module-owned account, the leading 20 bytes
    /// of `sha256(module_name)`
    pub fn module(module_name: &str) -> Self {
        let digest = crypto::sha256(module_name.as_bytes());
        let mut bytes = [0u8; Self::LEN];
        bytes.copy_from_slice(&digest[..Self::LEN]);
        AccountId(bytes)
    }

    /// Raw identity bytes
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "AccountId({})", self)
    }
}

impl FromStr for AccountId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| RegistryError::InvalidAccount(format!("{s:?}: {e}")))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
