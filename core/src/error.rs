//! Error types for the registry core
//!
//! Every failure the registry can report is a variant of [`RegistryError`].
//! Variants carry a human-readable reason; [`RegistryError::kind`] folds them
//! into the coarse taxonomy dispatchers map onto wire responses, and
//! [`RegistryError::code`] gives each one a stable numeric code.

use std::io;
use thiserror::Error;

/// Coarse error classification shared by all registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed name, TLD, record field or request
    InvalidInput,

    /// Name, TLD, DNS record or peer absent
    NotFound,

    /// Name taken, TLD or peer link already present
    AlreadyExists,

    /// Caller is not the record owner or not the governance authority
    Unauthorized,

    /// Fee payment failed
    InsufficientFunds,

    /// TLD not accepting registrations
    Disabled,

    /// Registry configuration cannot satisfy the request
    Configuration,

    /// Stored state could not be decoded, or the host failed
    Internal,
}

/// Registry error type
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Name label failed validation
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// TLD label failed validation
    #[error("invalid TLD: {0}")]
    InvalidTld(String),

    /// DNS record fields failed validation
    #[error("invalid DNS record: {0}")]
    InvalidDnsRecord(String),

    /// Account identity could not be parsed
    #[error("invalid account: {0}")]
    InvalidAccount(String),

    /// Peer fields failed validation
    #[error("invalid peer: {0}")]
    InvalidPeer(String),

    /// Price tier list failed validation
    #[error("invalid price tier configuration: {0}")]
    InvalidPriceTier(String),

    /// Module parameters failed validation
    #[error("invalid module parameters: {0}")]
    InvalidParams(String),

    /// Pagination request is malformed
    #[error("invalid pagination request: {0}")]
    InvalidPagination(String),

    /// Ownership change would not change anything
    #[error("invalid transfer: {0}")]
    InvalidTransfer(String),

    /// `(tld, name)` already registered
    #[error("name is already registered: {0}")]
    NameTaken(String),

    /// TLD already configured
    #[error("TLD already exists: {0}")]
    TldAlreadyExists(String),

    /// Peer address actively linked to another name
    #[error("peer address is already linked to another name: {0}")]
    PeerAlreadyLinked(String),

    /// No record for `(tld, name)`
    #[error("name not found: {0}")]
    NameNotFound(String),

    /// No configuration for the TLD
    #[error("TLD not found: {0}")]
    TldNotFound(String),

    /// No DNS record of the requested type
    #[error("DNS record not found: {0}")]
    DnsRecordNotFound(String),

    /// No active peer with that address
    #[error("peer not found: {0}")]
    PeerNotFound(String),

    /// Caller does not own the record
    #[error("sender is not the name owner: {0}")]
    NotOwner(String),

    /// Caller is not the governance authority
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Fee could not be debited from the owner
    #[error("insufficient registration fee: {0}")]
    InsufficientFee(String),

    /// Debited fee could not be burned
    #[error("failed to burn registration fee: {0}")]
    BurnFailed(String),

    /// TLD exists but is closed for new registrations
    #[error("TLD is disabled for new registrations: {0}")]
    TldDisabled(String),

    /// TLD has an empty tier list
    #[error("no price tiers configured: {0}")]
    NoPriceTiers(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Stored state is inconsistent
    #[error("corrupted state: {0}")]
    CorruptedState(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Bincode error
    #[error("Bincode error: {0}")]
    BincodeError(#[from] bincode::Error),

    /// Hex decoding error
    #[error("Hex decoding error: {0}")]
    HexError(#[from] hex::FromHexError),
}

impl RegistryError {
    /// Coarse classification of this error
    pub fn kind(&self) -> ErrorKind {
        use RegistryError::*;
        match self {
            InvalidName(_) | InvalidTld(_) | InvalidDnsRecord(_) | InvalidPeer(_) | InvalidAccount(_)
            | InvalidPriceTier(_) | InvalidParams(_) | InvalidPagination(_)
            | InvalidTransfer(_) | HexError(_) => ErrorKind::InvalidInput,
            NameNotFound(_) | TldNotFound(_) | DnsRecordNotFound(_) | PeerNotFound(_) => {
                ErrorKind::NotFound
            }
            NameTaken(_) | TldAlreadyExists(_) | PeerAlreadyLinked(_) => ErrorKind::AlreadyExists,
            NotOwner(_) | Unauthorized(_) => ErrorKind::Unauthorized,
            InsufficientFee(_) | BurnFailed(_) => ErrorKind::InsufficientFunds,
            TldDisabled(_) => ErrorKind::Disabled,
            NoPriceTiers(_) | ConfigError(_) => ErrorKind::Configuration,
            CorruptedState(_) | IoError(_) | JsonError(_) | BincodeError(_) => ErrorKind::Internal,
        }
    }

    /// Stable numeric code reported to dispatchers
    pub fn code(&self) -> u32 {
        use RegistryError::*;
        match self {
            NameTaken(_) => 2,
            NameNotFound(_) => 3,
            TldNotFound(_) => 4,
            TldDisabled(_) => 5,
            TldAlreadyExists(_) => 6,
            NotOwner(_) => 7,
            InvalidName(_) | InvalidTransfer(_) => 8,
            InvalidTld(_) => 9,
            InsufficientFee(_) | BurnFailed(_) => 10,
            InvalidDnsRecord(_) => 11,
            DnsRecordNotFound(_) => 12,
            InvalidParams(_) | ConfigError(_) => 14,
            InvalidPriceTier(_) | NoPriceTiers(_) => 15,
            PeerNotFound(_) => 16,
            PeerAlreadyLinked(_) => 17,
            InvalidPeer(_) => 18,
            InvalidPagination(_) => 19,
            InvalidAccount(_) => 21,
            Unauthorized(_) => 20,
            CorruptedState(_) | IoError(_) | JsonError(_) | BincodeError(_) | HexError(_) => 1,
        }
    }
}

/// Result type for the registry core
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Convert a displayable error to a CorruptedState
pub fn to_state_error<E: std::fmt::Display>(err: E) -> RegistryError {
    RegistryError::CorruptedState(err.to_string())
}

/// Convert a displayable error to a ConfigError
pub fn to_config_error<E: std::fmt::Display>(err: E) -> RegistryError {
    RegistryError::ConfigError(err.to_string())
}
