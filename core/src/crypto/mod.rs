//! Hashing primitives for the registry
//!
//! All digests are plain SHA-256. The content-root format is consumed by
//! independent verifiers, so no domain tags are mixed in here; domain
//! separation is applied explicitly by the content-root engine.

use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};

/// Length of the truncated digest used inside store keys
pub const SHORT_DIGEST_LEN: usize = 8;

/// SHA-256 of `data`
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let result = Sha256::digest(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// SHA-256 of `left || right`
///
/// # Arguments
///
/// * `left` - First half of the preimage
/// * `right` - Second half of the preimage
///
/// # Returns
///
/// The 32-byte digest of the concatenation
pub fn sha256_concat(left: &[u8], right: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);

    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// First [`SHORT_DIGEST_LEN`] bytes of SHA-256, used to bound key length for
/// unbounded values such as peer addresses
pub fn short_digest(data: &[u8]) -> [u8; SHORT_DIGEST_LEN] {
    let full = sha256(data);
    let mut output = [0u8; SHORT_DIGEST_LEN];
    output.copy_from_slice(&full[..SHORT_DIGEST_LEN]);
    output
}

/// Verify a hash in constant time
pub fn verify_hash(expected: &[u8; 32], actual: &[u8; 32]) -> bool {
    constant_time_eq(expected, actual)
}
