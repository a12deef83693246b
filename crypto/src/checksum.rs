//! Integrity checksums for gossip payloads.

use crate::sha256_hex;

/// Length of a checksum in hex characters.
pub const CHECKSUM_HEX_LEN: usize = 64;

/// Checksum of a payload: SHA-256, lowercase hex.
pub fn compute_checksum(payload: &[u8]) -> String {
    sha256_hex(payload)
}

/// Whether `checksum` is exactly the lowercase hex digest of the payload.
///
/// Case matters: any altered byte of the checksum text is a mismatch.
pub fn verify_checksum(payload: &[u8], checksum: &str) -> bool {
    compute_checksum(payload) == checksum
}
