//! SHA-256 hashing.

use sha2::{Digest, Sha256};

/// Compute the raw 32-byte SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// SHA-256 rendered as 64 lowercase hex characters, two per byte.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
