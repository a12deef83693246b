//! Hash primitives for the Volt tangle.
//!
//! - **SHA-256** is the mixing function of every proof-of-work puzzle shape
//! - **Checksums** are lowercase hex SHA-256 digests guarding gossip payloads
//!
//! Nothing here is a signature: the tangle has no transaction authentication.

pub mod checksum;
pub mod hash;

pub use checksum::{compute_checksum, verify_checksum, CHECKSUM_HEX_LEN};
pub use hash::{sha256, sha256_hex, sha256_multi};
