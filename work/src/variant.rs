//! The four puzzle shapes.
//!
//! Every shape mixes `payload ‖ nonce` (nonce in decimal) through SHA-256 and
//! produces a 64-character lowercase hex digest. They differ only in how much
//! hashing one attempt costs and how the nonce is folded in.

use serde::{Deserialize, Serialize};

use volt_crypto::{sha256, sha256_hex, sha256_multi};

/// Chain length of the counter-mode shape.
pub const COUNTER_MODE_ROUNDS: u32 = 64;

/// Rounds of the Feistel shape.
pub const FEISTEL_ROUNDS: u32 = 8;

const FEISTEL_BLOCK: usize = 64;
const FEISTEL_HALF: usize = FEISTEL_BLOCK / 2;

/// Puzzle shape, selectable by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowVariant {
    /// `H(payload ‖ nonce)`.
    #[default]
    Standard,
    /// 64 rounds of `chain = H(chain ‖ "|" ‖ i)`, then `H(chain)`.
    CounterMode,
    /// `rounds` iterations of `h = H(h)` from `payload ‖ nonce`: constant work
    /// per attempt that no lucky early hash can cut short.
    Clockwork,
    /// 8-round Feistel network over a 64-byte block, then `H(left ‖ right)`.
    Feistel,
}

impl PowVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::CounterMode => "counter_mode",
            Self::Clockwork => "clockwork",
            Self::Feistel => "feistel",
        }
    }

    /// Hash one attempt.
    ///
    /// `clockwork_rounds` is read by [`PowVariant::Clockwork`] only and is
    /// clamped to at least one round, so the result is always a digest.
    pub fn mix(&self, payload: &str, nonce: u64, clockwork_rounds: u32) -> String {
        match self {
            Self::Standard => standard(payload, nonce),
            Self::CounterMode => counter_mode(payload, nonce),
            Self::Clockwork => clockwork(payload, nonce, clockwork_rounds.max(1)),
            Self::Feistel => feistel(payload, nonce),
        }
    }

    pub fn all() -> [PowVariant; 4] {
        [
            Self::Standard,
            Self::CounterMode,
            Self::Clockwork,
            Self::Feistel,
        ]
    }
}

impl std::str::FromStr for PowVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| format!("unknown proof-of-work variant {s:?}"))
    }
}

fn standard(payload: &str, nonce: u64) -> String {
    sha256_hex(format!("{payload}{nonce}").as_bytes())
}

fn counter_mode(payload: &str, nonce: u64) -> String {
    let mut chain = format!("{payload}{nonce}");
    for round in 0..COUNTER_MODE_ROUNDS {
        chain = sha256_hex(format!("{chain}|{round}").as_bytes());
    }
    sha256_hex(chain.as_bytes())
}

fn clockwork(payload: &str, nonce: u64, rounds: u32) -> String {
    let mut hash = format!("{payload}{nonce}");
    for _ in 0..rounds {
        hash = sha256_hex(hash.as_bytes());
    }
    hash
}

fn feistel(payload: &str, nonce: u64) -> String {
    let nonce_text = nonce.to_string();
    let mut block = [0u8; FEISTEL_BLOCK];

    // Oversized payloads are digested first so the nonce always lands inside
    // the block; a nonce cut off by truncation would make every attempt equal.
    if payload.len() + nonce_text.len() <= FEISTEL_BLOCK {
        let end = payload.len();
        block[..end].copy_from_slice(payload.as_bytes());
        block[end..end + nonce_text.len()].copy_from_slice(nonce_text.as_bytes());
    } else {
        block[..FEISTEL_HALF].copy_from_slice(&sha256(payload.as_bytes()));
        block[FEISTEL_HALF..FEISTEL_HALF + nonce_text.len()].copy_from_slice(nonce_text.as_bytes());
    }

    let mut left = [0u8; FEISTEL_HALF];
    let mut right = [0u8; FEISTEL_HALF];
    left.copy_from_slice(&block[..FEISTEL_HALF]);
    right.copy_from_slice(&block[FEISTEL_HALF..]);

    for round in 0..FEISTEL_ROUNDS {
        let f = sha256_multi(&[&right[..], round.to_string().as_bytes()]);
        let mut next_right = [0u8; FEISTEL_HALF];
        for (out, (l, k)) in next_right.iter_mut().zip(left.iter().zip(f.iter())) {
            *out = l ^ k;
        }
        left = right;
        right = next_right;
    }

    sha256_hex(&[left, right].concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names_parse_back() {
        for variant in PowVariant::all() {
            assert_eq!(variant.as_str().parse::<PowVariant>(), Ok(variant));
        }
        assert!("scrypt".parse::<PowVariant>().is_err());
    }

    #[test]
    fn standard_is_hash_of_payload_and_decimal_nonce() {
        assert_eq!(PowVariant::Standard.mix("tx0", 17, 1), sha256_hex(b"tx017"));
    }

    #[test]
    fn counter_mode_chains_sixty_four_rounds() {
        let mut chain = "tx05".to_string();
        for i in 0..64 {
            chain = sha256_hex(format!("{chain}|{i}").as_bytes());
        }
        assert_eq!(PowVariant::CounterMode.mix("tx0", 5, 1), sha256_hex(chain.as_bytes()));
    }

    #[test]
    fn clockwork_iterates_the_configured_rounds() {
        let once = sha256_hex(b"tx03");
        let twice = sha256_hex(once.as_bytes());
        assert_eq!(PowVariant::Clockwork.mix("tx0", 3, 1), once);
        assert_eq!(PowVariant::Clockwork.mix("tx0", 3, 2), twice);
    }

    #[test]
    fn clockwork_zero_rounds_still_hashes() {
        assert_eq!(
            PowVariant::Clockwork.mix("000", 0, 0),
            PowVariant::Clockwork.mix("000", 0, 1)
        );
    }

    #[test]
    fn feistel_depends_on_nonce_for_long_payloads() {
        let long = "x".repeat(200);
        assert_ne!(
            PowVariant::Feistel.mix(&long, 0, 1),
            PowVariant::Feistel.mix(&long, 1, 1)
        );
    }

    #[test]
    fn feistel_short_and_long_paths_both_produce_digests() {
        let payloads = ["tx0".to_string(), "y".repeat(63), "z".repeat(64)];
        for payload in &payloads {
            let hash = PowVariant::Feistel.mix(payload, 12, 1);
            assert_eq!(hash.len(), 64);
            assert!(hash.bytes().all(|b| b.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn shapes_disagree_on_the_same_attempt() {
        let hashes: Vec<String> = PowVariant::all()
            .iter()
            .map(|v| v.mix("tx0", 0, 4))
            .collect();
        for (i, a) in hashes.iter().enumerate() {
            for b in &hashes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
