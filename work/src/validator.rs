//! PoW validation.

use crate::{Solution, WorkGenerator};

/// The shared difficulty predicate: the first `difficulty` hex characters of
/// `hash` are all `'0'`.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let needed = difficulty as usize;
    hash.len() >= needed && hash.bytes().take(needed).all(|b| b == b'0')
}

/// Recompute one attempt and check it against the difficulty.
pub fn validate_work(generator: &WorkGenerator, payload: &str, nonce: u64, difficulty: u32) -> bool {
    meets_difficulty(&generator.attempt(payload, nonce), difficulty)
}

/// Check that a claimed solution is the hash its nonce produces and that it
/// meets the difficulty.
pub fn verify_solution(
    generator: &WorkGenerator,
    payload: &str,
    solution: &Solution,
    difficulty: u32,
) -> bool {
    let hash = generator.attempt(payload, solution.nonce);
    hash == solution.hash && meets_difficulty(&hash, difficulty)
}
