//! Anti-spam proof-of-work.
//!
//! Not a signature and not mining: a tunable hash puzzle that makes flooding
//! the tangle expensive. A solution is a nonce whose hash (under the chosen
//! puzzle shape) starts with `difficulty` hexadecimal zeros.
//!
//! Every search is bounded by an attempt ceiling. Running out of attempts is
//! an ordinary outcome, surfaced as [`WorkStamp::Invalid`](volt_types::WorkStamp)
//! by [`WorkGenerator::solve`] and as [`WorkError::Exhausted`] by
//! [`WorkGenerator::try_solve`].

pub mod error;
pub mod generator;
pub mod nonces;
pub mod validator;
pub mod variant;

pub use error::WorkError;
pub use generator::WorkGenerator;
pub use nonces::Nonces;
pub use validator::{meets_difficulty, validate_work, verify_solution};
pub use variant::PowVariant;

use serde::{Deserialize, Serialize};

/// Attempt ceiling shared by all puzzle shapes.
pub const MAX_ATTEMPTS: u64 = 100_000_000;

/// A SHA-256 hex digest has 64 characters; no difficulty beyond that can be met.
pub const MAX_DIFFICULTY: u32 = 64;

/// Iterations per attempt of the clockwork shape.
pub const DEFAULT_CLOCKWORK_ROUNDS: u32 = 65_536;

/// Puzzle configuration, chosen at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkConfig {
    pub variant: PowVariant,
    pub max_attempts: u64,
    pub clockwork_rounds: u32,
}

impl WorkConfig {
    pub fn new(variant: PowVariant) -> Self {
        Self {
            variant,
            max_attempts: MAX_ATTEMPTS,
            clockwork_rounds: DEFAULT_CLOCKWORK_ROUNDS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_clockwork_rounds(mut self, rounds: u32) -> Self {
        self.clockwork_rounds = rounds;
        self
    }
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self::new(PowVariant::Standard)
    }
}

/// A nonce together with the hash it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
    pub hash: String,
}
