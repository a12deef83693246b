//! PoW search.

use rayon::prelude::*;

use crate::validator::meets_difficulty;
use crate::{Nonces, Solution, WorkConfig, WorkError, MAX_DIFFICULTY};
use volt_types::WorkStamp;

/// Nonces handed to each rayon thread per batch in [`WorkGenerator::solve_parallel`].
const BATCH_SIZE: u64 = 4096;

/// Searches nonces for one puzzle shape.
///
/// Every search is deterministic: the answer is always the lowest qualifying
/// nonce below the attempt ceiling, whichever entry point is used.
#[derive(Clone, Debug, Default)]
pub struct WorkGenerator {
    config: WorkConfig,
}

impl WorkGenerator {
    pub fn new(config: WorkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkConfig {
        &self.config
    }

    /// Hash a single attempt under the configured shape.
    pub fn attempt(&self, payload: &str, nonce: u64) -> String {
        self.config
            .variant
            .mix(payload, nonce, self.config.clockwork_rounds)
    }

    /// The nonces a search will try, in order.
    pub fn nonces(&self) -> Nonces {
        Nonces::new(self.config.max_attempts)
    }

    /// Search `0, 1, 2, …` for a nonce meeting `difficulty`.
    pub fn try_solve(&self, payload: &str, difficulty: u32) -> Result<Solution, WorkError> {
        check_difficulty(difficulty)?;
        for nonce in self.nonces() {
            let hash = self.attempt(payload, nonce);
            if meets_difficulty(&hash, difficulty) {
                return Ok(Solution { nonce, hash });
            }
        }
        Err(WorkError::Exhausted {
            attempts: self.config.max_attempts,
        })
    }

    /// Like [`Self::try_solve`], but reports failure as the
    /// [`WorkStamp::Invalid`] sentinel instead of an error.
    pub fn solve(&self, payload: &str, difficulty: u32) -> WorkStamp {
        match self.try_solve(payload, difficulty) {
            Ok(solution) => {
                tracing::debug!(
                    variant = self.config.variant.as_str(),
                    difficulty,
                    nonce = solution.nonce,
                    "proof of work solved"
                );
                WorkStamp::Solved(solution.hash)
            }
            Err(e) => {
                tracing::warn!(
                    variant = self.config.variant.as_str(),
                    difficulty,
                    error = %e,
                    "proof of work failed"
                );
                WorkStamp::Invalid
            }
        }
    }

    /// Multi-core search over batches of nonces.
    ///
    /// Each batch is split across the rayon pool and `find_first` keeps the
    /// lowest match, so the result is identical to [`Self::try_solve`].
    pub fn solve_parallel(&self, payload: &str, difficulty: u32) -> Result<Solution, WorkError> {
        check_difficulty(difficulty)?;
        let ceiling = self.config.max_attempts;
        let threads = rayon::current_num_threads().max(1) as u64;
        let batch = BATCH_SIZE.saturating_mul(threads);

        let mut start = 0u64;
        while start < ceiling {
            let end = start.saturating_add(batch).min(ceiling);
            let found = (start..end)
                .into_par_iter()
                .find_first(|&nonce| meets_difficulty(&self.attempt(payload, nonce), difficulty));
            if let Some(nonce) = found {
                return Ok(Solution {
                    nonce,
                    hash: self.attempt(payload, nonce),
                });
            }
            start = end;
        }
        Err(WorkError::Exhausted { attempts: ceiling })
    }
}

fn check_difficulty(difficulty: u32) -> Result<(), WorkError> {
    if difficulty > MAX_DIFFICULTY {
        return Err(WorkError::DifficultyOutOfRange {
            difficulty,
            max: MAX_DIFFICULTY,
        });
    }
    Ok(())
}
