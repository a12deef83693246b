use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkError {
    #[error("no nonce met difficulty within {attempts} attempts")]
    Exhausted { attempts: u64 },

    #[error("difficulty {difficulty} exceeds the {max} hex characters of a digest")]
    DifficultyOutOfRange { difficulty: u32, max: u32 },
}
