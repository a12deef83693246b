//! Proof-of-work stamp attached to a transaction.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The state of a transaction's proof of work.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkStamp {
    /// Not computed yet.
    #[default]
    Pending,
    /// The puzzle search hit its attempt ceiling.
    Invalid,
    /// A hex hash meeting the difficulty target.
    Solved(String),
}

impl WorkStamp {
    pub const PENDING: &'static str = "Pending";
    pub const INVALID: &'static str = "INVALID_POW";
    /// Older producers wrote this instead of [`Self::INVALID`].
    pub const FAIL: &'static str = "FAIL";

    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    pub fn hash(&self) -> Option<&str> {
        match self {
            Self::Solved(h) => Some(h),
            _ => None,
        }
    }
}

impl fmt::Display for WorkStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str(Self::PENDING),
            Self::Invalid => f.write_str(Self::INVALID),
            Self::Solved(h) => f.write_str(h),
        }
    }
}

impl FromStr for WorkStamp {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | Self::PENDING => Self::Pending,
            Self::INVALID | Self::FAIL => Self::Invalid,
            hash => Self::Solved(hash.to_string()),
        })
    }
}
