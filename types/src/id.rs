//! Transaction identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque transaction id, assigned by the creator.
///
/// Uniqueness is a convention between producers; the ledger never enforces
/// it (a second transaction with the same id overwrites the first).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Marker returned by the walk selectors when the ledger has no genesis.
    ///
    /// It never names a real transaction; callers must not endorse it.
    pub const GENESIS_FALLBACK: &'static str = "genesis_fallback";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The synthetic "no genesis" marker.
    pub fn genesis_fallback() -> Self {
        Self(Self::GENESIS_FALLBACK.to_string())
    }

    pub fn is_fallback_marker(&self) -> bool {
        self.0 == Self::GENESIS_FALLBACK
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.0)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TxId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for TxId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn fallback_marker_is_recognised() {
        assert!(TxId::genesis_fallback().is_fallback_marker());
        assert!(!TxId::from("tx0").is_fallback_marker());
    }

    #[test]
    fn lookup_by_str_through_borrow() {
        let mut map = HashMap::new();
        map.insert(TxId::from("tx7"), 7);
        assert_eq!(map.get("tx7"), Some(&7));
    }

    #[test]
    fn ordering_follows_the_text() {
        assert!(TxId::from("a") < TxId::from("b"));
    }
}
