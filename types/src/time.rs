//! Timestamp type used by transactions.
//!
//! Timestamps are Unix epoch seconds (UTC). The display form is RFC 3339,
//! which is also what the canonical ledger encoding carries. Timestamps order
//! transactions for display and logs only; the DAG edges carry causality.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::TypesError;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// RFC 3339 rendering, e.g. `2025-03-11T12:00:00Z`.
    pub fn to_rfc3339(&self) -> String {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| self.0.to_string())
    }

    /// Parse either an RFC 3339 date-time or a bare epoch-seconds integer.
    pub fn parse(s: &str) -> Result<Self, TypesError> {
        let s = s.trim();
        if let Ok(secs) = s.parse::<u64>() {
            return Ok(Self(secs));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| TypesError::InvalidTimestamp(format!("{s}: {e}")))?;
        u64::try_from(dt.timestamp())
            .map(Self)
            .map_err(|_| TypesError::InvalidTimestamp(format!("{s}: before the Unix epoch")))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl FromStr for Timestamp {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_rfc3339() {
        // 2025-03-11T12:00:00Z
        let ts = Timestamp::new(1_741_694_400);
        assert_eq!(ts.to_string(), "2025-03-11T12:00:00Z");
    }

    #[test]
    fn parses_its_own_rendering() {
        let ts = Timestamp::new(1_741_694_400);
        assert_eq!(Timestamp::parse(&ts.to_string()).unwrap(), ts);
    }

    #[test]
    fn parses_bare_epoch_seconds() {
        assert_eq!(Timestamp::parse("42").unwrap(), Timestamp::new(42));
    }

    #[test]
    fn parses_offsets_into_utc() {
        let ts = Timestamp::parse("2025-03-11T14:00:00+02:00").unwrap();
        assert_eq!(ts, Timestamp::new(1_741_694_400));
    }

    #[test]
    fn rejects_garbage_and_pre_epoch() {
        assert!(Timestamp::parse("yesterday").is_err());
        assert!(Timestamp::parse("1969-12-31T23:59:59Z").is_err());
    }
}
