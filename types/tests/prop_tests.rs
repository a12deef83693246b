use proptest::prelude::*;

use volt_types::{Timestamp, TxId, WorkStamp};

/// Last second representable as a four-digit RFC 3339 year (9999-12-31T23:59:59Z).
const MAX_RFC3339_SECS: u64 = 253_402_300_799;

proptest! {
    /// Timestamp display form parses back to the same epoch seconds.
    #[test]
    fn timestamp_rfc3339_roundtrip(secs in 0u64..=MAX_RFC3339_SECS) {
        let ts = Timestamp::new(secs);
        prop_assert_eq!(Timestamp::parse(&ts.to_rfc3339()).unwrap(), ts);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Any hex hash survives the WorkStamp text form.
    #[test]
    fn solved_stamp_roundtrip(hash in "[0-9a-f]{64}") {
        let stamp = WorkStamp::Solved(hash.clone());
        prop_assert_eq!(stamp.to_string(), hash.clone());
        prop_assert_eq!(hash.parse::<WorkStamp>().unwrap(), stamp);
    }

    /// Only the literal marker text is the genesis fallback.
    #[test]
    fn only_marker_is_fallback(id in "[a-z0-9_:-]{1,24}") {
        let tx_id = TxId::new(id.clone());
        prop_assert_eq!(tx_id.is_fallback_marker(), id == TxId::GENESIS_FALLBACK);
    }
}
