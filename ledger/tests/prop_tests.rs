use proptest::prelude::*;

use volt_ledger::{MissingWeightPolicy, Tangle};
use volt_types::{Timestamp, Transaction, TxId, WorkStamp};

fn id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:-]{1,12}"
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ .-]{0,16}"
}

fn work_strategy() -> impl Strategy<Value = WorkStamp> {
    prop_oneof![
        Just(WorkStamp::Pending),
        Just(WorkStamp::Invalid),
        "[0-9a-f]{64}".prop_map(WorkStamp::Solved),
    ]
}

fn transaction_strategy() -> impl Strategy<Value = Transaction> {
    (
        (id_strategy(), 0u64..=4_102_444_800, text_strategy(), text_strategy()),
        (-1.0e9f64..1.0e9, text_strategy(), -1.0e6f64..1.0e6, text_strategy()),
        (
            prop::collection::vec(id_strategy(), 0..4),
            prop::collection::vec(id_strategy(), 0..4),
            0u64..1_000_000,
            work_strategy(),
        ),
    )
        .prop_map(
            |((id, secs, sender, receiver), (amount, unit, price, currency), (parents, validators, weight, work))| {
                Transaction {
                    id: TxId::new(id),
                    timestamp: Timestamp::new(secs),
                    sender,
                    receiver,
                    amount,
                    unit,
                    price_per_unit: price,
                    currency,
                    parent_ids: parents.into_iter().map(TxId::new).collect(),
                    validated_by: validators.into_iter().map(TxId::new).collect(),
                    cumulative_weight: weight,
                    proof_of_work: work,
                }
            },
        )
}

proptest! {
    /// serialize → merge into a fresh ledger reproduces every field.
    #[test]
    fn serialize_merge_roundtrip(txs in prop::collection::vec(transaction_strategy(), 0..24)) {
        let mut source = Tangle::new();
        for tx in txs {
            source.add(tx);
        }

        let mut target = Tangle::new();
        let report = target.merge_from_serialized(&source.serialize());

        prop_assert!(report.is_clean(), "rejected: {:?}", report.rejected);
        prop_assert_eq!(report.applied, source.len());
        prop_assert_eq!(target.len(), source.len());
        for tx in source.iter() {
            prop_assert_eq!(target.get(tx.id.as_str()), Some(tx));
        }
    }

    /// n increments on an existing id add exactly n.
    #[test]
    fn increments_are_counted_exactly(start in 0u64..1000, n in 0usize..64) {
        let mut tangle = Tangle::new();
        let mut tx = Transaction::new("t", Timestamp::EPOCH, "a", "b", 1.0, "kWh", 0.1, "USD", Vec::new());
        tx.cumulative_weight = start;
        tangle.add(tx);
        for _ in 0..n {
            tangle.increment_weight("t");
        }
        prop_assert_eq!(tangle.get("t").map(|t| t.cumulative_weight), Some(start + n as u64));
    }

    /// Any ledger content merged twice is the same as merged once.
    #[test]
    fn merge_is_idempotent(txs in prop::collection::vec(transaction_strategy(), 0..12)) {
        let mut source = Tangle::new();
        for tx in txs {
            source.add(tx);
        }
        let bytes = source.serialize();

        let mut once = Tangle::with_policy(MissingWeightPolicy::Ignore);
        once.merge_from_serialized(&bytes);
        let mut twice = once.clone();
        twice.merge_from_serialized(&bytes);
        prop_assert_eq!(once.serialize(), twice.serialize());
    }

    /// Arbitrary bytes never panic the merge, and every line is accounted for.
    #[test]
    fn merge_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut tangle = Tangle::new();
        let report = tangle.merge_from_serialized(&bytes);
        prop_assert!(report.applied + report.rejected.len() <= bytes.split(|&b| b == b'\n').count());
    }
}
