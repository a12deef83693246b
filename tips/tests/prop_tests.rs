use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use volt_ledger::Tangle;
use volt_tips::{TipSelector, TipStrategy};
use volt_types::{Timestamp, Transaction, TxId};

/// A DAG where node `i > 0` endorses one to three earlier nodes, so `n0` is
/// the only genesis.
fn dag_strategy() -> impl Strategy<Value = Tangle> {
    prop::collection::vec((prop::collection::vec(any::<prop::sample::Index>(), 1..=3), 1u64..20), 1..40)
        .prop_map(|nodes| {
            let mut tangle = Tangle::new();
            for (i, (parent_picks, weight)) in nodes.into_iter().enumerate() {
                let parents: Vec<TxId> = if i == 0 {
                    Vec::new()
                } else {
                    parent_picks
                        .iter()
                        .map(|pick| TxId::new(format!("n{}", pick.index(i))))
                        .collect()
                };
                let mut tx = Transaction::new(
                    format!("n{i}"),
                    Timestamp::new(i as u64),
                    "a",
                    "b",
                    1.0,
                    "kWh",
                    0.1,
                    "USD",
                    parents,
                );
                tx.cumulative_weight = weight;
                tangle.add(tx);
            }
            tangle
        })
}

fn strategy() -> impl Strategy<Value = TipStrategy> {
    prop::sample::select(TipStrategy::all().to_vec())
}

proptest! {
    /// Every walk ends on an existing transaction that nobody approves.
    #[test]
    fn walks_end_on_real_tips(tangle in dag_strategy(), strategy in strategy(), seed in any::<u64>()) {
        prop_assume!(strategy.is_walk());
        let tips = TipSelector::new(strategy).select(&tangle, &mut StdRng::seed_from_u64(seed));
        let approvers = tangle.approvers();
        prop_assert_eq!(tips.len(), 2);
        for tip in &tips {
            prop_assert!(tangle.contains(tip.as_str()));
            prop_assert!(approvers.is_tip(tip.as_str()));
        }
    }

    /// Non-empty ledger in, non-empty selection out.
    #[test]
    fn selection_is_never_empty(tangle in dag_strategy(), strategy in strategy(), seed in any::<u64>()) {
        let tips = TipSelector::new(strategy).select(&tangle, &mut StdRng::seed_from_u64(seed));
        prop_assert!(!tips.is_empty());
        prop_assert!(tips.iter().all(|t| !t.is_fallback_marker()));
    }
}
