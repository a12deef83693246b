//! The deterministic "weakest" strategy.

use volt_ledger::Tangle;
use volt_types::TxId;

/// Every non-placeholder entry with no parents, sorted by id. If there is
/// none, the single lightest entry (ties broken by id).
pub fn select_weakest(tangle: &Tangle) -> Vec<TxId> {
    // Tangle iterates in id order, so the collected ids are already sorted.
    let parentless: Vec<TxId> = tangle
        .iter()
        .filter(|tx| tx.is_genesis())
        .map(|tx| tx.id.clone())
        .collect();
    if !parentless.is_empty() {
        return parentless;
    }

    tangle
        .iter()
        .min_by(|a, b| {
            a.cumulative_weight
                .cmp(&b.cumulative_weight)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|tx| vec![tx.id.clone()])
        .unwrap_or_default()
}
