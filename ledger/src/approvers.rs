//! Forward adjacency: parent id → the transactions endorsing it.

use std::collections::HashMap;

use volt_types::TxId;

use crate::Tangle;

/// Reverse of the `parent_ids` edges, built from one ledger snapshot.
///
/// Children are kept sorted by id and deduplicated, so a walk driven by a
/// seeded generator visits the same path on every run.
#[derive(Clone, Debug, Default)]
pub struct Approvers {
    children: HashMap<TxId, Vec<TxId>>,
}

impl Approvers {
    pub fn build(tangle: &Tangle) -> Self {
        let mut children: HashMap<TxId, Vec<TxId>> = HashMap::new();
        for tx in tangle.iter() {
            for parent in &tx.parent_ids {
                children.entry(parent.clone()).or_default().push(tx.id.clone());
            }
        }
        for list in children.values_mut() {
            list.sort();
            list.dedup();
        }
        Self { children }
    }

    /// Direct approvers of `id`; empty for a tip or an unknown id.
    pub fn children(&self, id: &str) -> &[TxId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_tip(&self, id: &str) -> bool {
        self.children(id).is_empty()
    }

    /// Number of ids with at least one approver.
    pub fn approved_count(&self) -> usize {
        self.children.len()
    }
}
