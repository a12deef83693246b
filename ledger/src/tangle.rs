//! The tangle store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use volt_types::{Transaction, TxId};

use crate::codec::{self, MergeReport};
use crate::Approvers;

/// What `increment_weight` does when the id is not in the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingWeightPolicy {
    /// Insert an empty placeholder whose weight ends at 1.
    #[default]
    CreatePlaceholder,
    /// Leave the ledger untouched.
    Ignore,
}

/// In-memory DAG of transactions keyed by id.
///
/// Entries are kept in id order so that serialization and every walk over
/// the store are reproducible.
#[derive(Clone, Debug, Default)]
pub struct Tangle {
    transactions: BTreeMap<TxId, Transaction>,
    missing_weight: MissingWeightPolicy,
}

impl Tangle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(missing_weight: MissingWeightPolicy) -> Self {
        Self {
            transactions: BTreeMap::new(),
            missing_weight,
        }
    }

    pub fn policy(&self) -> MissingWeightPolicy {
        self.missing_weight
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.transactions.contains_key(id)
    }

    /// Transactions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &TxId> {
        self.transactions.keys()
    }

    /// Insert or overwrite the entry at `tx.id`. Returns the replaced entry.
    ///
    /// Parents are not checked; last writer wins on a duplicate id.
    pub fn add(&mut self, tx: Transaction) -> Option<Transaction> {
        self.transactions.insert(tx.id.clone(), tx)
    }

    /// Bump the direct-approval counter of `id`.
    ///
    /// Returns the new weight, or `None` if the id was unknown and the
    /// policy is [`MissingWeightPolicy::Ignore`].
    pub fn increment_weight(&mut self, id: &str) -> Option<u64> {
        if let Some(tx) = self.transactions.get_mut(id) {
            tx.cumulative_weight = tx.cumulative_weight.saturating_add(1);
            return Some(tx.cumulative_weight);
        }
        match self.missing_weight {
            MissingWeightPolicy::Ignore => {
                tracing::debug!(id, "weight update for unknown transaction ignored");
                None
            }
            MissingWeightPolicy::CreatePlaceholder => {
                tracing::debug!(id, "weight update created placeholder");
                let mut placeholder = Transaction::placeholder(id);
                placeholder.cumulative_weight = 1;
                self.transactions.insert(placeholder.id.clone(), placeholder);
                Some(1)
            }
        }
    }

    /// Endorse every parent of `tx`, then store it.
    pub fn commit(&mut self, tx: Transaction) -> Option<Transaction> {
        for parent in &tx.parent_ids {
            self.increment_weight(parent.as_str());
        }
        self.add(tx)
    }

    /// The genesis: a parentless, non-placeholder transaction. When several
    /// exist the earliest timestamp wins, then the smallest id.
    pub fn genesis(&self) -> Option<&Transaction> {
        self.iter()
            .filter(|tx| tx.is_genesis())
            .min_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)))
    }

    pub fn approvers(&self) -> Approvers {
        Approvers::build(self)
    }

    /// Canonical line form, one transaction per line in id order.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = String::new();
        for tx in self.iter() {
            out.push_str(&codec::encode_line(tx));
            out.push('\n');
        }
        out.into_bytes()
    }

    /// Apply every well-formed line of `bytes` with [`Tangle::add`].
    ///
    /// Malformed lines are skipped and reported; they never abort the merge.
    pub fn merge_from_serialized(&mut self, bytes: &[u8]) -> MergeReport {
        let mut report = MergeReport::default();
        for (index, raw) in bytes.split(|&b| b == b'\n').enumerate() {
            let line_number = index + 1;
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            if raw.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match codec::decode_bytes(raw) {
                Ok(tx) => {
                    self.add(tx);
                    report.applied += 1;
                }
                Err(error) => {
                    tracing::warn!(line = line_number, %error, "skipping malformed ledger line");
                    report.reject(line_number, error);
                }
            }
        }
        report
    }
}
