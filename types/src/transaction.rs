//! The energy-trade transaction stored in the tangle.

use serde::{Deserialize, Serialize};

use crate::{Timestamp, TxId, WorkStamp};

/// One energy trade appended to the tangle.
///
/// Immutable once its proof of work is attached, except for
/// `cumulative_weight`, which the ledger bumps each time another transaction
/// endorses this one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub timestamp: Timestamp,
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    pub unit: String,
    pub price_per_unit: f64,
    pub currency: String,
    /// Transactions this one endorses. Empty only for the genesis.
    pub parent_ids: Vec<TxId>,
    /// Second edge list of the wire format. Carried verbatim; tip selection
    /// reads `parent_ids` only.
    pub validated_by: Vec<TxId>,
    /// Direct-approval counter: 1 at creation, +1 per endorsing child.
    pub cumulative_weight: u64,
    pub proof_of_work: WorkStamp,
}

impl Transaction {
    /// A fresh transaction with weight 1 and pending work.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<TxId>,
        timestamp: Timestamp,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
        unit: impl Into<String>,
        price_per_unit: f64,
        currency: impl Into<String>,
        parent_ids: Vec<TxId>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            unit: unit.into(),
            price_per_unit,
            currency: currency.into(),
            parent_ids,
            validated_by: Vec::new(),
            cumulative_weight: 1,
            proof_of_work: WorkStamp::Pending,
        }
    }

    /// The empty entry created when a weight update names an unknown id.
    ///
    /// Its weight starts at zero so the triggering increment leaves it at 1.
    pub fn placeholder(id: impl Into<TxId>) -> Self {
        Self {
            id: id.into(),
            timestamp: Timestamp::EPOCH,
            sender: String::new(),
            receiver: String::new(),
            amount: 0.0,
            unit: String::new(),
            price_per_unit: 0.0,
            currency: String::new(),
            parent_ids: Vec::new(),
            validated_by: Vec::new(),
            cumulative_weight: 0,
            proof_of_work: WorkStamp::Pending,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.sender.is_empty()
            && self.receiver.is_empty()
            && self.parent_ids.is_empty()
            && self.proof_of_work == WorkStamp::Pending
    }

    pub fn is_genesis(&self) -> bool {
        self.parent_ids.is_empty() && !self.is_placeholder()
    }

    /// The string fed to proof of work.
    ///
    /// Binds the id, every domain field and the endorsed parents, so a solved
    /// puzzle cannot be moved onto different content.
    pub fn work_payload(&self) -> String {
        let parents: Vec<&str> = self.parent_ids.iter().map(TxId::as_str).collect();
        format!(
            "{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.id,
            self.timestamp.as_secs(),
            self.sender,
            self.receiver,
            self.amount,
            self.unit,
            self.price_per_unit,
            self.currency,
            parents.join(";"),
        )
    }

    pub fn with_proof_of_work(mut self, stamp: WorkStamp) -> Self {
        self.proof_of_work = stamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(parents: Vec<TxId>) -> Transaction {
        Transaction::new(
            "tx1",
            Timestamp::new(1_741_695_000),
            "node_C",
            "node_D",
            3.0,
            "kWh",
            0.15,
            "USD",
            parents,
        )
    }

    #[test]
    fn new_transaction_has_weight_one_and_pending_work() {
        let tx = trade(vec![TxId::from("tx0")]);
        assert_eq!(tx.cumulative_weight, 1);
        assert_eq!(tx.proof_of_work, WorkStamp::Pending);
        assert!(!tx.is_genesis());
    }

    #[test]
    fn placeholder_is_not_a_genesis() {
        let ph = Transaction::placeholder("ghost");
        assert!(ph.is_placeholder());
        assert!(!ph.is_genesis());
        assert_eq!(ph.cumulative_weight, 0);
    }

    #[test]
    fn parentless_trade_is_genesis() {
        assert!(trade(Vec::new()).is_genesis());
    }

    #[test]
    fn work_payload_changes_with_parents() {
        let a = trade(vec![TxId::from("tx0")]).work_payload();
        let b = trade(vec![TxId::from("tx9")]).work_payload();
        assert_ne!(a, b);
        assert!(a.starts_with("tx1|1741695000|node_C|node_D|3|kWh|0.15|USD|"));
    }
}
