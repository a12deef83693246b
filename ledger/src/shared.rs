//! The cross-task ledger handle.
//!
//! Tip selection and serialization take the read side and may run together;
//! `add`, `increment_weight`, `commit` and merges take the write side and
//! exclude everything else. Guards must not be held across an `.await`.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use volt_types::Transaction;

use crate::{MergeReport, MissingWeightPolicy, Tangle};

/// A [`Tangle`] behind a readers-writer lock, cheap to clone.
#[derive(Clone, Debug, Default)]
pub struct SharedTangle {
    inner: Arc<RwLock<Tangle>>,
}

impl SharedTangle {
    pub fn new(tangle: Tangle) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tangle)),
        }
    }

    pub fn with_policy(policy: MissingWeightPolicy) -> Self {
        Self::new(Tangle::with_policy(policy))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Tangle> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Tangle> {
        self.inner.write()
    }

    pub fn add(&self, tx: Transaction) -> Option<Transaction> {
        self.write().add(tx)
    }

    pub fn increment_weight(&self, id: &str) -> Option<u64> {
        self.write().increment_weight(id)
    }

    pub fn commit(&self, tx: Transaction) -> Option<Transaction> {
        self.write().commit(tx)
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.read().serialize()
    }

    pub fn merge_from_serialized(&self, bytes: &[u8]) -> MergeReport {
        self.write().merge_from_serialized(bytes)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the current state, for callers that need to work without
    /// holding the lock.
    pub fn snapshot(&self) -> Tangle {
        self.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use volt_types::{Timestamp, TxId};

    fn tx(id: &str, parents: Vec<TxId>) -> Transaction {
        Transaction::new(id, Timestamp::new(0), "a", "b", 1.0, "kWh", 0.1, "USD", parents)
    }

    #[test]
    fn clones_share_state() {
        let shared = SharedTangle::default();
        let other = shared.clone();
        other.add(tx("tx0", Vec::new()));
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn concurrent_commits_count_every_endorsement() {
        let shared = SharedTangle::default();
        shared.add(tx("g", Vec::new()));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for n in 0..50 {
                        let id = format!("w{worker}-{n}");
                        shared.commit(tx(&id, vec![TxId::from("g")]));
                        let _ = shared.serialize();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len(), 1 + 8 * 50);
        assert_eq!(shared.read().get("g").map(|g| g.cumulative_weight), Some(1 + 8 * 50));
    }

    #[test]
    fn concurrent_merges_and_reads_do_not_lose_entries() {
        let source = SharedTangle::default();
        for n in 0..20 {
            source.add(tx(&format!("r{n}"), Vec::new()));
        }
        let payload = source.serialize();

        let target = SharedTangle::default();
        let writer = {
            let target = target.clone();
            let payload = payload.clone();
            thread::spawn(move || target.merge_from_serialized(&payload))
        };
        let reader = {
            let target = target.clone();
            thread::spawn(move || target.read().iter().count())
        };
        let report = writer.join().unwrap();
        let seen = reader.join().unwrap();

        assert_eq!(report.applied, 20);
        assert!(seen == 0 || seen == 20);
        assert_eq!(target.len(), 20);
    }
}
