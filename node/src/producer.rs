//! The transaction producer.
//!
//! One round selects tips under the read lock, drafts a trade endorsing
//! them, runs proof of work on the blocking pool with no lock held, then
//! commits under the write lock. An empty ledger gets this node's genesis
//! first.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use volt_ledger::{create_genesis, SharedTangle};
use volt_tips::TipSelector;
use volt_types::{Timestamp, Transaction, TxId, WorkStamp};
use volt_work::WorkGenerator;

use crate::config::{NodeConfig, TradeConfig};
use crate::{NodeError, NodeMetrics};

/// What one producer round did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProduceOutcome {
    /// The ledger was empty; this node's genesis was committed.
    Genesis(TxId),
    Committed { id: TxId, parents: Vec<TxId> },
    /// Tip selection found no genesis to walk from. Nothing was endorsed.
    SelectionFailed,
    /// No nonce met the difficulty; the draft was abandoned.
    WorkExhausted { id: TxId },
}

impl ProduceOutcome {
    /// Whether the round changed the ledger.
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Genesis(_) | Self::Committed { .. })
    }
}

pub struct Producer<R = StdRng> {
    node_id: String,
    tangle: SharedTangle,
    selector: TipSelector,
    work: WorkGenerator,
    difficulty: u32,
    trade: TradeConfig,
    metrics: Arc<NodeMetrics>,
    rng: R,
    sequence: u64,
}

impl Producer<StdRng> {
    pub fn new(config: &NodeConfig, tangle: SharedTangle, metrics: Arc<NodeMetrics>) -> Self {
        Self {
            node_id: config.node_id.clone(),
            tangle,
            selector: config.tip_selector(),
            work: WorkGenerator::new(config.work_config()),
            difficulty: config.pow_difficulty,
            trade: config.trade.clone(),
            metrics,
            rng: StdRng::from_entropy(),
            sequence: 0,
        }
    }
}

impl<R: Rng> Producer<R> {
    /// Replace the randomness used for tip walks and trade amounts.
    pub fn with_rng<G: Rng>(self, rng: G) -> Producer<G> {
        Producer {
            node_id: self.node_id,
            tangle: self.tangle,
            selector: self.selector,
            work: self.work,
            difficulty: self.difficulty,
            trade: self.trade,
            metrics: self.metrics,
            rng,
            sequence: self.sequence,
        }
    }

    pub fn tangle(&self) -> &SharedTangle {
        &self.tangle
    }

    pub async fn produce(&mut self) -> Result<ProduceOutcome, NodeError> {
        if self.tangle.is_empty() {
            let genesis = create_genesis(&self.node_id, Timestamp::now());
            let id = genesis.id.clone();
            return Ok(match self.stamp(genesis).await? {
                Some(genesis) => {
                    self.commit(genesis);
                    tracing::info!(id = %id, "genesis committed");
                    ProduceOutcome::Genesis(id)
                }
                None => ProduceOutcome::WorkExhausted { id },
            });
        }

        let parents = {
            let tangle = self.tangle.read();
            self.selector.select(&tangle, &mut self.rng)
        };
        if parents.is_empty() || parents.iter().any(TxId::is_fallback_marker) {
            self.metrics.selection_failures.inc();
            tracing::warn!(
                strategy = self.selector.strategy.as_str(),
                "tip selection found no genesis, skipping round"
            );
            return Ok(ProduceOutcome::SelectionFailed);
        }

        let draft = self.draft(parents.clone());
        let id = draft.id.clone();
        match self.stamp(draft).await? {
            Some(tx) => {
                self.commit(tx);
                tracing::debug!(id = %id, parents = ?parents, "transaction committed");
                Ok(ProduceOutcome::Committed { id, parents })
            }
            None => Ok(ProduceOutcome::WorkExhausted { id }),
        }
    }

    fn draft(&mut self, parents: Vec<TxId>) -> Transaction {
        self.sequence += 1;
        let now = Timestamp::now();
        let amount = self
            .rng
            .gen_range(self.trade.min_amount..=self.trade.max_amount);
        Transaction::new(
            format!("{}-{}-{}", self.node_id, now.as_secs(), self.sequence),
            now,
            self.node_id.as_str(),
            self.trade.receiver.as_str(),
            (amount * 100.0).round() / 100.0,
            self.trade.unit.as_str(),
            self.trade.price_per_unit,
            self.trade.currency.as_str(),
            parents,
        )
    }

    /// Attach proof of work, or `None` when the search hit its ceiling.
    async fn stamp(&self, tx: Transaction) -> Result<Option<Transaction>, NodeError> {
        let payload = tx.work_payload();
        let work = self.work.clone();
        let difficulty = self.difficulty;

        let started = Instant::now();
        let stamp = tokio::task::spawn_blocking(move || work.solve(&payload, difficulty))
            .await
            .map_err(|e| NodeError::Task(e.to_string()))?;
        self.metrics
            .pow_solve_time_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);

        if stamp == WorkStamp::Invalid {
            self.metrics.pow_failures.inc();
            tracing::warn!(id = %tx.id, difficulty, "proof of work exhausted, transaction abandoned");
            return Ok(None);
        }
        Ok(Some(tx.with_proof_of_work(stamp)))
    }

    fn commit(&self, tx: Transaction) {
        let size = {
            let mut tangle = self.tangle.write();
            tangle.commit(tx);
            tangle.len()
        };
        self.metrics.transactions_produced.inc();
        self.metrics.ledger_size.set(size as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volt_ledger::genesis_id;
    use volt_tips::TipStrategy;
    use volt_work::meets_difficulty;

    fn config(strategy: TipStrategy) -> NodeConfig {
        NodeConfig {
            tip_strategy: strategy,
            pow_difficulty: 1,
            ..NodeConfig::default()
        }
    }

    fn producer(config: &NodeConfig) -> Producer<StdRng> {
        let metrics = Arc::new(NodeMetrics::new().unwrap());
        Producer::new(config, SharedTangle::default(), metrics).with_rng(StdRng::seed_from_u64(7))
    }

    #[tokio::test]
    async fn empty_ledger_gets_a_genesis() {
        let mut producer = producer(&config(TipStrategy::Weakest));
        let outcome = producer.produce().await.unwrap();

        let id = genesis_id("node_A");
        assert_eq!(outcome, ProduceOutcome::Genesis(id.clone()));
        let tangle = producer.tangle().snapshot();
        let genesis = tangle.get(id.as_str()).unwrap();
        assert!(genesis.is_genesis());
        assert!(meets_difficulty(genesis.proof_of_work.hash().unwrap(), 1));
    }

    #[tokio::test]
    async fn second_round_endorses_the_genesis() {
        let mut producer = producer(&config(TipStrategy::WeightedRandomWalk));
        producer.produce().await.unwrap();
        let outcome = producer.produce().await.unwrap();

        let g = genesis_id("node_A");
        let ProduceOutcome::Committed { id, parents } = outcome else {
            panic!("expected a commit, got {outcome:?}");
        };
        // Two walks from a childless genesis both stop at it.
        assert_eq!(parents, [g.clone(), g.clone()]);

        let tangle = producer.tangle().snapshot();
        assert_eq!(tangle.len(), 2);
        assert_eq!(tangle.get(g.as_str()).unwrap().cumulative_weight, 3);
        let tx = tangle.get(id.as_str()).unwrap();
        assert_eq!(tx.sender, "node_A");
        assert_eq!(tx.receiver, "node_B");
        assert!((1.0..=10.0).contains(&tx.amount));
        assert!(tx.proof_of_work.is_solved());
    }

    #[tokio::test]
    async fn produced_ids_are_unique() {
        let mut producer = producer(&config(TipStrategy::Weakest));
        for _ in 0..5 {
            assert!(producer.produce().await.unwrap().is_commit());
        }
        assert_eq!(producer.tangle().len(), 5);
    }

    #[tokio::test]
    async fn exhausted_work_abandons_the_draft() {
        let config = NodeConfig {
            pow_difficulty: 12,
            pow_max_attempts: 4,
            ..NodeConfig::default()
        };
        let mut producer = producer(&config);

        let outcome = producer.produce().await.unwrap();
        assert!(matches!(outcome, ProduceOutcome::WorkExhausted { .. }));
        assert!(producer.tangle().is_empty());
        assert_eq!(producer.metrics.pow_failures.get(), 1);
    }

    #[tokio::test]
    async fn ledger_without_genesis_fails_selection() {
        let mut producer = producer(&config(TipStrategy::UnweightedRandomWalk));
        let orphan = Transaction::new(
            "orphan",
            Timestamp::new(1_741_694_400),
            "node_X",
            "node_Y",
            1.0,
            "kWh",
            0.12,
            "USD",
            vec![TxId::from("gone")],
        );
        producer.tangle().add(orphan);

        assert_eq!(producer.produce().await.unwrap(), ProduceOutcome::SelectionFailed);
        assert_eq!(producer.tangle().len(), 1);
        assert_eq!(producer.metrics.selection_failures.get(), 1);
    }
}
