//! Prometheus metrics for the Volt node.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`]; [`NodeMetrics::encode_text`]
//! renders it in the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::NodeError;

/// Central collection of all node-level Prometheus metrics.
pub struct NodeMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Transactions this node created and committed, genesis included.
    pub transactions_produced: IntCounter,
    /// Ledger lines applied from inbound gossip.
    pub lines_merged: IntCounter,
    /// Ledger lines skipped as malformed during a merge.
    pub lines_rejected: IntCounter,
    /// Inbound messages whose checksum did not match their payload.
    pub corrupt_messages: IntCounter,
    /// Inbound messages that could not be decoded or were addressed elsewhere.
    pub dropped_messages: IntCounter,
    /// Producer rounds abandoned because no nonce met the difficulty.
    pub pow_failures: IntCounter,
    /// Producer rounds abandoned because tip selection found no genesis.
    pub selection_failures: IntCounter,
    pub broadcasts_sent: IntCounter,
    /// Peers skipped after exhausting their send attempts.
    pub broadcast_failures: IntCounter,
    pub radio_messages_sent: IntCounter,
    /// Partial radio messages dropped at their reassembly deadline.
    pub reassembly_timeouts: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub ledger_size: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Wall time of one proof-of-work search, in milliseconds.
    pub pow_solve_time_ms: Histogram,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, prometheus::Error> {
    register_int_counter_with_registry!(Opts::new(name, help), registry)
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let transactions_produced = counter(
            &registry,
            "volt_transactions_produced_total",
            "Transactions created and committed by this node",
        )?;
        let lines_merged = counter(
            &registry,
            "volt_lines_merged_total",
            "Ledger lines applied from inbound gossip",
        )?;
        let lines_rejected = counter(
            &registry,
            "volt_lines_rejected_total",
            "Malformed ledger lines skipped during merges",
        )?;
        let corrupt_messages = counter(
            &registry,
            "volt_corrupt_messages_total",
            "Inbound gossip rejected on checksum mismatch",
        )?;
        let dropped_messages = counter(
            &registry,
            "volt_dropped_messages_total",
            "Inbound gossip dropped as malformed or misaddressed",
        )?;
        let pow_failures = counter(
            &registry,
            "volt_pow_failures_total",
            "Proof-of-work searches that exhausted their attempts",
        )?;
        let selection_failures = counter(
            &registry,
            "volt_selection_failures_total",
            "Tip selections that fell back to the genesis marker",
        )?;
        let broadcasts_sent = counter(
            &registry,
            "volt_broadcasts_sent_total",
            "Snapshots delivered to gossip peers",
        )?;
        let broadcast_failures = counter(
            &registry,
            "volt_broadcast_failures_total",
            "Gossip peers skipped after exhausting retries",
        )?;
        let radio_messages_sent = counter(
            &registry,
            "volt_radio_messages_sent_total",
            "Snapshots transmitted over the packet radio",
        )?;
        let reassembly_timeouts = counter(
            &registry,
            "volt_reassembly_timeouts_total",
            "Partial radio messages dropped at their deadline",
        )?;

        let ledger_size = register_int_gauge_with_registry!(
            Opts::new("volt_ledger_size", "Current number of transactions in the ledger"),
            registry
        )?;

        // 1 ms → ~16 s.
        let pow_solve_time_ms = register_histogram_with_registry!(
            HistogramOpts::new("volt_pow_solve_time_ms", "Proof-of-work search time in milliseconds")
                .buckets(prometheus::exponential_buckets(1.0, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            transactions_produced,
            lines_merged,
            lines_rejected,
            corrupt_messages,
            dropped_messages,
            pow_failures,
            selection_failures,
            broadcasts_sent,
            broadcast_failures,
            radio_messages_sent,
            reassembly_timeouts,
            ledger_size,
            pow_solve_time_ms,
        })
    }

    /// Render every registered metric in the text exposition format.
    pub fn encode_text(&self) -> Result<String, NodeError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))?)
    }
}
