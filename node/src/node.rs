//! The running Volt node: one shared ledger, four loops.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use volt_ledger::SharedTangle;
use volt_network::{
    accept_loop, BroadcastResult, Broadcaster, DisabledRadio, GossipMessage, PeerConnector,
    RadioLink, RadioTransport, TcpConnector,
};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::inbound::inbound_loop;
use crate::metrics::NodeMetrics;
use crate::producer::Producer;
use crate::shutdown::ShutdownController;

/// Channel capacity between the receive loops and the merge loop.
const INBOUND_CHANNEL_CAPACITY: usize = 64;
/// Timeout for waiting on background tasks during shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A running Volt node.
///
/// Owns the only [`SharedTangle`]. `start` spawns:
/// - the TCP gossip listener
/// - the radio receiver, when the radio is enabled
/// - the merge loop that applies inbound gossip
/// - the producer, which gossips a snapshot after every commit
pub struct VoltNode<C = TcpConnector, R = DisabledRadio> {
    config: NodeConfig,
    tangle: SharedTangle,
    metrics: Arc<NodeMetrics>,
    shutdown: ShutdownController,
    fanout: Fanout<C, R>,
    local_addr: Option<SocketAddr>,
    task_handles: Vec<JoinHandle<()>>,
}

impl VoltNode<TcpConnector, DisabledRadio> {
    /// A node that gossips over TCP only.
    pub fn tcp_only(config: NodeConfig) -> Result<Self, NodeError> {
        Self::new(config, TcpConnector::default(), None)
    }
}

impl<C: PeerConnector, R: RadioTransport> VoltNode<C, R> {
    pub fn new(config: NodeConfig, connector: C, radio: Option<Arc<R>>) -> Result<Self, NodeError> {
        config.validate()?;
        let metrics = Arc::new(NodeMetrics::new()?);

        let radio = match radio {
            Some(transport) if config.radio.enabled => {
                Some(Arc::new(RadioLink::with_timing(transport, config.radio.timing())))
            }
            Some(_) => None,
            None => {
                if config.radio.enabled {
                    tracing::warn!("radio enabled but no transport supplied, radio gossip disabled");
                }
                None
            }
        };

        let tangle = SharedTangle::default();
        let fanout = Fanout {
            tangle: tangle.clone(),
            broadcaster: Arc::new(Broadcaster::new(connector)),
            radio,
            peers: Arc::new(config.peers.clone()),
            radio_destination: config.radio.destination.clone(),
            metrics: Arc::clone(&metrics),
        };

        Ok(Self {
            config,
            tangle,
            metrics,
            shutdown: ShutdownController::new(),
            fanout,
            local_addr: None,
            task_handles: Vec::new(),
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn tangle(&self) -> &SharedTangle {
        &self.tangle
    }

    pub fn metrics(&self) -> &Arc<NodeMetrics> {
        &self.metrics
    }

    /// Bound gossip address, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        !self.task_handles.is_empty()
    }

    pub async fn start(&mut self) -> Result<(), NodeError> {
        if self.is_running() {
            return Err(NodeError::AlreadyStarted);
        }
        tracing::info!(
            node_id = %self.config.node_id,
            listen_addr = %self.config.listen_addr,
            peers = self.config.peers.len(),
            tip_strategy = self.config.tip_strategy.as_str(),
            pow_variant = self.config.pow_variant.as_str(),
            pow_difficulty = self.config.pow_difficulty,
            radio = self.fanout.radio.is_some(),
            "Volt node starting"
        );

        let listener = TcpListener::bind(&self.config.listen_addr).await?;
        let local_addr = listener.local_addr()?;
        self.local_addr = Some(local_addr);

        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CHANNEL_CAPACITY);

        // ── Gossip listener ───────────────────────────────────────────────
        let shutdown_listener = self.shutdown.subscribe();
        let inbound_tcp = inbound_tx.clone();
        self.task_handles.push(tokio::spawn(async move {
            accept_loop(listener, inbound_tcp, shutdown_listener.triggered()).await;
        }));

        // ── Radio receiver ────────────────────────────────────────────────
        if let Some(link) = &self.fanout.radio {
            let link = Arc::clone(link);
            let metrics_radio = Arc::clone(&self.metrics);
            let shutdown_radio = self.shutdown.subscribe();
            let inbound_radio = inbound_tx.clone();
            self.task_handles.push(tokio::spawn(async move {
                link.run_receiver(
                    inbound_radio,
                    move |_| metrics_radio.reassembly_timeouts.inc(),
                    shutdown_radio.triggered(),
                )
                .await;
            }));
        }
        drop(inbound_tx);

        // ── Merge loop ────────────────────────────────────────────────────
        self.task_handles.push(tokio::spawn(inbound_loop(
            inbound_rx,
            self.config.node_id.clone(),
            self.tangle.clone(),
            Arc::clone(&self.metrics),
            self.shutdown.subscribe(),
        )));

        // ── Producer ──────────────────────────────────────────────────────
        let mut producer = Producer::new(&self.config, self.tangle.clone(), Arc::clone(&self.metrics));
        let fanout = self.fanout.clone();
        let interval = self.config.produce_interval();
        let shutdown_producer = self.shutdown.subscribe().triggered();
        self.task_handles.push(tokio::spawn(async move {
            tokio::pin!(shutdown_producer);
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_producer => break,
                    _ = ticker.tick() => {}
                }
                let outcome = tokio::select! {
                    biased;
                    _ = &mut shutdown_producer => break,
                    outcome = producer.produce() => outcome,
                };
                match outcome {
                    Ok(outcome) if outcome.is_commit() => {
                        fanout.publish().await;
                    }
                    Ok(outcome) => {
                        tracing::debug!(?outcome, "producer round committed nothing");
                    }
                    Err(error) => {
                        tracing::warn!(%error, "producer round failed");
                    }
                }
            }
            tracing::info!("producer shutting down");
        }));

        tracing::info!(%local_addr, "Volt node started");
        Ok(())
    }

    /// Push the current ledger to every peer and over the radio now.
    pub async fn gossip_now(&self) -> BroadcastResult {
        self.fanout.publish().await
    }

    /// Trigger shutdown and join every task. Tasks still running after
    /// [`SHUTDOWN_TIMEOUT`] are left behind and reported as
    /// [`NodeError::ShutdownTimeout`].
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        tracing::info!("Volt node stopping");
        self.shutdown.shutdown();

        let handles: Vec<JoinHandle<()>> = self.task_handles.drain(..).collect();
        let joined = join_within(handles, SHUTDOWN_TIMEOUT).await;

        self.metrics.ledger_size.set(self.tangle.len() as i64);
        tracing::info!(transactions = self.tangle.len(), "Volt node stopped");
        joined
    }

    /// Start, wait for SIGINT or SIGTERM, then stop.
    pub async fn run(&mut self) -> Result<(), NodeError> {
        self.start().await?;
        self.shutdown.wait_for_signal().await;
        self.stop().await
    }
}

async fn join_within(handles: Vec<JoinHandle<()>>, timeout: Duration) -> Result<(), NodeError> {
    let wait_all = async {
        for handle in handles {
            let _ = handle.await;
        }
    };
    if tokio::time::timeout(timeout, wait_all).await.is_err() {
        tracing::warn!(?timeout, "shutdown timeout, some tasks may still be running");
        return Err(NodeError::ShutdownTimeout);
    }
    Ok(())
}

/// Everything the producer needs to push a snapshot out.
struct Fanout<C, R> {
    tangle: SharedTangle,
    broadcaster: Arc<Broadcaster<C>>,
    radio: Option<Arc<RadioLink<R>>>,
    peers: Arc<Vec<String>>,
    radio_destination: String,
    metrics: Arc<NodeMetrics>,
}

impl<C, R> Clone for Fanout<C, R> {
    fn clone(&self) -> Self {
        Self {
            tangle: self.tangle.clone(),
            broadcaster: Arc::clone(&self.broadcaster),
            radio: self.radio.clone(),
            peers: Arc::clone(&self.peers),
            radio_destination: self.radio_destination.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<C: PeerConnector, R: RadioTransport> Fanout<C, R> {
    async fn publish(&self) -> BroadcastResult {
        let message = {
            let tangle = self.tangle.read();
            GossipMessage::publish(&tangle)
        };

        let result = self.broadcaster.broadcast(&message.encode(), &self.peers).await;
        self.metrics.broadcasts_sent.inc_by(result.sent as u64);
        self.metrics.broadcast_failures.inc_by(result.failed as u64);

        if let Some(link) = &self.radio {
            let wire = message.addressed(self.radio_destination.as_str()).encode();
            match link.send_message(&wire).await {
                Ok(packets) => {
                    self.metrics.radio_messages_sent.inc();
                    tracing::debug!(packets, destination = %self.radio_destination, "snapshot sent over radio");
                }
                Err(error) => {
                    tracing::warn!(%error, "radio gossip failed");
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn finished_tasks_join_cleanly() {
        let handles = vec![tokio::spawn(async {}), tokio::spawn(async {})];
        assert!(join_within(handles, SHUTDOWN_TIMEOUT).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_task_reports_shutdown_timeout() {
        let stuck = tokio::spawn(std::future::pending::<()>());
        let result = join_within(vec![stuck], SHUTDOWN_TIMEOUT).await;
        assert!(matches!(result, Err(NodeError::ShutdownTimeout)));
    }

    #[tokio::test]
    async fn stop_without_start_is_clean() {
        let mut node = VoltNode::tcp_only(NodeConfig::default()).unwrap();
        assert!(node.stop().await.is_ok());
        assert!(!node.is_running());
    }
}
