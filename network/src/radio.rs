//! Ledger gossip over the packet radio.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use volt_protocol::{
    Expired, Fragmenter, Reassembler, PACKET_INTERVAL, REASSEMBLY_TIMEOUT, RECEIVE_POLL_INTERVAL,
};

use crate::{InboundMessage, NetworkError, Origin, RadioTransport};

/// Packets drained from the radio per poll before yielding.
const MAX_PACKETS_PER_POLL: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioTiming {
    /// Delay after every outbound packet.
    pub packet_interval: Duration,
    /// Deadline of an incomplete inbound message, from its first packet.
    pub reassembly_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for RadioTiming {
    fn default() -> Self {
        Self {
            packet_interval: PACKET_INTERVAL,
            reassembly_timeout: REASSEMBLY_TIMEOUT,
            poll_interval: RECEIVE_POLL_INTERVAL,
        }
    }
}

/// Fragmenting, paced sender and reassembling receiver over one radio.
pub struct RadioLink<T> {
    transport: Arc<T>,
    fragmenter: Fragmenter,
    timing: RadioTiming,
}

impl<T: RadioTransport> RadioLink<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_timing(transport, RadioTiming::default())
    }

    pub fn with_timing(transport: Arc<T>, timing: RadioTiming) -> Self {
        Self {
            transport,
            fragmenter: Fragmenter::new(),
            timing,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn timing(&self) -> RadioTiming {
        self.timing
    }

    /// Fragment `payload` and transmit it, sleeping `packet_interval` after
    /// every packet. Returns the number of packets sent.
    ///
    /// A transport failure aborts the message; the receiver will time out
    /// on whatever part it got.
    pub async fn send_message(&self, payload: &[u8]) -> Result<usize, NetworkError> {
        let packets = self.fragmenter.fragment(payload)?;
        for packet in &packets {
            self.transport.send(&packet.encode())?;
            tokio::time::sleep(self.timing.packet_interval).await;
        }
        tracing::debug!(packets = packets.len(), bytes = payload.len(), "radio message sent");
        Ok(packets.len())
    }

    /// Poll until one message completes or `timeout` elapses.
    pub async fn receive_message(&self, timeout: Duration) -> Result<Vec<u8>, NetworkError> {
        let started = Instant::now();
        let mut reassembler = Reassembler::new(self.timing.reassembly_timeout);
        loop {
            while let Some(raw) = self.transport.receive()? {
                if let Some(done) = reassembler.accept(&raw, Instant::now().into_std()) {
                    return Ok(done.payload);
                }
            }
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(NetworkError::ReassemblyTimeout {
                    waited_ms: u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                    pending: reassembler.pending(),
                });
            }
            tokio::time::sleep(self.timing.poll_interval).await;
        }
    }

    /// Long-running receive loop.
    ///
    /// Completed payloads go to `inbound`; assemblies abandoned at their
    /// deadline are passed to `on_expired`. Stops when `shutdown` resolves
    /// or the inbound channel closes.
    pub async fn run_receiver<F, E>(&self, inbound: mpsc::Sender<InboundMessage>, mut on_expired: E, shutdown: F)
    where
        F: Future<Output = ()>,
        E: FnMut(Expired),
    {
        tokio::pin!(shutdown);
        let mut reassembler = Reassembler::new(self.timing.reassembly_timeout);
        let mut ticker = tokio::time::interval(self.timing.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!("radio receiver started");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("radio receiver shutting down");
                    break;
                }
                _ = ticker.tick() => {}
            }

            for _ in 0..MAX_PACKETS_PER_POLL {
                let raw = match self.transport.receive() {
                    Ok(Some(raw)) => raw,
                    Ok(None) => break,
                    Err(error) => {
                        tracing::warn!(%error, "radio receive failed");
                        break;
                    }
                };
                let Some(done) = reassembler.accept(&raw, Instant::now().into_std()) else {
                    continue;
                };
                tracing::debug!(message_id = done.message_id, bytes = done.payload.len(), "radio message reassembled");
                let message = InboundMessage {
                    origin: Origin::Radio,
                    bytes: done.payload,
                };
                if inbound.send(message).await.is_err() {
                    tracing::debug!("inbound channel closed, radio receiver exiting");
                    return;
                }
            }

            for expired in reassembler.expire(Instant::now().into_std()) {
                tracing::warn!(
                    message_id = expired.message_id,
                    received = expired.received,
                    total = ?expired.total,
                    "radio message timed out, dropping partial payload"
                );
                on_expired(expired);
            }
        }
    }
}
