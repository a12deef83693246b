//! Inbound gossip: decode by origin, check the addressee, verify and merge.

use tokio::sync::mpsc;

use volt_ledger::{MergeReport, SharedTangle};
use volt_network::{GossipMessage, InboundMessage, NetworkError, Origin};

use crate::{NodeMetrics, ShutdownSignal};

/// Process one inbound message against the shared ledger.
///
/// Stream messages carry `payload checksum`; radio messages also carry the
/// destination and are refused unless addressed to `node_id` or to every
/// node. Nothing is merged unless the checksum matches.
pub fn handle_inbound(
    message: &InboundMessage,
    node_id: &str,
    tangle: &SharedTangle,
    metrics: &NodeMetrics,
) -> Result<MergeReport, NetworkError> {
    let decoded = match message.origin {
        Origin::Stream(_) => GossipMessage::decode(&message.bytes),
        Origin::Radio => GossipMessage::decode_addressed(&message.bytes),
    };
    let gossip = match decoded {
        Ok(gossip) => gossip,
        Err(error) => {
            metrics.dropped_messages.inc();
            return Err(error);
        }
    };

    if !gossip.is_for(node_id) {
        metrics.dropped_messages.inc();
        return Err(NetworkError::Misaddressed {
            destination: gossip.destination.unwrap_or_default(),
        });
    }

    match gossip.apply(tangle) {
        Ok(report) => {
            metrics.lines_merged.inc_by(report.applied as u64);
            metrics.lines_rejected.inc_by(report.rejected.len() as u64);
            metrics.ledger_size.set(tangle.len() as i64);
            Ok(report)
        }
        Err(error) => {
            if matches!(error, NetworkError::ChecksumMismatch { .. }) {
                metrics.corrupt_messages.inc();
            } else {
                metrics.dropped_messages.inc();
            }
            Err(error)
        }
    }
}

/// Drain `inbound` until shutdown or until every sender is gone.
pub(crate) async fn inbound_loop(
    mut inbound: mpsc::Receiver<InboundMessage>,
    node_id: String,
    tangle: SharedTangle,
    metrics: std::sync::Arc<NodeMetrics>,
    shutdown: ShutdownSignal,
) {
    let shutdown = shutdown.triggered();
    tokio::pin!(shutdown);

    loop {
        let message = tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("inbound gossip loop shutting down");
                break;
            }
            message = inbound.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        match handle_inbound(&message, &node_id, &tangle, &metrics) {
            Ok(report) if report.is_clean() => {
                tracing::debug!(origin = ?message.origin, applied = report.applied, "gossip merged");
            }
            Ok(report) => {
                tracing::warn!(
                    origin = ?message.origin,
                    applied = report.applied,
                    rejected = report.rejected.len(),
                    "gossip merged with malformed lines skipped"
                );
            }
            Err(NetworkError::Misaddressed { destination }) => {
                tracing::debug!(%destination, "radio gossip for another node ignored");
            }
            Err(error) => {
                tracing::warn!(origin = ?message.origin, %error, "inbound gossip discarded");
            }
        }
    }
}
