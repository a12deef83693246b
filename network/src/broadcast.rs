//! Fan-out of one gossip message to every configured peer.
//!
//! Each peer gets its own connection per attempt. A failed connect or write
//! is retried up to [`MAX_SEND_ATTEMPTS`] times in total; after that the
//! peer is skipped and the broadcast moves on.

use tokio::io::AsyncWriteExt;

use crate::{NetworkError, PeerConnector};

/// Attempts per peer before it is skipped.
pub const MAX_SEND_ATTEMPTS: usize = 3;

/// Outcome of a broadcast.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastResult {
    /// Peers that received the message.
    pub sent: usize,
    /// Peers skipped after exhausting their attempts.
    pub failed: usize,
}

pub struct Broadcaster<C> {
    connector: C,
    max_attempts: usize,
}

impl<C: PeerConnector> Broadcaster<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            max_attempts: MAX_SEND_ATTEMPTS,
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Send `message` to every peer in `peers`, in order.
    pub async fn broadcast(&self, message: &[u8], peers: &[String]) -> BroadcastResult {
        let mut result = BroadcastResult::default();
        for peer in peers {
            match self.send_with_retry(peer, message).await {
                Ok(attempt) => {
                    tracing::debug!(peer = %peer, attempt, bytes = message.len(), "gossip sent");
                    result.sent += 1;
                }
                Err(error) => {
                    tracing::warn!(peer = %peer, %error, attempts = self.max_attempts, "peer skipped");
                    result.failed += 1;
                }
            }
        }
        result
    }

    /// Returns the 1-based attempt that succeeded, or the last error.
    async fn send_with_retry(&self, peer: &str, message: &[u8]) -> Result<usize, NetworkError> {
        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.send_once(peer, message).await {
                Ok(()) => return Ok(attempt),
                Err(error) => {
                    tracing::debug!(peer, attempt, %error, "gossip attempt failed");
                    last_error = Some(error);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| NetworkError::ConnectionFailed {
            peer: peer.to_string(),
            reason: "no attempts made".into(),
        }))
    }

    async fn send_once(&self, peer: &str, message: &[u8]) -> Result<(), NetworkError> {
        let mut stream = self.connector.connect(peer).await?;
        stream.write_all(message).await?;
        // Closing the write side is the end-of-message marker.
        stream.shutdown().await?;
        Ok(())
    }
}
