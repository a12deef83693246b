//! Nullable peer connector: in-memory streams with scripted failures.

use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::io::AsyncWrite;

use volt_network::{NetworkError, PeerConnector};

#[derive(Default)]
struct Ledger {
    /// Remaining failed connects per peer; `usize::MAX` means unreachable.
    failures: HashMap<String, usize>,
    attempts: HashMap<String, usize>,
    delivered: HashMap<String, Vec<Vec<u8>>>,
}

/// A connector whose peers are buffers.
///
/// A message counts as delivered when its stream is shut down, matching the
/// way a TCP peer sees a complete message at end-of-stream.
#[derive(Clone, Default)]
pub struct NullConnector {
    state: Arc<Mutex<Ledger>>,
}

impl NullConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `times` connects to `peer` fail.
    pub fn fail_next(&self, peer: &str, times: usize) {
        self.state.lock().failures.insert(peer.to_string(), times);
    }

    /// Every connect to `peer` fails.
    pub fn unreachable(&self, peer: &str) {
        self.fail_next(peer, usize::MAX);
    }

    /// Connect attempts made to `peer`, failed or not.
    pub fn attempts(&self, peer: &str) -> usize {
        self.state.lock().attempts.get(peer).copied().unwrap_or(0)
    }

    /// Complete messages received by `peer`.
    pub fn delivered(&self, peer: &str) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .delivered
            .get(peer)
            .cloned()
            .unwrap_or_default()
    }
}

impl PeerConnector for NullConnector {
    type Stream = NullStream;

    async fn connect(&self, peer: &str) -> Result<NullStream, NetworkError> {
        let mut state = self.state.lock();
        *state.attempts.entry(peer.to_string()).or_default() += 1;
        if let Some(left) = state.failures.get_mut(peer) {
            if *left > 0 {
                if *left != usize::MAX {
                    *left -= 1;
                }
                return Err(NetworkError::ConnectionFailed {
                    peer: peer.to_string(),
                    reason: "null connector refused".into(),
                });
            }
        }
        Ok(NullStream {
            peer: peer.to_string(),
            buffer: Vec::new(),
            state: Arc::clone(&self.state),
        })
    }
}

/// Write half handed out by [`NullConnector`].
pub struct NullStream {
    peer: String,
    buffer: Vec<u8>,
    state: Arc<Mutex<Ledger>>,
}

impl AsyncWrite for NullStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.get_mut().buffer.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let message = std::mem::take(&mut this.buffer);
        this.state
            .lock()
            .delivered
            .entry(this.peer.clone())
            .or_default()
            .push(message);
        Poll::Ready(Ok(()))
    }
}
