//! Inbound TCP gossip.
//!
//! One connection carries one message: the peer writes it and closes its
//! side. Each accepted connection is read on its own task, so a slow peer
//! never holds up the accept loop.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::NetworkError;

/// Largest inbound message accepted.
pub const MAX_GOSSIP_MESSAGE_SIZE: usize = 16 * 1024 * 1024; // 16 MiB

/// How long a peer may take to deliver one message.
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Where an inbound message came from. The wire form differs per origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Stream(SocketAddr),
    Radio,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub origin: Origin,
    pub bytes: Vec<u8>,
}

/// Accept connections until `shutdown` resolves, forwarding each complete
/// message to `inbound`.
pub async fn accept_loop<F>(listener: TcpListener, inbound: mpsc::Sender<InboundMessage>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "gossip listener started");
    }

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("gossip listener shutting down");
                break;
            }
            result = listener.accept() => {
                match result {
                    Ok((stream, peer)) => {
                        tracing::debug!(%peer, "gossip connection accepted");
                        let inbound = inbound.clone();
                        tokio::spawn(async move {
                            match read_message(stream).await {
                                Ok(bytes) if bytes.is_empty() => {
                                    tracing::debug!(%peer, "peer closed without data");
                                }
                                Ok(bytes) => {
                                    let message = InboundMessage { origin: Origin::Stream(peer), bytes };
                                    if inbound.send(message).await.is_err() {
                                        tracing::debug!(%peer, "inbound channel closed, dropping message");
                                    }
                                }
                                Err(error) => {
                                    tracing::warn!(%peer, %error, "failed to read gossip message");
                                }
                            }
                        });
                    }
                    Err(error) => {
                        tracing::warn!(%error, "accept failed");
                    }
                }
            }
        }
    }
}

/// Read until the peer closes its side, within the size and time bounds.
pub async fn read_message(stream: TcpStream) -> Result<Vec<u8>, NetworkError> {
    let mut bytes = Vec::new();
    let limit = MAX_GOSSIP_MESSAGE_SIZE as u64 + 1;
    tokio::time::timeout(READ_TIMEOUT, stream.take(limit).read_to_end(&mut bytes))
        .await
        .map_err(|_| {
            NetworkError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "peer did not finish its message",
            ))
        })??;
    if bytes.len() > MAX_GOSSIP_MESSAGE_SIZE {
        return Err(NetworkError::MessageTooLarge {
            size: bytes.len(),
            max: MAX_GOSSIP_MESSAGE_SIZE,
        });
    }
    Ok(bytes)
}
