//! Transport capabilities.
//!
//! The core talks to the outside world through two seams: a packet radio
//! that can send and poll single packets, and a connector that opens a
//! writable stream to a peer. Production code uses [`TcpConnector`] and a
//! hardware radio; tests use the doubles in `volt-nullables`.

use std::future::Future;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tokio::net::TcpStream;

use crate::NetworkError;

/// Timeout for one outbound TCP connection attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Port assumed for a peer listed without one.
pub const DEFAULT_GOSSIP_PORT: u16 = 8080;

/// A half-duplex packet radio.
///
/// Both calls are short and non-blocking from the caller's point of view:
/// `receive` returns `Ok(None)` when no packet is waiting.
pub trait RadioTransport: Send + Sync + 'static {
    fn send(&self, packet: &[u8]) -> Result<(), NetworkError>;
    fn receive(&self) -> Result<Option<Vec<u8>>, NetworkError>;
}

/// Opens outbound streams to gossip peers.
pub trait PeerConnector: Send + Sync + 'static {
    type Stream: AsyncWrite + Unpin + Send;

    fn connect(&self, peer: &str) -> impl Future<Output = Result<Self::Stream, NetworkError>> + Send;
}

/// TCP connector with a bounded connect time.
#[derive(Clone, Copy, Debug)]
pub struct TcpConnector {
    timeout: Duration,
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self {
            timeout: CONNECT_TIMEOUT,
        }
    }
}

impl TcpConnector {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl PeerConnector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, peer: &str) -> Result<TcpStream, NetworkError> {
        let addr = peer_socket_addr(peer);
        tokio::time::timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| NetworkError::ConnectionFailed {
                peer: addr.clone(),
                reason: "connection timed out".into(),
            })?
            .map_err(|e| NetworkError::ConnectionFailed {
                peer: addr.clone(),
                reason: e.to_string(),
            })
    }
}

/// `peer` with [`DEFAULT_GOSSIP_PORT`] appended when it names a host only.
pub fn peer_socket_addr(peer: &str) -> String {
    let peer = peer.trim();
    let has_port = match peer.rsplit_once(':') {
        // Bracketed IPv6 with port, or host:port.
        Some((host, port)) => {
            port.parse::<u16>().is_ok() && (!host.contains(':') || host.ends_with(']'))
        }
        None => false,
    };
    if has_port {
        peer.to_string()
    } else if peer.contains(':') && !peer.starts_with('[') {
        format!("[{peer}]:{DEFAULT_GOSSIP_PORT}")
    } else {
        format!("{peer}:{DEFAULT_GOSSIP_PORT}")
    }
}

/// The radio of a node without radio hardware.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledRadio;

impl RadioTransport for DisabledRadio {
    fn send(&self, _packet: &[u8]) -> Result<(), NetworkError> {
        Err(NetworkError::Transport("radio disabled".into()))
    }

    fn receive(&self) -> Result<Option<Vec<u8>>, NetworkError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_default_port() {
        assert_eq!(peer_socket_addr("198.162.12.27"), "198.162.12.27:8080");
        assert_eq!(peer_socket_addr("node-b.local"), "node-b.local:8080");
        assert_eq!(peer_socket_addr("::1"), "[::1]:8080");
    }

    #[test]
    fn keeps_explicit_port() {
        assert_eq!(peer_socket_addr("10.0.0.2:9000"), "10.0.0.2:9000");
        assert_eq!(peer_socket_addr("[::1]:9000"), "[::1]:9000");
    }

    #[test]
    fn disabled_radio_refuses_to_send() {
        assert!(DisabledRadio.send(b"x").is_err());
        assert!(matches!(DisabledRadio.receive(), Ok(None)));
    }

    #[tokio::test]
    async fn tcp_connect_failure_is_reported() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let result = TcpConnector::default().connect(&addr.to_string()).await;
        assert!(matches!(result, Err(NetworkError::ConnectionFailed { .. })));
    }
}
