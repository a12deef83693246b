//! Ledger gossip for the Volt tangle.
//!
//! A node pushes its whole serialized ledger, followed by a SHA-256
//! checksum, to every configured peer over TCP, and to every radio node over
//! the packet-radio link. Receivers verify the checksum on the raw bytes
//! before merging anything.

pub mod broadcast;
pub mod error;
pub mod gossip;
pub mod listener;
pub mod radio;
pub mod transport;

pub use broadcast::{BroadcastResult, Broadcaster, MAX_SEND_ATTEMPTS};
pub use error::NetworkError;
pub use gossip::{receive, GossipMessage, BROADCAST_DESTINATION};
pub use listener::{accept_loop, InboundMessage, Origin, MAX_GOSSIP_MESSAGE_SIZE, READ_TIMEOUT};
pub use radio::{RadioLink, RadioTiming};
pub use transport::{
    peer_socket_addr, DisabledRadio, PeerConnector, RadioTransport, TcpConnector, CONNECT_TIMEOUT,
    DEFAULT_GOSSIP_PORT,
};
