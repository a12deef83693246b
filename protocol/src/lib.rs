//! Framing for the constrained radio link.
//!
//! A payload is cut into chunks of at most [`MAX_CHUNK_SIZE`] bytes, each
//! prefixed with a [`PacketHeader`]. The receiver groups packets by message
//! id and emits the payload once every sequence number up to the declared
//! total has arrived, in any order. Incomplete assemblies are abandoned after
//! [`REASSEMBLY_TIMEOUT`].

use std::time::Duration;

pub mod error;
pub mod fragment;
pub mod packet;
pub mod reassembly;

pub use error::ProtocolError;
pub use fragment::Fragmenter;
pub use packet::{Packet, PacketHeader, PacketKind, HEADER_LEN};
pub use reassembly::{Expired, Reassembled, Reassembler};

/// Largest chunk carried by one packet.
pub const MAX_CHUNK_SIZE: usize = 200;

/// Largest packet on air: header plus a full chunk.
pub const MAX_PACKET_SIZE: usize = HEADER_LEN + MAX_CHUNK_SIZE;

/// Time on air of one full packet at the default radio settings.
pub const PACKET_AIRTIME: Duration = Duration::from_millis(400);

/// Delay between consecutive outbound packets (airtime plus 50 ms margin).
pub const PACKET_INTERVAL: Duration = Duration::from_millis(450);

/// How long an incomplete message may wait for missing packets.
pub const REASSEMBLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Receive poll period of the radio loop.
pub const RECEIVE_POLL_INTERVAL: Duration = Duration::from_millis(10);
