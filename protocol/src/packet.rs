//! Packet header wire format.
//!
//! ```text
//! offset  size  field
//! 0       1     kind (1 start, 2 middle, 3 end)
//! 1       2     message id, little-endian
//! 3       2     sequence number, little-endian, 0-based
//! 5       2     total packets, little-endian, 0 except on start
//! 7       ..    chunk
//! ```

use crate::ProtocolError;

/// Encoded header size.
pub const HEADER_LEN: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketKind {
    /// First packet of a message; the only one declaring the total.
    Start = 1,
    Middle = 2,
    End = 3,
}

impl PacketKind {
    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            1 => Ok(Self::Start),
            2 => Ok(Self::Middle),
            3 => Ok(Self::End),
            other => Err(ProtocolError::UnknownKind(other)),
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Kind of packet `sequence` in a message of `total` packets.
    ///
    /// A single-packet message is one `Start`.
    pub fn for_position(sequence: u16, total: u16) -> Self {
        if sequence == 0 {
            Self::Start
        } else if sequence.checked_add(1) == Some(total) {
            Self::End
        } else {
            Self::Middle
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PacketHeader {
    pub kind: PacketKind,
    pub message_id: u16,
    pub sequence: u16,
    /// Declared packet count; meaningful on `Start` only.
    pub total: u16,
}

impl PacketHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0] = self.kind.as_byte();
        out[1..3].copy_from_slice(&self.message_id.to_le_bytes());
        out[3..5].copy_from_slice(&self.sequence.to_le_bytes());
        out[5..7].copy_from_slice(&self.total.to_le_bytes());
        out
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self, ProtocolError> {
        if raw.len() < HEADER_LEN {
            return Err(ProtocolError::TooShort {
                len: raw.len(),
                min: HEADER_LEN,
            });
        }
        let kind = PacketKind::from_byte(raw[0])?;
        let message_id = u16::from_le_bytes([raw[1], raw[2]]);
        let sequence = u16::from_le_bytes([raw[3], raw[4]]);
        let total = u16::from_le_bytes([raw[5], raw[6]]);
        if kind == PacketKind::Start && sequence >= total {
            return Err(ProtocolError::InvalidTotal { sequence, total });
        }
        Ok(Self {
            kind,
            message_id,
            sequence,
            total,
        })
    }
}

/// A header with its chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    pub header: PacketHeader,
    pub chunk: Vec<u8>,
}

impl Packet {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.chunk.len());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.chunk);
        out
    }

    /// Parse one raw packet. Anything not longer than a header is rejected.
    pub fn decode(raw: &[u8]) -> Result<Self, ProtocolError> {
        let header = PacketHeader::from_bytes(raw)?;
        let chunk = &raw[HEADER_LEN..];
        if chunk.is_empty() {
            return Err(ProtocolError::EmptyChunk);
        }
        Ok(Self {
            header,
            chunk: chunk.to_vec(),
        })
    }
}
