//! Outbound fragmentation.

use std::sync::atomic::{AtomicU16, Ordering};

use crate::{Packet, PacketHeader, PacketKind, ProtocolError, MAX_CHUNK_SIZE};

/// Cuts payloads into headered packets.
///
/// Message ids come from a 16-bit counter that starts at zero and wraps.
/// The counter is atomic, so one fragmenter can be shared by concurrent
/// senders without two messages ever receiving the same id in a row.
#[derive(Debug)]
pub struct Fragmenter {
    next_message_id: AtomicU16,
    chunk_size: usize,
}

impl Default for Fragmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Fragmenter {
    pub fn new() -> Self {
        Self::with_chunk_size(MAX_CHUNK_SIZE)
    }

    /// A fragmenter using smaller chunks; clamped to `1..=MAX_CHUNK_SIZE`.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            next_message_id: AtomicU16::new(0),
            chunk_size: chunk_size.clamp(1, MAX_CHUNK_SIZE),
        }
    }

    /// Start numbering messages at `id` instead of zero.
    pub fn starting_at(self, id: u16) -> Self {
        self.next_message_id.store(id, Ordering::Relaxed);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Packets needed for `len` payload bytes.
    pub fn packet_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Split `payload` into packets in transmission order.
    ///
    /// An empty payload yields no packets and consumes no message id.
    pub fn fragment(&self, payload: &[u8]) -> Result<Vec<Packet>, ProtocolError> {
        if payload.is_empty() {
            return Ok(Vec::new());
        }
        let total = u16::try_from(self.packet_count(payload.len())).map_err(|_| {
            ProtocolError::PayloadTooLarge {
                len: payload.len(),
                max: u16::MAX as usize,
            }
        })?;
        let message_id = self.next_message_id.fetch_add(1, Ordering::Relaxed);

        let packets = payload
            .chunks(self.chunk_size)
            .zip(0u16..)
            .map(|(chunk, sequence)| Packet {
                header: PacketHeader {
                    kind: PacketKind::for_position(sequence, total),
                    message_id,
                    sequence,
                    total: if sequence == 0 { total } else { 0 },
                },
                chunk: chunk.to_vec(),
            })
            .collect();
        tracing::trace!(message_id, total, len = payload.len(), "payload fragmented");
        Ok(packets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_count_is_ceiling() {
        let f = Fragmenter::new();
        assert_eq!(f.fragment(&[7u8; 1]).unwrap().len(), 1);
        assert_eq!(f.fragment(&[7u8; 200]).unwrap().len(), 1);
        assert_eq!(f.fragment(&[7u8; 201]).unwrap().len(), 2);
        assert_eq!(f.fragment(&[7u8; 950]).unwrap().len(), 5);
    }

    #[test]
    fn empty_payload_has_no_packets() {
        let f = Fragmenter::new();
        assert!(f.fragment(&[]).unwrap().is_empty());
        // The id was not consumed.
        assert_eq!(f.fragment(b"x").unwrap()[0].header.message_id, 0);
    }

    #[test]
    fn single_packet_is_start_with_total_one() {
        let packets = Fragmenter::new().fragment(b"hello").unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].header.kind, PacketKind::Start);
        assert_eq!(packets[0].header.total, 1);
        assert_eq!(packets[0].chunk, b"hello");
    }

    #[test]
    fn headers_describe_position() {
        let packets = Fragmenter::with_chunk_size(4).fragment(b"abcdefghij").unwrap();
        let kinds: Vec<PacketKind> = packets.iter().map(|p| p.header.kind).collect();
        assert_eq!(kinds, [PacketKind::Start, PacketKind::Middle, PacketKind::End]);
        let totals: Vec<u16> = packets.iter().map(|p| p.header.total).collect();
        assert_eq!(totals, [3, 0, 0]);
        assert_eq!(packets[2].chunk, b"ij");
    }

    #[test]
    fn message_ids_increase_and_wrap() {
        let f = Fragmenter::new().starting_at(u16::MAX);
        assert_eq!(f.fragment(b"a").unwrap()[0].header.message_id, u16::MAX);
        assert_eq!(f.fragment(b"b").unwrap()[0].header.message_id, 0);
        assert_eq!(f.fragment(b"c").unwrap()[0].header.message_id, 1);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let f = Fragmenter::with_chunk_size(1);
        let payload = vec![0u8; u16::MAX as usize + 1];
        assert_eq!(
            f.fragment(&payload),
            Err(ProtocolError::PayloadTooLarge { len: payload.len(), max: 65_535 })
        );
    }

    #[test]
    fn chunks_never_exceed_limit() {
        let f = Fragmenter::with_chunk_size(10_000);
        assert_eq!(f.chunk_size(), MAX_CHUNK_SIZE);
        let packets = f.fragment(&[1u8; 1000]).unwrap();
        assert!(packets.iter().all(|p| p.chunk.len() <= MAX_CHUNK_SIZE));
    }
}
