//! Inbound reassembly.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use crate::{Packet, PacketKind, REASSEMBLY_TIMEOUT};

/// A completed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reassembled {
    pub message_id: u16,
    pub payload: Vec<u8>,
}

/// An assembly abandoned at its deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expired {
    pub message_id: u16,
    /// Distinct packets received before the deadline.
    pub received: usize,
    /// Declared total, if the start packet arrived.
    pub total: Option<u16>,
}

#[derive(Debug)]
struct Assembly {
    total: Option<u16>,
    parts: BTreeMap<u16, Vec<u8>>,
    started: Instant,
}

impl Assembly {
    fn new(started: Instant) -> Self {
        Self {
            total: None,
            parts: BTreeMap::new(),
            started,
        }
    }

    fn is_complete(&self) -> bool {
        self.total
            .is_some_and(|total| self.parts.len() == usize::from(total))
    }
}

/// Groups packets by message id until every sequence number has arrived.
///
/// Time is passed in by the caller, so the deadline logic runs the same
/// under a real clock and under a paused test clock. The deadline counts
/// from the first packet of a message. A completed message id stays closed
/// for one deadline, so late duplicates of its packets are dropped instead
/// of opening an assembly that can only expire.
#[derive(Debug)]
pub struct Reassembler {
    timeout: Duration,
    assemblies: HashMap<u16, Assembly>,
    completed: HashMap<u16, Instant>,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(REASSEMBLY_TIMEOUT)
    }
}

impl Reassembler {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            assemblies: HashMap::new(),
            completed: HashMap::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Messages still waiting for packets.
    pub fn pending(&self) -> usize {
        self.assemblies.len()
    }

    /// Feed one raw packet. Undecodable packets are dropped.
    pub fn accept(&mut self, raw: &[u8], now: Instant) -> Option<Reassembled> {
        match Packet::decode(raw) {
            Ok(packet) => self.accept_packet(packet, now),
            Err(error) => {
                tracing::trace!(len = raw.len(), %error, "discarding radio packet");
                None
            }
        }
    }

    /// Feed one decoded packet.
    pub fn accept_packet(&mut self, packet: Packet, now: Instant) -> Option<Reassembled> {
        let header = packet.header;
        let id = header.message_id;

        if let Some(&finished) = self.completed.get(&id) {
            if now.saturating_duration_since(finished) < self.timeout {
                tracing::trace!(message_id = id, sequence = header.sequence, "late packet of a completed message");
                return None;
            }
            self.completed.remove(&id);
        }

        // A leftover assembly past its deadline must not absorb packets of a
        // new message that reuses the id after the counter wrapped.
        if self
            .assemblies
            .get(&id)
            .is_some_and(|a| self.is_expired(a, now))
        {
            self.assemblies.remove(&id);
        }

        let assembly = self.assemblies.entry(id).or_insert_with(|| Assembly::new(now));
        if header.kind == PacketKind::Start {
            assembly.total = Some(header.total);
            assembly.parts.retain(|sequence, _| *sequence < header.total);
        }
        if let Some(total) = assembly.total {
            if header.sequence >= total {
                tracing::trace!(message_id = id, sequence = header.sequence, total, "sequence beyond total");
                return None;
            }
        }
        assembly.parts.insert(header.sequence, packet.chunk);

        if !assembly.is_complete() {
            return None;
        }
        let assembly = self.assemblies.remove(&id)?;
        self.completed.insert(id, now);
        let payload = assembly.parts.into_values().flatten().collect();
        Some(Reassembled {
            message_id: id,
            payload,
        })
    }

    /// Drop and report every assembly whose deadline has passed.
    pub fn expire(&mut self, now: Instant) -> Vec<Expired> {
        let timeout = self.timeout;
        self.completed
            .retain(|_, finished| now.saturating_duration_since(*finished) < timeout);

        let expired_ids: Vec<u16> = self
            .assemblies
            .iter()
            .filter(|(_, a)| self.is_expired(a, now))
            .map(|(id, _)| *id)
            .collect();

        let mut expired: Vec<Expired> = expired_ids
            .into_iter()
            .filter_map(|id| {
                self.assemblies.remove(&id).map(|a| Expired {
                    message_id: id,
                    received: a.parts.len(),
                    total: a.total,
                })
            })
            .collect();
        expired.sort_by_key(|e| e.message_id);
        expired
    }

    /// The earliest moment an assembly will expire, if any is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.assemblies
            .values()
            .map(|a| a.started + self.timeout)
            .min()
    }

    fn is_expired(&self, assembly: &Assembly, now: Instant) -> bool {
        now.saturating_duration_since(assembly.started) >= self.timeout
    }
}
