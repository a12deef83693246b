//! Nullable radio: an in-memory packet queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use volt_network::{NetworkError, RadioTransport};

type Queue = Arc<Mutex<VecDeque<Vec<u8>>>>;

/// A radio that records what it sends and plays back queued packets.
///
/// Two radios made by [`NullRadio::pair`] hear each other: a packet sent on
/// one lands in the other's receive queue.
#[derive(Default)]
pub struct NullRadio {
    inbox: Queue,
    sent: Mutex<Vec<Vec<u8>>>,
    peer_inbox: Option<Queue>,
    fail_sends: AtomicBool,
}

impl NullRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two radios in range of each other.
    pub fn pair() -> (Self, Self) {
        let a_inbox = Queue::default();
        let b_inbox = Queue::default();
        let a = Self {
            inbox: Arc::clone(&a_inbox),
            peer_inbox: Some(Arc::clone(&b_inbox)),
            ..Self::default()
        };
        let b = Self {
            inbox: b_inbox,
            peer_inbox: Some(a_inbox),
            ..Self::default()
        };
        (a, b)
    }

    /// Queue a raw packet for the next `receive`.
    pub fn enqueue(&self, packet: Vec<u8>) {
        self.inbox.lock().push_back(packet);
    }

    /// Every packet passed to `send`, in order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }

    /// Packets still waiting to be received.
    pub fn queued(&self) -> usize {
        self.inbox.lock().len()
    }

    /// Make every following `send` fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::Relaxed);
    }
}

impl RadioTransport for NullRadio {
    fn send(&self, packet: &[u8]) -> Result<(), NetworkError> {
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err(NetworkError::Transport("null radio send failure".into()));
        }
        self.sent.lock().push(packet.to_vec());
        if let Some(peer) = &self.peer_inbox {
            peer.lock().push_back(packet.to_vec());
        }
        Ok(())
    }

    fn receive(&self) -> Result<Option<Vec<u8>>, NetworkError> {
        Ok(self.inbox.lock().pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_back_in_order() {
        let radio = NullRadio::new();
        radio.enqueue(vec![1]);
        radio.enqueue(vec![2]);
        assert_eq!(radio.receive().unwrap(), Some(vec![1]));
        assert_eq!(radio.receive().unwrap(), Some(vec![2]));
        assert_eq!(radio.receive().unwrap(), None);
    }

    #[test]
    fn paired_radios_hear_each_other() {
        let (a, b) = NullRadio::pair();
        a.send(b"ping").unwrap();
        assert_eq!(b.receive().unwrap(), Some(b"ping".to_vec()));
        assert_eq!(a.receive().unwrap(), None);
        assert_eq!(a.sent(), [b"ping".to_vec()]);
    }

    #[test]
    fn failing_send_records_nothing() {
        let radio = NullRadio::new();
        radio.fail_sends(true);
        assert!(radio.send(b"x").is_err());
        assert!(radio.sent().is_empty());
    }
}
