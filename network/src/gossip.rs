//! Checksummed ledger snapshots.
//!
//! Stream form: `payload ␠ checksum`. Radio form adds the addressee:
//! `payload ␠ checksum ␠ destination`. The payload is the canonical ledger
//! serialization and may itself contain spaces, so every field is found by
//! splitting at the last space.

use volt_crypto::{compute_checksum, verify_checksum, CHECKSUM_HEX_LEN};
use volt_ledger::{MergeReport, SharedTangle, Tangle};

use crate::NetworkError;

/// Radio destination that every node accepts.
pub const BROADCAST_DESTINATION: &str = "*";

const SEPARATOR: u8 = b' ';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GossipMessage {
    pub payload: Vec<u8>,
    pub checksum: String,
    /// Set on the radio form only.
    pub destination: Option<String>,
}

impl GossipMessage {
    /// Snapshot `tangle` and checksum it.
    pub fn publish(tangle: &Tangle) -> Self {
        Self::from_payload(tangle.serialize())
    }

    pub fn from_payload(payload: Vec<u8>) -> Self {
        let checksum = compute_checksum(&payload);
        Self {
            payload,
            checksum,
            destination: None,
        }
    }

    /// Address the message to one radio node, or to all with
    /// [`BROADCAST_DESTINATION`].
    pub fn addressed(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let extra = self.destination.as_ref().map_or(0, |d| d.len() + 1);
        let mut out = Vec::with_capacity(self.payload.len() + 1 + self.checksum.len() + extra);
        out.extend_from_slice(&self.payload);
        out.push(SEPARATOR);
        out.extend_from_slice(self.checksum.as_bytes());
        if let Some(destination) = &self.destination {
            out.push(SEPARATOR);
            out.extend_from_slice(destination.as_bytes());
        }
        out
    }

    /// Parse the stream form. The checksum is not verified here.
    pub fn decode(bytes: &[u8]) -> Result<Self, NetworkError> {
        let (payload, checksum) = split_last(bytes)?;
        if checksum.len() != CHECKSUM_HEX_LEN {
            return Err(NetworkError::Malformed(format!(
                "checksum is {} bytes, expected {CHECKSUM_HEX_LEN}",
                checksum.len()
            )));
        }
        let checksum = std::str::from_utf8(checksum)
            .map_err(|_| NetworkError::Malformed("checksum is not UTF-8".into()))?;
        Ok(Self {
            payload: payload.to_vec(),
            checksum: checksum.to_string(),
            destination: None,
        })
    }

    /// Parse the radio form, which ends with the destination node id.
    pub fn decode_addressed(bytes: &[u8]) -> Result<Self, NetworkError> {
        let (rest, destination) = split_last(bytes)?;
        let destination = std::str::from_utf8(destination)
            .map_err(|_| NetworkError::Malformed("destination is not UTF-8".into()))?;
        if destination.is_empty() {
            return Err(NetworkError::Malformed("empty destination".into()));
        }
        Ok(Self::decode(rest)?.addressed(destination))
    }

    /// Recompute the checksum over the payload bytes.
    pub fn verify(&self) -> Result<(), NetworkError> {
        if verify_checksum(&self.payload, &self.checksum) {
            Ok(())
        } else {
            Err(NetworkError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: compute_checksum(&self.payload),
            })
        }
    }

    /// Whether `node_id` should process this radio message. Stream messages
    /// carry no destination and are always accepted.
    pub fn is_for(&self, node_id: &str) -> bool {
        match &self.destination {
            None => true,
            Some(d) => d == node_id || d == BROADCAST_DESTINATION,
        }
    }

    /// Verify, then merge into the shared ledger. On a mismatch the ledger
    /// is left untouched.
    pub fn apply(&self, tangle: &SharedTangle) -> Result<MergeReport, NetworkError> {
        self.verify()?;
        Ok(tangle.merge_from_serialized(&self.payload))
    }
}

/// Decode, verify and merge one stream-form message.
pub fn receive(bytes: &[u8], tangle: &SharedTangle) -> Result<MergeReport, NetworkError> {
    GossipMessage::decode(bytes)?.apply(tangle)
}

fn split_last(bytes: &[u8]) -> Result<(&[u8], &[u8]), NetworkError> {
    let at = bytes
        .iter()
        .rposition(|&b| b == SEPARATOR)
        .ok_or_else(|| NetworkError::Malformed("missing separator".into()))?;
    Ok((&bytes[..at], &bytes[at + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Vec<u8> {
        b"tx0,2025-03-11T12:00:00Z,node A,node_B,5,kWh,0.12,USD,1,Pending,[],[]\n".to_vec()
    }

    #[test]
    fn stream_form_is_payload_space_checksum() {
        let message = GossipMessage::from_payload(payload());
        let wire = message.encode();
        assert_eq!(&wire[..payload().len()], payload().as_slice());
        assert_eq!(wire[payload().len()], b' ');
        assert_eq!(&wire[payload().len() + 1..], compute_checksum(&payload()).as_bytes());
    }

    #[test]
    fn decode_splits_at_last_space() {
        let message = GossipMessage::from_payload(payload());
        let decoded = GossipMessage::decode(&message.encode()).unwrap();
        assert_eq!(decoded, message);
        assert!(decoded.verify().is_ok());
    }

    #[test]
    fn radio_form_carries_destination() {
        let message = GossipMessage::from_payload(payload()).addressed("node_B");
        let wire = message.encode();
        assert!(wire.ends_with(b" node_B"));
        let decoded = GossipMessage::decode_addressed(&wire).unwrap();
        assert_eq!(decoded.destination.as_deref(), Some("node_B"));
        assert!(decoded.verify().is_ok());
        assert!(decoded.is_for("node_B"));
        assert!(!decoded.is_for("node_C"));
    }

    #[test]
    fn broadcast_destination_reaches_everyone() {
        let message = GossipMessage::from_payload(payload()).addressed(BROADCAST_DESTINATION);
        assert!(message.is_for("anyone"));
    }

    #[test]
    fn empty_ledger_still_has_checksum() {
        let message = GossipMessage::publish(&Tangle::new());
        let decoded = GossipMessage::decode(&message.encode()).unwrap();
        assert!(decoded.payload.is_empty());
        assert!(decoded.verify().is_ok());
    }

    #[test]
    fn missing_separator_is_malformed() {
        assert!(matches!(
            GossipMessage::decode(b"nospacehere"),
            Err(NetworkError::Malformed(_))
        ));
        assert!(matches!(
            GossipMessage::decode(b"payload deadbeef"),
            Err(NetworkError::Malformed(_))
        ));
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let mut message = GossipMessage::from_payload(payload());
        message.payload[3] ^= 0x01;
        assert!(matches!(
            message.verify(),
            Err(NetworkError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn mismatch_leaves_ledger_untouched() {
        let tangle = SharedTangle::default();
        let mut wire = GossipMessage::from_payload(payload()).encode();
        wire[0] = b'X';
        assert!(receive(&wire, &tangle).is_err());
        assert!(tangle.is_empty());
    }
}
