use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("connection to {peer} failed: {reason}")]
    ConnectionFailed { peer: String, reason: String },

    #[error("checksum mismatch: expected {expected}, computed {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("message addressed to {destination}")]
    Misaddressed { destination: String },

    #[error("message of {size} bytes exceeds {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error("no complete message within {waited_ms}ms ({pending} partial)")]
    ReassemblyTimeout { waited_ms: u64, pending: usize },

    #[error("radio transport failure: {0}")]
    Transport(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] volt_protocol::ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
