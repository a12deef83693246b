use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("packet too short: {len} bytes, header needs {min}")]
    TooShort { len: usize, min: usize },

    #[error("packet carries no chunk")]
    EmptyChunk,

    #[error("unknown packet kind: {0}")]
    UnknownKind(u8),

    #[error("start packet declares {total} packets for sequence {sequence}")]
    InvalidTotal { sequence: u16, total: u16 },

    #[error("payload of {len} bytes needs more than {max} packets")]
    PayloadTooLarge { len: usize, max: usize },
}
