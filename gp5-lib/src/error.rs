use thiserror::Error;

/// The primary error type for the `gp5-lib` library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Gp5Error {
    #[error("Packet of {required} bytes does not fit the {capacity} byte transmit buffer")]
    CapacityExceeded { required: usize, capacity: usize },

    #[error("Payload of {0} bytes cannot be encoded in the nibble-split length field")]
    PayloadTooLong(usize),

    #[error("Checksum window holds {bytes} packed bytes, at most {max} are supported")]
    ChecksumWindowExceeded { bytes: usize, max: usize },

    #[error("No SysEx start byte found in buffer")]
    MessageNotFound,

    #[error("Insufficient data: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Invalid packet: {0}")]
    InvalidPacket(String),

    #[error("Checksum mismatch: packet carries {actual:#04x}, computed {expected:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}
