//! MAVLink wire-protocol error types

use thiserror::Error;

/// MAVLink protocol errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input ended before a primitive of the declared width could be read
    #[error("stream truncated: need {needed} bytes, got {got}")]
    StreamTruncated {
        /// Bytes required by the read
        needed: usize,
        /// Bytes still available
        got: usize,
    },

    /// Value does not fit the target wire width
    #[error("value {value:#x} can't be narrowed to {bits} bits without data loss")]
    NarrowingOverflow {
        /// Offending value
        value: u64,
        /// Target width in bits
        bits: u32,
    },

    /// Frame buffer too small for header or declared payload
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Declared payload length differs from the registered wire length
    #[error("payload length mismatch for message {message_type}: expected {expected}, got {found}")]
    LengthMismatch {
        /// Message type id
        message_type: u8,
        /// Registered wire length
        expected: usize,
        /// Length byte found in the frame
        found: usize,
    },

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:#06x}, got {found:#06x}")]
    ChecksumMismatch {
        /// Recomputed checksum
        expected: u16,
        /// Checksum carried by the frame
        found: u16,
    },

    /// Message type not present in the protocol descriptor
    #[error("unknown message type: {message_type}")]
    UnknownMessageType {
        /// Message type id
        message_type: u8,
    },

    /// A message wrote past its registered wire length
    #[error("payload overflow: write exceeds capacity of {capacity} bytes")]
    PayloadOverflow {
        /// Region capacity in bytes
        capacity: usize,
    },

    /// A message wrote fewer bytes than its registered wire length
    #[error("message {message_type} serialized {written} bytes, expected {expected}")]
    PayloadLengthMismatch {
        /// Message type id
        message_type: u8,
        /// Registered wire length
        expected: usize,
        /// Bytes actually written
        written: usize,
    },

    /// Malformed or unknown MAVLink field type declaration
    #[error("invalid field type: {0}")]
    InvalidFieldType(String),

    /// Registry construction rejected a descriptor
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// Protocol generation not supported
    #[error("unsupported MAVLink version: {0}")]
    UnsupportedVersion(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
