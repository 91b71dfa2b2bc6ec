//! MAVLink wire-protocol core
//!
//! This module provides frame encoding/decoding, checksums, the primitive
//! field codec and the message descriptor registry.

mod codec;
mod coded;
pub mod crc;
mod decoder;
mod descriptor;
mod encoder;
mod error;
mod message;
mod packet;
pub mod schema;
mod stats;

#[cfg(test)]
mod testing;

pub use codec::{decode, encode, encode_into};
pub use coded::{CodedInput, CodedOutput};
pub use crc::Crc16;
pub use decoder::Decoder;
pub use descriptor::{
    MessageDescriptor, ProtocolDescriptor, ProtocolDescriptorBuilder, ProtocolProfile,
    ProtocolVersion,
};
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use message::{BuilderFactory, Message, MessageBuilder};
pub use packet::Packet;
pub use stats::DecoderStats;

/// MAVLink 0.9 start byte
pub const STX_V0_9: u8 = 0x55;

/// MAVLink 1.0 start byte
pub const STX_V1_0: u8 = 0xFE;

/// Header size with an 8-bit system id (start byte included)
pub const HEADER_LENGTH: usize = 6;

/// Header size with a 32-bit system id (start byte included)
pub const EXPANDED_HEADER_LENGTH: usize = 9;

/// Checksum size in bytes
pub const CHECKSUM_LENGTH: usize = 2;

/// Largest payload a one-byte length field can describe
pub const MAX_PAYLOAD_LENGTH: usize = u8::MAX as usize;

/// Largest frame on any supported profile
pub const MAX_PACKET_LENGTH: usize = MAX_PAYLOAD_LENGTH + EXPANDED_HEADER_LENGTH + CHECKSUM_LENGTH;
