//! mavwire - MAVLink wire-protocol engine
//!
//! This library implements the runtime half of MAVLink v0.9 and v1.0: stream
//! framing and resynchronization, CRC validation, per-message-type dispatch
//! and endian-aware field (de)serialization. Concrete message types come from
//! a dialect generated elsewhere and plug in through the [`Message`] and
//! [`MessageBuilder`] traits and a [`ProtocolDescriptor`] registry.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mavwire::{Decoder, Encoder, Packet, ProtocolDescriptor, ProtocolProfile};
//! # fn dialect(b: mavwire::ProtocolDescriptorBuilder) -> mavwire::Result<mavwire::ProtocolDescriptorBuilder> { Ok(b) }
//! # fn heartbeat() -> Box<dyn mavwire::Message> { unimplemented!() }
//!
//! // Register the generated dialect once
//! let descriptor = Arc::new(dialect(ProtocolDescriptor::builder(ProtocolProfile::v1_0()))?.build());
//!
//! // Encode
//! let encoder = Encoder::new(Arc::clone(&descriptor));
//! let packet = Packet::new(&descriptor, 1, 1, heartbeat())?;
//! let bytes = encoder.encode(&packet)?;
//!
//! // Decode a byte stream, chunk by chunk
//! let mut decoder = Decoder::new(descriptor);
//! for packet in decoder.decode(&bytes) {
//!     println!("{packet:?}");
//! }
//! # Ok::<(), mavwire::Error>(())
//! ```
//!
//! # Features
//!
//! - **Stream recovery** - frames are found by start byte and length alone
//! - **Two generations** - v0.9 (big-endian) and v1.0 (little-endian, CRC-extra)
//! - **Narrowing-safe writes** - out-of-range values fail instead of truncating
//! - **Optional `serde`** - profiles and decoder stats as configuration/telemetry

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]

pub mod protocol;

pub use protocol::{
    CodedInput, CodedOutput, Crc16, Decoder, DecoderStats, Encoder, Error, MAX_PACKET_LENGTH,
    MAX_PAYLOAD_LENGTH, Message, MessageBuilder, MessageDescriptor, Packet, ProtocolDescriptor,
    ProtocolDescriptorBuilder, ProtocolProfile, ProtocolVersion, Result,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
