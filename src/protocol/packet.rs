//! MAVLink packet: routing header plus typed payload

use std::fmt;

use bytes::BytesMut;

use super::{CodedOutput, Message, ProtocolDescriptor, Result};

/// MAVLink packet
///
/// # Wire Format (v1.0)
///
/// ```text
/// +-----+-----+-----+-------+--------+-------+-----------+--------+--------+
/// | STX | LEN | SEQ | SYSID | COMPID | MSGID | PAYLOAD   | CRC lo | CRC hi |
/// | 1   | 1   | 1   | 1 (4) | 1      | 1     | LEN bytes | 1      | 1      |
/// +-----+-----+-----+-------+--------+-------+-----------+--------+--------+
/// ```
///
/// The system id occupies four bytes when the profile uses expanded system
/// ids. The checksum covers everything from `LEN` through the payload.
pub struct Packet {
    payload_length: u8,
    sequence_number: u8,
    system_id: u32,
    component_id: u8,
    message_type: u8,
    payload: Box<dyn Message>,
}

impl Packet {
    /// Create a packet for `payload`
    ///
    /// Message type and payload length come from the payload and the
    /// registry, so they always agree with what the encoder will emit.
    pub fn new(
        descriptor: &ProtocolDescriptor,
        system_id: u32,
        component_id: u8,
        payload: Box<dyn Message>,
    ) -> Result<Self> {
        let message_type = payload.message_type();
        let payload_length = descriptor.message_length(message_type)? as u8;
        Ok(Self {
            payload_length,
            sequence_number: 0,
            system_id,
            component_id,
            message_type,
            payload,
        })
    }

    pub(crate) fn from_parts(
        payload_length: u8,
        sequence_number: u8,
        system_id: u32,
        component_id: u8,
        payload: Box<dyn Message>,
    ) -> Self {
        Self {
            payload_length,
            sequence_number,
            system_id,
            component_id,
            message_type: payload.message_type(),
            payload,
        }
    }

    /// Set the sequence number
    #[must_use]
    pub fn with_sequence_number(mut self, sequence_number: u8) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    /// Set the sequence number in place
    pub fn set_sequence_number(&mut self, sequence_number: u8) {
        self.sequence_number = sequence_number;
    }

    /// Payload length in bytes
    #[must_use]
    pub const fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// Sequence number
    #[must_use]
    pub const fn sequence_number(&self) -> u8 {
        self.sequence_number
    }

    /// Sender system id
    #[must_use]
    pub const fn system_id(&self) -> u32 {
        self.system_id
    }

    /// Sender component id
    #[must_use]
    pub const fn component_id(&self) -> u8 {
        self.component_id
    }

    /// Message type id
    #[must_use]
    pub const fn message_type(&self) -> u8 {
        self.message_type
    }

    /// Payload message
    #[must_use]
    pub fn payload(&self) -> &dyn Message {
        self.payload.as_ref()
    }

    /// Payload as a concrete message type
    #[must_use]
    pub fn payload_as<T: Message>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Take ownership of the payload
    #[must_use]
    pub fn into_payload(self) -> Box<dyn Message> {
        self.payload
    }

    /// Payload serialized in little-endian field encoding, `None` if the
    /// message refuses to serialize
    fn payload_bytes(&self) -> Option<BytesMut> {
        let mut buf = BytesMut::with_capacity(usize::from(self.payload_length));
        self.payload
            .write_to(&mut CodedOutput::new(&mut buf, true))
            .ok()?;
        Some(buf)
    }
}

/// Packets are equal when their headers match and both payloads serialize
/// to the same bytes. A payload that fails to serialize equals nothing.
impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        if self.payload_length != other.payload_length
            || self.sequence_number != other.sequence_number
            || self.system_id != other.system_id
            || self.component_id != other.component_id
            || self.message_type != other.message_type
        {
            return false;
        }
        match (self.payload_bytes(), other.payload_bytes()) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "message {} seq {} from {}/{} ({} bytes): {:?}",
            self.message_type,
            self.sequence_number,
            self.system_id,
            self.component_id,
            self.payload_length,
            self.payload
        )
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("payload_length", &self.payload_length)
            .field("sequence_number", &self.sequence_number)
            .field("system_id", &self.system_id)
            .field("component_id", &self.component_id)
            .field("message_type", &self.message_type)
            .field("payload", &self.payload)
            .finish()
    }
}
