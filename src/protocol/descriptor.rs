//! Protocol profiles and the message descriptor registry

use std::fmt;
use std::str::FromStr;

use super::schema::MessageDef;
use super::{
    BuilderFactory, CHECKSUM_LENGTH, EXPANDED_HEADER_LENGTH, Error, HEADER_LENGTH,
    MAX_PAYLOAD_LENGTH, MessageBuilder, Result, STX_V0_9, STX_V1_0,
};

/// MAVLink protocol generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolVersion {
    /// MAVLink 0.9: big-endian fields, declared field order, no CRC-extra
    #[cfg_attr(feature = "serde", serde(rename = "0.9"))]
    V0_9,
    /// MAVLink 1.0: little-endian fields, size-sorted field order, CRC-extra
    #[cfg_attr(feature = "serde", serde(rename = "1.0"))]
    V1_0,
}

impl ProtocolVersion {
    /// Version string as used in dialect schemas
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V0_9 => "0.9",
            Self::V1_0 => "1.0",
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0.9" => Ok(Self::V0_9),
            "1.0" => Ok(Self::V1_0),
            other => Err(Error::UnsupportedVersion(other.to_string())),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire constants of one protocol generation
///
/// Every flag is derived from the version; only the system id width is a
/// deployment choice, and only on 1.0. A 32-bit system id is a local
/// extension, not upstream MAVLink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "ProfileConfig", into = "ProfileConfig")
)]
pub struct ProtocolProfile {
    version: ProtocolVersion,
    expanded_system_id: bool,
}

impl ProtocolProfile {
    /// Profile for `version`
    ///
    /// # Errors
    ///
    /// `UnsupportedVersion` when a 32-bit system id is requested on 0.9,
    /// whose header always carries a single system id byte.
    pub fn new(version: ProtocolVersion, expanded_system_id: bool) -> Result<Self> {
        if expanded_system_id && version == ProtocolVersion::V0_9 {
            return Err(Error::UnsupportedVersion(format!(
                "{version} with expanded system id"
            )));
        }
        Ok(Self {
            version,
            expanded_system_id,
        })
    }

    /// MAVLink 0.9 with an 8-bit system id
    #[must_use]
    pub const fn v0_9() -> Self {
        Self {
            version: ProtocolVersion::V0_9,
            expanded_system_id: false,
        }
    }

    /// MAVLink 1.0 with an 8-bit system id
    #[must_use]
    pub const fn v1_0() -> Self {
        Self {
            version: ProtocolVersion::V1_0,
            expanded_system_id: false,
        }
    }

    /// MAVLink 1.0 with a 32-bit system id
    #[must_use]
    pub const fn v1_0_expanded() -> Self {
        Self {
            version: ProtocolVersion::V1_0,
            expanded_system_id: true,
        }
    }

    /// Protocol generation
    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Frame start byte
    #[must_use]
    pub const fn stx(&self) -> u8 {
        match self.version {
            ProtocolVersion::V0_9 => STX_V0_9,
            ProtocolVersion::V1_0 => STX_V1_0,
        }
    }

    /// Whether multi-byte fields are little-endian
    #[must_use]
    pub const fn little_endian(&self) -> bool {
        matches!(self.version, ProtocolVersion::V1_0)
    }

    /// Whether the per-message CRC-extra byte is folded into the checksum
    #[must_use]
    pub const fn uses_extra_checksum_byte(&self) -> bool {
        matches!(self.version, ProtocolVersion::V1_0)
    }

    /// Whether payload fields are sorted by element size on the wire
    #[must_use]
    pub const fn fields_reordering(&self) -> bool {
        matches!(self.version, ProtocolVersion::V1_0)
    }

    /// Whether the system id is 32 bits wide
    #[must_use]
    pub const fn expanded_system_id(&self) -> bool {
        self.expanded_system_id
    }

    /// Header length including the start byte
    #[must_use]
    pub const fn header_length(&self) -> usize {
        if self.expanded_system_id {
            EXPANDED_HEADER_LENGTH
        } else {
            HEADER_LENGTH
        }
    }

    /// Trailing checksum length
    #[must_use]
    pub const fn checksum_length(&self) -> usize {
        CHECKSUM_LENGTH
    }

    /// Full frame length for a payload of `payload_length` bytes
    #[must_use]
    pub const fn frame_length(&self, payload_length: usize) -> usize {
        self.header_length() + payload_length + CHECKSUM_LENGTH
    }
}

impl Default for ProtocolProfile {
    fn default() -> Self {
        Self::v1_0()
    }
}

impl fmt::Display for ProtocolProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAVLink {}", self.version)?;
        if self.expanded_system_id {
            f.write_str(" (32-bit system id)")?;
        }
        Ok(())
    }
}

/// Serialized form of a profile: only the free parameters
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct ProfileConfig {
    version: ProtocolVersion,
    #[serde(default)]
    expanded_system_id: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<ProfileConfig> for ProtocolProfile {
    type Error = Error;

    fn try_from(config: ProfileConfig) -> Result<Self> {
        Self::new(config.version, config.expanded_system_id)
    }
}

#[cfg(feature = "serde")]
impl From<ProtocolProfile> for ProfileConfig {
    fn from(profile: ProtocolProfile) -> Self {
        Self {
            version: profile.version,
            expanded_system_id: profile.expanded_system_id,
        }
    }
}

/// Registry entry for one message type
#[derive(Clone, Copy)]
pub struct MessageDescriptor {
    wire_length: u16,
    crc_extra: u8,
    new_builder: BuilderFactory,
}

impl MessageDescriptor {
    /// Create a descriptor from precomputed schema values
    #[must_use]
    pub const fn new(wire_length: u16, crc_extra: u8, new_builder: BuilderFactory) -> Self {
        Self {
            wire_length,
            crc_extra,
            new_builder,
        }
    }

    /// Derive a descriptor from a message definition
    pub fn from_def(def: &MessageDef, reorder: bool, new_builder: BuilderFactory) -> Result<Self> {
        def.validate()?;
        let wire_length = u16::try_from(def.wire_length())
            .map_err(|_| Error::InvalidDescriptor(format!("message {} too long", def.name())))?;
        Ok(Self::new(wire_length, def.crc_extra(reorder), new_builder))
    }

    /// Exact payload length on the wire
    #[must_use]
    pub const fn wire_length(&self) -> u16 {
        self.wire_length
    }

    /// CRC-extra byte
    #[must_use]
    pub const fn crc_extra(&self) -> u8 {
        self.crc_extra
    }

    /// Fresh builder for this message type
    #[must_use]
    pub fn new_builder(&self) -> Box<dyn MessageBuilder> {
        (self.new_builder)()
    }
}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("wire_length", &self.wire_length)
            .field("crc_extra", &self.crc_extra)
            .finish_non_exhaustive()
    }
}

/// Immutable registry of message types for one protocol profile
///
/// Built once at startup and shared (typically behind an `Arc`) by every
/// encoder and decoder on that profile.
#[derive(Debug, Clone)]
pub struct ProtocolDescriptor {
    profile: ProtocolProfile,
    messages: Box<[Option<MessageDescriptor>]>,
}

impl ProtocolDescriptor {
    /// Start building a registry for `profile`
    #[must_use]
    pub fn builder(profile: ProtocolProfile) -> ProtocolDescriptorBuilder {
        ProtocolDescriptorBuilder {
            profile,
            messages: vec![None; 256],
        }
    }

    /// Profile constants
    #[must_use]
    pub const fn profile(&self) -> &ProtocolProfile {
        &self.profile
    }

    /// Frame start byte
    #[must_use]
    pub const fn stx(&self) -> u8 {
        self.profile.stx()
    }

    /// Whether multi-byte fields are little-endian
    #[must_use]
    pub const fn little_endian(&self) -> bool {
        self.profile.little_endian()
    }

    /// Whether the CRC-extra byte is folded into the checksum
    #[must_use]
    pub const fn uses_extra_checksum_byte(&self) -> bool {
        self.profile.uses_extra_checksum_byte()
    }

    /// Whether the system id is 32 bits wide
    #[must_use]
    pub const fn expanded_system_id(&self) -> bool {
        self.profile.expanded_system_id()
    }

    /// Descriptor for `message_type`
    pub fn message(&self, message_type: u8) -> Result<&MessageDescriptor> {
        self.messages[usize::from(message_type)]
            .as_ref()
            .ok_or(Error::UnknownMessageType { message_type })
    }

    /// Whether `message_type` is registered
    #[must_use]
    pub fn contains(&self, message_type: u8) -> bool {
        self.messages[usize::from(message_type)].is_some()
    }

    /// Payload length of `message_type`
    pub fn message_length(&self, message_type: u8) -> Result<u16> {
        self.message(message_type).map(MessageDescriptor::wire_length)
    }

    /// CRC-extra byte of `message_type`
    pub fn message_crc_extra(&self, message_type: u8) -> Result<u8> {
        self.message(message_type).map(MessageDescriptor::crc_extra)
    }

    /// Fresh builder for `message_type`
    pub fn new_builder(&self, message_type: u8) -> Result<Box<dyn MessageBuilder>> {
        self.message(message_type).map(MessageDescriptor::new_builder)
    }

    /// Registered message type ids in ascending order
    pub fn message_types(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(|&id| self.contains(id))
    }
}

/// Builder for [`ProtocolDescriptor`]
#[derive(Debug)]
pub struct ProtocolDescriptorBuilder {
    profile: ProtocolProfile,
    messages: Vec<Option<MessageDescriptor>>,
}

impl ProtocolDescriptorBuilder {
    /// Register `descriptor` under `message_type`
    pub fn register(mut self, message_type: u8, descriptor: MessageDescriptor) -> Result<Self> {
        if usize::from(descriptor.wire_length()) > MAX_PAYLOAD_LENGTH {
            return Err(Error::InvalidDescriptor(format!(
                "message {message_type} wire length {} exceeds {MAX_PAYLOAD_LENGTH}",
                descriptor.wire_length()
            )));
        }
        let slot = &mut self.messages[usize::from(message_type)];
        if slot.is_some() {
            return Err(Error::InvalidDescriptor(format!(
                "message {message_type} registered twice"
            )));
        }
        *slot = Some(descriptor);
        Ok(self)
    }

    /// Register a message from its definition, deriving length and CRC-extra
    pub fn register_def(self, def: &MessageDef, new_builder: BuilderFactory) -> Result<Self> {
        let descriptor =
            MessageDescriptor::from_def(def, self.profile.fields_reordering(), new_builder)?;
        self.register(def.id(), descriptor)
    }

    /// Finish the registry
    #[must_use]
    pub fn build(self) -> ProtocolDescriptor {
        ProtocolDescriptor {
            profile: self.profile,
            messages: self.messages.into_boxed_slice(),
        }
    }
}
