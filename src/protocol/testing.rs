//! Hand-written dialect used by unit tests, shaped like generated code.
//! Fields are declared largest-first so both profiles share one layout.

use std::any::Any;

use proptest::prelude::*;

use super::schema::MessageDef;
use super::{
    CodedInput, CodedOutput, Message, MessageBuilder, MessageDescriptor, ProtocolDescriptor,
    ProtocolProfile, Result,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Ping {
    pub stamp: u32,
    pub value: u16,
}

impl Ping {
    pub const ID: u8 = 0;
    pub const CRC_EXTRA: u8 = 50;

    pub fn new_builder() -> Box<dyn MessageBuilder> {
        Box::new(PingBuilder::default())
    }
}

impl Message for Ping {
    fn message_type(&self) -> u8 {
        Self::ID
    }

    fn write_to(&self, out: &mut CodedOutput<'_>) -> Result<()> {
        out.write_uint32(u64::from(self.stamp))?;
        out.write_uint16(u32::from(self.value))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Default)]
struct PingBuilder(Ping);

impl MessageBuilder for PingBuilder {
    fn read_from(&mut self, input: &mut CodedInput<'_>) -> Result<()> {
        self.0.stamp = input.read_uint32()?;
        self.0.value = input.read_uint16()?;
        Ok(())
    }

    fn build(self: Box<Self>) -> Box<dyn Message> {
        Box::new(self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Status {
    pub time_usec: u64,
    pub altitude: f64,
    pub offset: i64,
    pub roll: f32,
    pub flags: u32,
    pub lat: i32,
    pub load: u16,
    pub temperature: i16,
    pub mode: u8,
    pub trim: i8,
    pub tag: [char; 4],
}

impl Status {
    pub const ID: u8 = 42;

    pub fn def() -> MessageDef {
        MessageDef::new(Self::ID, "STATUS")
            .parse_field("time_usec", "uint64_t")
            .and_then(|m| m.parse_field("altitude", "double"))
            .and_then(|m| m.parse_field("offset", "int64_t"))
            .and_then(|m| m.parse_field("roll", "float"))
            .and_then(|m| m.parse_field("flags", "uint32_t"))
            .and_then(|m| m.parse_field("lat", "int32_t"))
            .and_then(|m| m.parse_field("load", "uint16_t"))
            .and_then(|m| m.parse_field("temperature", "int16_t"))
            .and_then(|m| m.parse_field("mode", "uint8_t"))
            .and_then(|m| m.parse_field("trim", "int8_t"))
            .and_then(|m| m.parse_field("tag", "char[4]"))
            .expect("valid status definition")
    }

    pub fn new_builder() -> Box<dyn MessageBuilder> {
        Box::new(StatusBuilder::default())
    }

    pub fn sample() -> Self {
        Self {
            time_usec: u64::MAX - 1,
            altitude: -12.25,
            offset: i64::MIN,
            roll: 0.5,
            flags: 0xDEAD_BEEF,
            lat: -473_977_420,
            load: 65_535,
            temperature: -40,
            mode: 0x81,
            trim: -128,
            tag: ['M', 'A', 'V', '\u{00E9}'],
        }
    }

    /// Field-complete values within declared ranges; NaN is excluded so
    /// `PartialEq` holds after a roundtrip
    pub fn strategy() -> impl Strategy<Value = Self> {
        (
            (any::<u64>(), -1.0e12f64..1.0e12, any::<i64>(), -1.0e6f32..1.0e6),
            (any::<u32>(), any::<i32>(), any::<u16>(), any::<i16>()),
            (any::<u8>(), any::<i8>(), prop::array::uniform4(any::<u8>())),
        )
            .prop_map(
                |((time_usec, altitude, offset, roll), (flags, lat, load, temperature), (mode, trim, tag))| Self {
                    time_usec,
                    altitude,
                    offset,
                    roll,
                    flags,
                    lat,
                    load,
                    temperature,
                    mode,
                    trim,
                    tag: tag.map(char::from),
                },
            )
    }
}

impl Message for Status {
    fn message_type(&self) -> u8 {
        Self::ID
    }

    fn write_to(&self, out: &mut CodedOutput<'_>) -> Result<()> {
        out.write_uint64(self.time_usec)?;
        out.write_double(self.altitude)?;
        out.write_int64(self.offset)?;
        out.write_float(self.roll)?;
        out.write_uint32(u64::from(self.flags))?;
        out.write_int32(self.lat)?;
        out.write_uint16(u32::from(self.load))?;
        out.write_int16(self.temperature)?;
        out.write_uint8(u32::from(self.mode))?;
        out.write_int8(self.trim)?;
        for c in self.tag {
            out.write_char(c)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Default)]
struct StatusBuilder(Status);

impl MessageBuilder for StatusBuilder {
    fn read_from(&mut self, input: &mut CodedInput<'_>) -> Result<()> {
        let m = &mut self.0;
        m.time_usec = input.read_uint64()?;
        m.altitude = input.read_double()?;
        m.offset = input.read_int64()?;
        m.roll = input.read_float()?;
        m.flags = input.read_uint32()?;
        m.lat = input.read_int32()?;
        m.load = input.read_uint16()?;
        m.temperature = input.read_int16()?;
        m.mode = input.read_uint8()?;
        m.trim = input.read_int8()?;
        for c in &mut m.tag {
            *c = input.read_char()?;
        }
        Ok(())
    }

    fn build(self: Box<Self>) -> Box<dyn Message> {
        Box::new(self.0)
    }
}

pub(crate) fn descriptor(profile: ProtocolProfile) -> ProtocolDescriptor {
    ProtocolDescriptor::builder(profile)
        .register(Ping::ID, MessageDescriptor::new(6, Ping::CRC_EXTRA, Ping::new_builder))
        .and_then(|b| b.register_def(&Status::def(), Status::new_builder))
        .expect("valid test dialect")
        .build()
}

pub(crate) fn expanded_descriptor() -> ProtocolDescriptor {
    descriptor(ProtocolProfile::v1_0_expanded())
}
