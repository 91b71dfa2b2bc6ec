//! Minimal MAVLink 1.0 "common" subset, written the way the dialect
//! generator emits it: one message type plus one builder per definition,
//! fields in 1.0 wire order.
//!
//! Registering these on a 0.9 profile changes byte order only; the field
//! sequence stays size-sorted, unlike real 0.9 generated code.

#![allow(dead_code)]

use std::any::Any;

use mavwire::protocol::schema::MessageDef;
use mavwire::{
    CodedInput, CodedOutput, Message, MessageBuilder, ProtocolDescriptor, ProtocolProfile, Result,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heartbeat {
    pub custom_mode: u32,
    pub kind: u8,
    pub autopilot: u8,
    pub base_mode: u8,
    pub system_status: u8,
    pub mavlink_version: u8,
}

impl Heartbeat {
    pub const ID: u8 = 0;

    pub fn def() -> MessageDef {
        MessageDef::new(Self::ID, "HEARTBEAT")
            .parse_field("type", "uint8_t")
            .and_then(|m| m.parse_field("autopilot", "uint8_t"))
            .and_then(|m| m.parse_field("base_mode", "uint8_t"))
            .and_then(|m| m.parse_field("custom_mode", "uint32_t"))
            .and_then(|m| m.parse_field("system_status", "uint8_t"))
            .and_then(|m| m.parse_field("mavlink_version", "uint8_t_mavlink_version"))
            .expect("valid HEARTBEAT definition")
    }

    pub fn new_builder() -> Box<dyn MessageBuilder> {
        Box::new(HeartbeatBuilder::default())
    }
}

impl Message for Heartbeat {
    fn message_type(&self) -> u8 {
        Self::ID
    }

    fn write_to(&self, out: &mut CodedOutput<'_>) -> Result<()> {
        out.write_uint32(u64::from(self.custom_mode))?;
        out.write_uint8(u32::from(self.kind))?;
        out.write_uint8(u32::from(self.autopilot))?;
        out.write_uint8(u32::from(self.base_mode))?;
        out.write_uint8(u32::from(self.system_status))?;
        out.write_uint8(u32::from(self.mavlink_version))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Default)]
struct HeartbeatBuilder(Heartbeat);

impl MessageBuilder for HeartbeatBuilder {
    fn read_from(&mut self, input: &mut CodedInput<'_>) -> Result<()> {
        self.0.custom_mode = input.read_uint32()?;
        self.0.kind = input.read_uint8()?;
        self.0.autopilot = input.read_uint8()?;
        self.0.base_mode = input.read_uint8()?;
        self.0.system_status = input.read_uint8()?;
        self.0.mavlink_version = input.read_uint8()?;
        Ok(())
    }

    fn build(self: Box<Self>) -> Box<dyn Message> {
        Box::new(self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamValue {
    pub param_value: f32,
    pub param_count: u16,
    pub param_index: u16,
    pub param_id: String,
    pub param_type: u8,
}

impl ParamValue {
    pub const ID: u8 = 22;
    const PARAM_ID_LEN: usize = 16;

    pub fn def() -> MessageDef {
        MessageDef::new(Self::ID, "PARAM_VALUE")
            .parse_field("param_id", "char[16]")
            .and_then(|m| m.parse_field("param_value", "float"))
            .and_then(|m| m.parse_field("param_type", "uint8_t"))
            .and_then(|m| m.parse_field("param_count", "uint16_t"))
            .and_then(|m| m.parse_field("param_index", "uint16_t"))
            .expect("valid PARAM_VALUE definition")
    }

    pub fn new_builder() -> Box<dyn MessageBuilder> {
        Box::new(ParamValueBuilder::default())
    }
}

impl Message for ParamValue {
    fn message_type(&self) -> u8 {
        Self::ID
    }

    fn write_to(&self, out: &mut CodedOutput<'_>) -> Result<()> {
        out.write_float(self.param_value)?;
        out.write_uint16(u32::from(self.param_count))?;
        out.write_uint16(u32::from(self.param_index))?;
        // NUL-padded, no terminator when all 16 bytes are used
        let mut chars = self.param_id.chars();
        for _ in 0..Self::PARAM_ID_LEN {
            out.write_char(chars.next().unwrap_or('\0'))?;
        }
        out.write_uint8(u32::from(self.param_type))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Default)]
struct ParamValueBuilder(ParamValue);

impl MessageBuilder for ParamValueBuilder {
    fn read_from(&mut self, input: &mut CodedInput<'_>) -> Result<()> {
        self.0.param_value = input.read_float()?;
        self.0.param_count = input.read_uint16()?;
        self.0.param_index = input.read_uint16()?;
        let mut id = String::with_capacity(ParamValue::PARAM_ID_LEN);
        for _ in 0..ParamValue::PARAM_ID_LEN {
            id.push(input.read_char()?);
        }
        self.0.param_id = id.trim_end_matches('\0').to_string();
        self.0.param_type = input.read_uint8()?;
        Ok(())
    }

    fn build(self: Box<Self>) -> Box<dyn Message> {
        Box::new(self.0)
    }
}

pub fn common_dialect(profile: ProtocolProfile) -> ProtocolDescriptor {
    ProtocolDescriptor::builder(profile)
        .register_def(&Heartbeat::def(), Heartbeat::new_builder)
        .and_then(|b| b.register_def(&ParamValue::def(), ParamValue::new_builder))
        .expect("valid common dialect")
        .build()
}

pub fn heartbeat() -> Heartbeat {
    Heartbeat {
        custom_mode: 0,
        kind: 2,
        autopilot: 3,
        base_mode: 0x51,
        system_status: 4,
        mavlink_version: 3,
    }
}

pub fn param_value() -> ParamValue {
    ParamValue {
        param_value: 1.5,
        param_count: 300,
        param_index: 7,
        param_id: "SYSID_THISMAV".to_string(),
        param_type: 9,
    }
}

pub fn hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).expect("hex digit"))
        .collect()
}
