//! Message definition model
//!
//! Field types and message definitions as they appear in MAVLink dialect
//! schemas. This is the data the external code generator works from; the
//! runtime uses it to derive wire lengths, wire field order and CRC-extra
//! bytes so that hand-written or generated descriptors can be checked against
//! the schema.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use super::crc::{Crc16, fold_crc_extra};
use super::{Error, MAX_PAYLOAD_LENGTH, Result};

/// Scalar element type of a message field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `float`
    Float,
    /// `double`
    Double,
    /// `char`
    Char,
    /// `int8_t`
    Int8,
    /// `uint8_t`
    Uint8,
    /// `int16_t`
    Int16,
    /// `uint16_t`
    Uint16,
    /// `int32_t`
    Int32,
    /// `uint32_t`
    Uint32,
    /// `int64_t`
    Int64,
    /// `uint64_t`
    Uint64,
}

impl ElementType {
    /// Size of one element on the wire
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Char | Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Float | Self::Int32 | Self::Uint32 => 4,
            Self::Double | Self::Int64 | Self::Uint64 => 8,
        }
    }

    /// Schema spelling, as hashed into the CRC-extra byte
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::Int8 => "int8_t",
            Self::Uint8 => "uint8_t",
            Self::Int16 => "int16_t",
            Self::Uint16 => "uint16_t",
            Self::Int32 => "int32_t",
            Self::Uint32 => "uint32_t",
            Self::Int64 => "int64_t",
            Self::Uint64 => "uint64_t",
        }
    }

    /// Parse a schema element name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "char" => Some(Self::Char),
            "int8_t" => Some(Self::Int8),
            // the version marker is an ordinary byte on the wire
            "uint8_t" | "uint8_t_mavlink_version" => Some(Self::Uint8),
            "int16_t" => Some(Self::Int16),
            "uint16_t" => Some(Self::Uint16),
            "int32_t" => Some(Self::Int32),
            "uint32_t" => Some(Self::Uint32),
            "int64_t" => Some(Self::Int64),
            "uint64_t" => Some(Self::Uint64),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field type: a scalar element or a fixed-length array of elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
    element: ElementType,
    array_length: Option<u8>,
}

impl FieldType {
    /// Scalar field
    #[must_use]
    pub const fn scalar(element: ElementType) -> Self {
        Self {
            element,
            array_length: None,
        }
    }

    /// Array field of `length` elements
    pub fn array(element: ElementType, length: u8) -> Result<Self> {
        if length == 0 {
            return Err(Error::InvalidFieldType(format!("{element}[0]")));
        }
        Ok(Self {
            element,
            array_length: Some(length),
        })
    }

    /// Element type
    #[must_use]
    pub const fn element(&self) -> ElementType {
        self.element
    }

    /// Array length, `None` for scalars
    #[must_use]
    pub const fn array_length(&self) -> Option<u8> {
        self.array_length
    }

    /// Whether this is an array field
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.array_length.is_some()
    }

    /// Size of one element on the wire
    #[must_use]
    pub const fn element_size(&self) -> usize {
        self.element.size()
    }

    /// Total wire size of the field
    #[must_use]
    pub const fn wire_length(&self) -> usize {
        match self.array_length {
            Some(length) => self.element.size() * length as usize,
            None => self.element.size(),
        }
    }
}

impl FromStr for FieldType {
    type Err = Error;

    /// Parse `uint16_t`, `float[4]`, `char[16]` or `array[N]`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidFieldType(s.to_string());

        let (element_name, array_length) = match s.find('[') {
            Some(open) => {
                let close = s[open..].find(']').ok_or_else(invalid)? + open;
                let length: u8 = s[open + 1..close].trim().parse().map_err(|_| invalid())?;
                (&s[..open], Some(length))
            }
            None => (s, None),
        };

        let element = match (element_name, array_length) {
            ("array", Some(_)) => ElementType::Int8,
            ("array", None) => return Err(invalid()),
            (name, _) => ElementType::from_name(name).ok_or_else(invalid)?,
        };

        match array_length {
            Some(length) => Self::array(element, length).map_err(|_| invalid()),
            None => Ok(Self::scalar(element)),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.array_length {
            Some(length) => write!(f, "{}[{length}]", self.element),
            None => write!(f, "{}", self.element),
        }
    }
}

/// Named message field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    ty: FieldType,
}

impl FieldDef {
    /// Create a field
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field type
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.ty
    }
}

/// Message definition in declared field order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDef {
    id: u8,
    name: String,
    fields: Vec<FieldDef>,
}

impl MessageDef {
    /// Create an empty definition
    pub fn new(id: u8, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef::new(name, ty));
        self
    }

    /// Append a field given its schema type string
    pub fn parse_field(self, name: impl Into<String>, ty: &str) -> Result<Self> {
        Ok(self.field(name, ty.parse()?))
    }

    /// Message type id
    #[must_use]
    pub const fn id(&self) -> u8 {
        self.id
    }

    /// Message name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declared order
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Payload length on the wire
    #[must_use]
    pub fn wire_length(&self) -> usize {
        self.fields.iter().map(|f| f.ty.wire_length()).sum()
    }

    /// Fields in wire order
    ///
    /// With `reorder` set (v1.0), fields are stably sorted by element size,
    /// largest first. Otherwise declared order is kept.
    #[must_use]
    pub fn wire_order(&self, reorder: bool) -> Vec<&FieldDef> {
        let mut fields: Vec<&FieldDef> = self.fields.iter().collect();
        if reorder {
            fields.sort_by_key(|field| Reverse(field.ty.element_size()));
        }
        fields
    }

    /// CRC-extra byte
    ///
    /// CRC-16 over `"<name> "` followed by `"<element> <field> "` per field in
    /// wire order, plus the array length byte for array fields, folded to one
    /// byte.
    #[must_use]
    pub fn crc_extra(&self, reorder: bool) -> u8 {
        let mut crc = Crc16::new();
        crc.update_bytes(self.name.as_bytes());
        crc.update(b' ');
        for field in self.wire_order(reorder) {
            crc.update_bytes(field.ty.element.name().as_bytes());
            crc.update(b' ');
            crc.update_bytes(field.name.as_bytes());
            crc.update(b' ');
            if let Some(length) = field.ty.array_length {
                crc.update(length);
            }
        }
        fold_crc_extra(crc.checksum())
    }

    /// Check the definition fits a single frame
    pub fn validate(&self) -> Result<()> {
        let length = self.wire_length();
        if length > MAX_PAYLOAD_LENGTH {
            return Err(Error::InvalidDescriptor(format!(
                "message {} ({}) is {length} bytes, max {MAX_PAYLOAD_LENGTH}",
                self.name, self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heartbeat() -> MessageDef {
        MessageDef::new(0, "HEARTBEAT")
            .parse_field("type", "uint8_t")
            .and_then(|m| m.parse_field("autopilot", "uint8_t"))
            .and_then(|m| m.parse_field("base_mode", "uint8_t"))
            .and_then(|m| m.parse_field("custom_mode", "uint32_t"))
            .and_then(|m| m.parse_field("system_status", "uint8_t"))
            .and_then(|m| m.parse_field("mavlink_version", "uint8_t_mavlink_version"))
            .unwrap()
    }

    #[test]
    fn test_parse_field_types() {
        let t: FieldType = "uint16_t".parse().unwrap();
        assert_eq!(t.element(), ElementType::Uint16);
        assert_eq!(t.wire_length(), 2);
        assert!(!t.is_array());

        let t: FieldType = "float[4]".parse().unwrap();
        assert_eq!(t.element(), ElementType::Float);
        assert_eq!(t.array_length(), Some(4));
        assert_eq!(t.wire_length(), 16);

        let t: FieldType = "array[3]".parse().unwrap();
        assert_eq!(t.element(), ElementType::Int8);
        assert_eq!(t.wire_length(), 3);

        assert_eq!(t.to_string(), "int8_t[3]");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["uint128_t", "float[", "char[x]", "array", "int8_t[0]", "int8_t[300]"] {
            assert!(
                matches!(bad.parse::<FieldType>(), Err(Error::InvalidFieldType(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_heartbeat_wire_layout() {
        let def = heartbeat();
        assert_eq!(def.wire_length(), 9);

        let order: Vec<&str> = def.wire_order(true).iter().map(|f| f.name()).collect();
        assert_eq!(
            order,
            ["custom_mode", "type", "autopilot", "base_mode", "system_status", "mavlink_version"]
        );

        let declared: Vec<&str> = def.wire_order(false).iter().map(|f| f.name()).collect();
        assert_eq!(declared[3], "custom_mode");
    }

    #[test]
    fn test_crc_extra_matches_upstream() {
        assert_eq!(heartbeat().crc_extra(true), 50);

        let param_value = MessageDef::new(22, "PARAM_VALUE")
            .parse_field("param_id", "char[16]")
            .and_then(|m| m.parse_field("param_value", "float"))
            .and_then(|m| m.parse_field("param_type", "uint8_t"))
            .and_then(|m| m.parse_field("param_count", "uint16_t"))
            .and_then(|m| m.parse_field("param_index", "uint16_t"))
            .unwrap();
        assert_eq!(param_value.wire_length(), 25);
        assert_eq!(param_value.crc_extra(true), 220);
    }

    #[test]
    fn test_oversized_definition_rejected() {
        let def = MessageDef::new(1, "HUGE")
            .parse_field("a", "double[32]")
            .unwrap();
        assert_eq!(def.wire_length(), 256);
        assert!(matches!(def.validate(), Err(Error::InvalidDescriptor(_))));
    }
}
