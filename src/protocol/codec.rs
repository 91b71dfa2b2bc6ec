//! MAVLink frame codec (encode/decode of single frames)

use bytes::{BufMut, Bytes, BytesMut};

use super::crc::Crc16;
use super::{
    CodedInput, CodedOutput, Error, MessageDescriptor, Packet, ProtocolDescriptor,
    ProtocolProfile, Result,
};

/// Encode a packet into a new buffer
///
/// # Format
///
/// ```text
/// [HEADER (6 or 9 bytes)] [PAYLOAD (wire length)] [CHECKSUM (2 bytes, LE)]
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The payload's message type is not registered
/// - The system id does not fit an 8-bit field on a narrow profile
/// - A payload field fails its narrowing check
/// - The payload serializes more or fewer bytes than its wire length
pub fn encode(descriptor: &ProtocolDescriptor, packet: &Packet) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    encode_into(descriptor, packet, &mut buf)?;
    Ok(buf.freeze())
}

/// Append an encoded packet to `dst`
///
/// On error `dst` is left exactly as it was.
pub fn encode_into(descriptor: &ProtocolDescriptor, packet: &Packet, dst: &mut BytesMut) -> Result<()> {
    let start = dst.len();
    let result = write_frame(descriptor, packet, dst);
    if result.is_err() {
        dst.truncate(start);
    }
    result
}

fn write_frame(descriptor: &ProtocolDescriptor, packet: &Packet, dst: &mut BytesMut) -> Result<()> {
    let profile = descriptor.profile();
    let payload = packet.payload();
    // length always follows the payload's own type, never the packet fields
    let message_type = payload.message_type();
    let entry = descriptor.message(message_type)?;
    let payload_length = usize::from(entry.wire_length());

    let start = dst.len();
    dst.reserve(profile.frame_length(payload_length));

    dst.put_u8(profile.stx());
    dst.put_u8(payload_length as u8);
    dst.put_u8(packet.sequence_number());
    {
        let mut header = CodedOutput::new(dst, profile.little_endian());
        if profile.expanded_system_id() {
            header.write_uint32(u64::from(packet.system_id()))?;
        } else {
            header.write_uint8(packet.system_id())?;
        }
    }
    dst.put_u8(packet.component_id());
    dst.put_u8(message_type);

    let written = {
        let mut body = CodedOutput::bounded(dst, payload_length, profile.little_endian());
        payload.write_to(&mut body)?;
        body.written()
    };
    if written != payload_length {
        return Err(Error::PayloadLengthMismatch {
            message_type,
            expected: payload_length,
            written,
        });
    }

    let checksum = frame_checksum(profile, entry, &dst[start + 1..]);
    dst.put_u16_le(checksum);
    Ok(())
}

/// Decode one pre-framed packet
///
/// `frame` must start with the start byte. Bytes past the end of the frame
/// are ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is shorter than the header or the declared frame
/// - The message type is not registered
/// - The length byte differs from the registered wire length
/// - The checksum doesn't match
/// - The payload fails to decode
pub fn decode(descriptor: &ProtocolDescriptor, frame: &[u8]) -> Result<Packet> {
    let profile = descriptor.profile();
    let header_length = profile.header_length();
    if frame.len() < header_length {
        return Err(Error::BufferTooSmall {
            needed: header_length,
            got: frame.len(),
        });
    }

    // skip stx
    let mut header = CodedInput::new(&frame[1..header_length], profile.little_endian());
    let payload_length = header.read_uint8()?;
    let sequence_number = header.read_uint8()?;
    let system_id = if profile.expanded_system_id() {
        header.read_uint32()?
    } else {
        u32::from(header.read_uint8()?)
    };
    let component_id = header.read_uint8()?;
    let message_type = header.read_uint8()?;

    let entry = descriptor.message(message_type)?;
    let expected_length = usize::from(entry.wire_length());
    if usize::from(payload_length) != expected_length {
        return Err(Error::LengthMismatch {
            message_type,
            expected: expected_length,
            found: usize::from(payload_length),
        });
    }

    let frame_length = profile.frame_length(expected_length);
    if frame.len() < frame_length {
        return Err(Error::BufferTooSmall {
            needed: frame_length,
            got: frame.len(),
        });
    }

    let crc_offset = header_length + expected_length;
    let found = u16::from_le_bytes([frame[crc_offset], frame[crc_offset + 1]]);
    let expected = frame_checksum(profile, entry, &frame[1..crc_offset]);
    if found != expected {
        return Err(Error::ChecksumMismatch { expected, found });
    }

    let mut builder = entry.new_builder();
    let mut input = CodedInput::new(&frame[header_length..crc_offset], profile.little_endian());
    builder.read_from(&mut input)?;
    let payload = builder.build();
    if payload.message_type() != message_type {
        return Err(Error::InvalidDescriptor(format!(
            "builder for message {message_type} produced message {}",
            payload.message_type()
        )));
    }

    Ok(Packet::from_parts(
        payload_length,
        sequence_number,
        system_id,
        component_id,
        payload,
    ))
}

/// Checksum over `covered` (header without stx, plus payload), then the
/// CRC-extra byte when the profile uses one
fn frame_checksum(profile: &ProtocolProfile, entry: &MessageDescriptor, covered: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update_bytes(covered);
    if profile.uses_extra_checksum_byte() {
        crc.update(entry.crc_extra());
    }
    crc.checksum()
}
