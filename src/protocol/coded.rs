//! Endian-aware primitive codec for message fields
//!
//! Generated message builders read their fields through [`CodedInput`] and
//! messages serialize themselves through [`CodedOutput`]. Byte order is fixed
//! at construction from the protocol profile.
//!
//! `uint64` fields are carried as native `u64` end to end; values above
//! `i64::MAX` keep their bit pattern and are never reinterpreted as signed.

use bytes::{Buf, BufMut, BytesMut};

use super::{Error, Result};

/// Field reader over a payload slice
#[derive(Debug)]
pub struct CodedInput<'a> {
    buf: &'a [u8],
    little_endian: bool,
}

impl<'a> CodedInput<'a> {
    /// Create a reader over `buf`
    #[must_use]
    pub const fn new(buf: &'a [u8], little_endian: bool) -> Self {
        Self { buf, little_endian }
    }

    /// Bytes not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Whether multi-byte fields are little-endian
    #[must_use]
    pub const fn is_little_endian(&self) -> bool {
        self.little_endian
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let got = self.buf.remaining();
        if got < needed {
            return Err(Error::StreamTruncated { needed, got });
        }
        Ok(())
    }

    /// Read `int8_t`
    pub fn read_int8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.buf.get_i8())
    }

    /// Read `uint8_t`
    pub fn read_uint8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// Read `char` (one byte, Latin-1)
    pub fn read_char(&mut self) -> Result<char> {
        self.read_uint8().map(char::from)
    }

    /// Read `int16_t`
    pub fn read_int16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(if self.little_endian {
            self.buf.get_i16_le()
        } else {
            self.buf.get_i16()
        })
    }

    /// Read `uint16_t`
    pub fn read_uint16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(if self.little_endian {
            self.buf.get_u16_le()
        } else {
            self.buf.get_u16()
        })
    }

    /// Read `int32_t`
    pub fn read_int32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(if self.little_endian {
            self.buf.get_i32_le()
        } else {
            self.buf.get_i32()
        })
    }

    /// Read `uint32_t`
    pub fn read_uint32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(if self.little_endian {
            self.buf.get_u32_le()
        } else {
            self.buf.get_u32()
        })
    }

    /// Read `int64_t`
    pub fn read_int64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(if self.little_endian {
            self.buf.get_i64_le()
        } else {
            self.buf.get_i64()
        })
    }

    /// Read `uint64_t`
    pub fn read_uint64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(if self.little_endian {
            self.buf.get_u64_le()
        } else {
            self.buf.get_u64()
        })
    }

    /// Read `float` from its raw IEEE-754 bits
    pub fn read_float(&mut self) -> Result<f32> {
        self.read_uint32().map(f32::from_bits)
    }

    /// Read `double` from its raw IEEE-754 bits
    pub fn read_double(&mut self) -> Result<f64> {
        self.read_uint64().map(f64::from_bits)
    }
}

/// Field writer appending to a [`BytesMut`]
///
/// A bounded writer refuses to grow its region past `capacity` bytes, which
/// keeps a message from spilling into the checksum area of a frame.
#[derive(Debug)]
pub struct CodedOutput<'a> {
    buf: &'a mut BytesMut,
    start: usize,
    capacity: usize,
    little_endian: bool,
}

impl<'a> CodedOutput<'a> {
    /// Create an unbounded writer
    pub fn new(buf: &'a mut BytesMut, little_endian: bool) -> Self {
        Self::bounded(buf, usize::MAX, little_endian)
    }

    /// Create a writer limited to `capacity` bytes past the current end of `buf`
    pub fn bounded(buf: &'a mut BytesMut, capacity: usize, little_endian: bool) -> Self {
        let start = buf.len();
        Self {
            buf,
            start,
            capacity,
            little_endian,
        }
    }

    /// Bytes written through this writer
    #[must_use]
    pub fn written(&self) -> usize {
        self.buf.len() - self.start
    }

    /// Whether multi-byte fields are little-endian
    #[must_use]
    pub const fn is_little_endian(&self) -> bool {
        self.little_endian
    }

    fn reserve(&mut self, len: usize) -> Result<()> {
        if self.capacity - self.written() < len {
            return Err(Error::PayloadOverflow {
                capacity: self.capacity,
            });
        }
        self.buf.reserve(len);
        Ok(())
    }

    /// Write `int8_t`
    pub fn write_int8(&mut self, value: i8) -> Result<()> {
        self.reserve(1)?;
        self.buf.put_i8(value);
        Ok(())
    }

    /// Write `uint8_t`, rejecting values wider than 8 bits
    pub fn write_uint8(&mut self, value: u32) -> Result<()> {
        check_narrowing(u64::from(value), 8)?;
        self.reserve(1)?;
        self.buf.put_u8(value as u8);
        Ok(())
    }

    /// Write `char`, rejecting code points wider than 8 bits
    pub fn write_char(&mut self, value: char) -> Result<()> {
        self.write_uint8(u32::from(value))
    }

    /// Write `int16_t`
    pub fn write_int16(&mut self, value: i16) -> Result<()> {
        self.reserve(2)?;
        if self.little_endian {
            self.buf.put_i16_le(value);
        } else {
            self.buf.put_i16(value);
        }
        Ok(())
    }

    /// Write `uint16_t`, rejecting values wider than 16 bits
    pub fn write_uint16(&mut self, value: u32) -> Result<()> {
        check_narrowing(u64::from(value), 16)?;
        self.reserve(2)?;
        if self.little_endian {
            self.buf.put_u16_le(value as u16);
        } else {
            self.buf.put_u16(value as u16);
        }
        Ok(())
    }

    /// Write `int32_t`
    pub fn write_int32(&mut self, value: i32) -> Result<()> {
        self.reserve(4)?;
        if self.little_endian {
            self.buf.put_i32_le(value);
        } else {
            self.buf.put_i32(value);
        }
        Ok(())
    }

    /// Write `uint32_t`, rejecting values wider than 32 bits
    pub fn write_uint32(&mut self, value: u64) -> Result<()> {
        check_narrowing(value, 32)?;
        self.reserve(4)?;
        if self.little_endian {
            self.buf.put_u32_le(value as u32);
        } else {
            self.buf.put_u32(value as u32);
        }
        Ok(())
    }

    /// Write `int64_t`
    pub fn write_int64(&mut self, value: i64) -> Result<()> {
        self.reserve(8)?;
        if self.little_endian {
            self.buf.put_i64_le(value);
        } else {
            self.buf.put_i64(value);
        }
        Ok(())
    }

    /// Write `uint64_t`
    pub fn write_uint64(&mut self, value: u64) -> Result<()> {
        self.reserve(8)?;
        if self.little_endian {
            self.buf.put_u64_le(value);
        } else {
            self.buf.put_u64(value);
        }
        Ok(())
    }

    /// Write `float` as its raw IEEE-754 bits
    pub fn write_float(&mut self, value: f32) -> Result<()> {
        self.write_uint32(u64::from(value.to_bits()))
    }

    /// Write `double` as its raw IEEE-754 bits
    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.write_uint64(value.to_bits())
    }
}

fn check_narrowing(value: u64, bits: u32) -> Result<()> {
    if value >> bits != 0 {
        return Err(Error::NarrowingOverflow { value, bits });
    }
    Ok(())
}
