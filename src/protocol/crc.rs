//! MAVLink checksum (CRC-16/MCRF4XX)
//!
//! Reflected CCITT polynomial, seed `0xFFFF`, no final XOR. Accumulation is
//! order-sensitive, so callers feed bytes exactly in wire order.

/// Checksum seed
pub const CRC_INIT: u16 = 0xFFFF;

/// Incremental CRC-16 accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    state: u16,
}

impl Crc16 {
    /// Create an accumulator at the seed value
    #[must_use]
    pub const fn new() -> Self {
        Self { state: CRC_INIT }
    }

    /// Fold one byte into the checksum
    #[inline]
    pub fn update(&mut self, byte: u8) {
        let mut tmp = byte ^ (self.state & 0xFF) as u8;
        tmp ^= tmp << 4;
        let tmp = u16::from(tmp);
        self.state = (self.state >> 8) ^ (tmp << 8) ^ (tmp << 3) ^ (tmp >> 4);
    }

    /// Fold a byte slice into the checksum
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update(byte);
        }
    }

    /// Current checksum value
    #[must_use]
    pub const fn checksum(&self) -> u16 {
        self.state
    }

    /// One-shot checksum of a byte slice
    #[must_use]
    pub fn compute(bytes: &[u8]) -> u16 {
        let mut crc = Self::new();
        crc.update_bytes(bytes);
        crc.checksum()
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold a 16-bit checksum into the single CRC-extra byte
#[must_use]
pub const fn fold_crc_extra(checksum: u16) -> u8 {
    ((checksum >> 8) ^ checksum) as u8
}
