/// Running counters of one stream decoder.
///
/// Counters only grow for the lifetime of the decoder. Bytes of a frame that
/// was buffered and then failed validation count toward `packets_dropped`,
/// not `bytes_dropped`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderStats {
    /// Every byte handed to the decoder
    pub bytes_received: u64,
    /// Bytes skipped while scanning for a start byte
    pub bytes_dropped: u64,
    /// Frames that validated and decoded
    pub packets_received: u64,
    /// Complete frames rejected by validation
    pub packets_dropped: u64,
}

impl DecoderStats {
    /// Complete frames seen, accepted or not
    #[must_use]
    pub const fn frames_seen(&self) -> u64 {
        self.packets_received + self.packets_dropped
    }

    /// Share of complete frames that were rejected
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn packet_drop_ratio(&self) -> Option<f64> {
        let seen = self.frames_seen();
        if seen == 0 {
            return None;
        }

        Some(self.packets_dropped as f64 / seen as f64)
    }
}
