//! Streaming MAVLink decoder
//!
//! Recovers frame boundaries from an arbitrary byte stream using only the
//! start byte and the length field. Malformed frames are counted and
//! discarded; scanning resumes at the next start byte. A decoder holds mutable
//! scan state and serves exactly one link; use one instance per link.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{DecoderStats, MAX_PACKET_LENGTH, Packet, ProtocolDescriptor, Result, codec};

/// Scanner position within the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// No frame in progress
    Idle,
    /// Start byte buffered, length byte not yet seen
    AwaitingLength,
    /// Copying header, payload and checksum into the frame buffer
    Accumulating { frame_length: usize },
    /// Frame fully buffered, pending validation
    Complete { frame_length: usize },
}

/// Stateful stream decoder
#[derive(Debug)]
pub struct Decoder {
    descriptor: Arc<ProtocolDescriptor>,
    buffer: Box<[u8; MAX_PACKET_LENGTH]>,
    cursor: usize,
    state: ScanState,
    stats: DecoderStats,
}

impl Decoder {
    /// Create a decoder for `descriptor`
    #[must_use]
    pub fn new(descriptor: Arc<ProtocolDescriptor>) -> Self {
        Self {
            descriptor,
            buffer: Box::new([0u8; MAX_PACKET_LENGTH]),
            cursor: 0,
            state: ScanState::Idle,
            stats: DecoderStats::default(),
        }
    }

    /// Protocol descriptor in use
    #[must_use]
    pub fn descriptor(&self) -> &ProtocolDescriptor {
        &self.descriptor
    }

    /// Feed the next chunk of the stream
    ///
    /// Chunks may be of any size, including empty, and frames may be split
    /// across calls at any point. Returns the packets completed by this chunk
    /// in stream order. Never fails: invalid frames only bump
    /// [`DecoderStats::packets_dropped`].
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<Packet> {
        let mut packets = Vec::new();
        let mut input = chunk;

        loop {
            match self.state {
                ScanState::Idle => {
                    let stx = self.descriptor.stx();
                    let found = input.iter().position(|&b| b == stx);
                    let skipped = found.unwrap_or(input.len());
                    if skipped > 0 {
                        trace!(
                            skipped,
                            start_found = found.is_some(),
                            "discarded bytes outside a frame"
                        );
                        self.stats.bytes_dropped += skipped as u64;
                    }
                    if found.is_none() {
                        break;
                    }
                    self.buffer[0] = stx;
                    self.cursor = 1;
                    input = &input[skipped + 1..];
                    self.state = ScanState::AwaitingLength;
                }
                ScanState::AwaitingLength => {
                    // peek only; the length byte is copied with the rest of the frame
                    let Some(&length) = input.first() else {
                        break;
                    };
                    let frame_length = self.descriptor.profile().frame_length(usize::from(length));
                    self.state = ScanState::Accumulating { frame_length };
                }
                ScanState::Accumulating { frame_length } => {
                    if input.is_empty() {
                        break;
                    }
                    let take = (frame_length - self.cursor).min(input.len());
                    self.buffer[self.cursor..self.cursor + take].copy_from_slice(&input[..take]);
                    self.cursor += take;
                    input = &input[take..];
                    if self.cursor == frame_length {
                        self.state = ScanState::Complete { frame_length };
                    }
                }
                ScanState::Complete { frame_length } => {
                    self.finish_frame(frame_length, &mut packets);
                    self.cursor = 0;
                    self.state = ScanState::Idle;
                }
            }
        }

        self.stats.bytes_received += chunk.len() as u64;
        packets
    }

    fn finish_frame(&mut self, frame_length: usize, packets: &mut Vec<Packet>) {
        match codec::decode(&self.descriptor, &self.buffer[..frame_length]) {
            Ok(packet) => {
                trace!(
                    message_type = packet.message_type(),
                    sequence = packet.sequence_number(),
                    "frame decoded"
                );
                self.stats.packets_received += 1;
                packets.push(packet);
            }
            Err(err) => {
                let message_type = self.buffer[self.descriptor.profile().header_length() - 1];
                debug!(message_type, frame_length, error = %err, "dropping frame");
                self.stats.packets_dropped += 1;
            }
        }
    }

    /// Decode one complete, pre-framed packet without touching stream state
    pub fn decode_single(&self, frame: &[u8]) -> Result<Packet> {
        codec::decode(&self.descriptor, frame)
    }

    /// Snapshot of the running counters
    #[must_use]
    pub const fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Every byte handed to [`Decoder::decode`]
    #[must_use]
    pub const fn bytes_received(&self) -> u64 {
        self.stats.bytes_received
    }

    /// Bytes skipped while scanning for a start byte
    #[must_use]
    pub const fn bytes_dropped(&self) -> u64 {
        self.stats.bytes_dropped
    }

    /// Frames that validated and decoded
    #[must_use]
    pub const fn packets_received(&self) -> u64 {
        self.stats.packets_received
    }

    /// Complete frames rejected by validation
    #[must_use]
    pub const fn packets_dropped(&self) -> u64 {
        self.stats.packets_dropped
    }

    /// Bytes of a partially received frame held in the buffer
    #[must_use]
    pub const fn pending(&self) -> usize {
        match self.state {
            ScanState::Idle => 0,
            _ => self.cursor,
        }
    }
}
