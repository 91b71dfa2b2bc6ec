//! Packet encoder bound to one protocol descriptor

use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use super::{Packet, ProtocolDescriptor, Result, codec};

/// Stateless packet encoder
///
/// Cheap to clone; clones share the same descriptor.
#[derive(Debug, Clone)]
pub struct Encoder {
    descriptor: Arc<ProtocolDescriptor>,
}

impl Encoder {
    /// Create an encoder for `descriptor`
    #[must_use]
    pub fn new(descriptor: Arc<ProtocolDescriptor>) -> Self {
        Self { descriptor }
    }

    /// Protocol descriptor in use
    #[must_use]
    pub fn descriptor(&self) -> &ProtocolDescriptor {
        &self.descriptor
    }

    /// Encode `packet` to its exact wire bytes
    pub fn encode(&self, packet: &Packet) -> Result<Bytes> {
        codec::encode(&self.descriptor, packet)
    }

    /// Append the wire bytes of `packet` to `dst`; `dst` is untouched on error
    pub fn encode_into(&self, packet: &Packet, dst: &mut BytesMut) -> Result<()> {
        codec::encode_into(&self.descriptor, packet, dst)
    }
}
