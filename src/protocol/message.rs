//! Message and builder contracts implemented by generated dialect code
//!
//! One concrete message type per schema definition implements [`Message`];
//! its companion [`MessageBuilder`] populates fields from a payload. The
//! runtime never looks inside a payload beyond these two traits.

use std::any::Any;
use std::fmt;

use super::{CodedInput, CodedOutput, Result};

/// Immutable typed MAVLink message
pub trait Message: fmt::Debug + Send + Sync + 'static {
    /// Message type id (0..=255)
    fn message_type(&self) -> u8;

    /// Serialize all fields in wire order
    fn write_to(&self, out: &mut CodedOutput<'_>) -> Result<()>;

    /// Downcast support for callers that know the concrete type
    fn as_any(&self) -> &dyn Any;
}

/// Mutable accumulator producing a [`Message`]
pub trait MessageBuilder: Send {
    /// Read all fields in wire order
    fn read_from(&mut self, input: &mut CodedInput<'_>) -> Result<()>;

    /// Finalize into an immutable message
    fn build(self: Box<Self>) -> Box<dyn Message>;
}

/// Factory for a fresh builder of one message type
pub type BuilderFactory = fn() -> Box<dyn MessageBuilder>;

impl dyn Message {
    /// Borrow as a concrete message type
    #[must_use]
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
