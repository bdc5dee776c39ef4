//! # Dynamic Messages
//!
//! An object-safe view over prost messages, so envelopes and method tables can
//! carry payloads of any schema behind one type.

use std::any::Any;
use std::fmt;

use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;
use prost::EncodeError;
use prost::Message;

/// A structured message that can size and serialize itself.
///
/// Implemented for every `prost::Message + Default`.
pub trait DynMessage: fmt::Debug + Send + Sync + 'static {
    /// Serialized size in bytes, without any length prefix.
    fn wire_len(&self) -> usize;

    /// Serializes the message body, without any length prefix.
    fn write_wire(&self, buf: &mut dyn BufMut) -> std::result::Result<(), EncodeError>;

    /// Rust type name of the concrete message.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;

    /// Serializes the message body into a fresh buffer.
    fn to_wire_bytes(&self) -> std::result::Result<Bytes, EncodeError> {
        let mut buf = BytesMut::with_capacity(self.wire_len());
        self.write_wire(&mut buf)?;
        Ok(buf.freeze())
    }
}

impl<M> DynMessage for M
where
    M: Message + Default + 'static,
{
    fn wire_len(&self) -> usize {
        Message::encoded_len(self)
    }

    fn write_wire(&self, buf: &mut dyn BufMut) -> std::result::Result<(), EncodeError> {
        let mut buf = buf;
        Message::encode(self, &mut buf)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<M>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl dyn DynMessage {
    pub fn downcast_ref<M: DynMessage>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }

    /// Recovers the concrete message, or `None` if it is another type.
    pub fn downcast<M: DynMessage>(self: Box<Self>) -> Option<M> {
        self.into_any().downcast::<M>().ok().map(|boxed| *boxed)
    }
}
