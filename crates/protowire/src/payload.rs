//! # Payload
//!
//! The message half of an envelope, in exactly one representation at a time.
//!
//! ## Invariants
//! - **One State**: a payload is `Empty`, `Encoded`, or `Decoded`; never two.
//! - **Checked Access**: accessors for one representation reject the other
//!   with `WrongPayloadState` instead of returning a default.

use bytes::BufMut;
use bytes::Bytes;
use prost::Message;

use crate::error::Error;
use crate::error::Result;
use crate::message::DynMessage;
use crate::varint;

/// Body of a request or response envelope.
#[derive(Debug, Default)]
pub enum Payload {
    /// Constructed but not populated. Sizing or writing it is a usage error.
    #[default]
    Empty,
    /// A structured message ready to serialize (outgoing).
    Encoded(Box<dyn DynMessage>),
    /// Raw bytes awaiting a message type (incoming).
    Decoded(Bytes),
}

impl Payload {
    pub fn encoded(message: impl DynMessage) -> Self {
        Self::Encoded(Box::new(message))
    }

    pub fn decoded(bytes: impl Into<Bytes>) -> Self {
        Self::Decoded(bytes.into())
    }

    /// Short name of the current representation, used in diagnostics.
    pub fn state(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Encoded(_) => "encoded",
            Self::Decoded(_) => "decoded",
        }
    }

    /// Size of the serialized body, without its length prefix.
    pub fn body_len(&self) -> Result<usize> {
        match self {
            Self::Empty => Err(Error::Uninitialized),
            Self::Encoded(message) => Ok(message.wire_len()),
            Self::Decoded(bytes) => Ok(bytes.len()),
        }
    }

    pub fn message(&self) -> Result<&dyn DynMessage> {
        match self {
            Self::Encoded(message) => Ok(message.as_ref()),
            other => Err(other.wrong_state("encoded")),
        }
    }

    pub fn raw(&self) -> Result<&Bytes> {
        match self {
            Self::Decoded(bytes) => Ok(bytes),
            other => Err(other.wrong_state("decoded")),
        }
    }

    pub fn into_raw(self) -> Result<Bytes> {
        match self {
            Self::Decoded(bytes) => Ok(bytes),
            other => Err(other.wrong_state("decoded")),
        }
    }

    /// Builds a fresh `M` from the raw bytes.
    ///
    /// Fails on any malformed or truncated body; no partially merged value is
    /// ever returned.
    pub fn decode<M: Message + Default>(&self) -> Result<M> {
        let bytes = self.raw()?;
        Ok(M::decode(bytes.clone())?)
    }

    /// Length prefix plus body.
    pub(crate) fn delimited_len(&self) -> Result<usize> {
        let len = self.body_len()?;
        Ok(varint::encoded_len(varint::segment_len(len)?) + len)
    }

    pub(crate) fn write_delimited(&self, buf: &mut impl BufMut) -> Result<()> {
        let len = varint::segment_len(self.body_len()?)?;
        varint::write(len, buf);
        match self {
            Self::Empty => return Err(Error::Uninitialized),
            Self::Encoded(message) => message.write_wire(buf)?,
            Self::Decoded(bytes) => buf.put_slice(bytes),
        }
        Ok(())
    }

    fn wrong_state(&self, expected: &'static str) -> Error {
        Error::WrongPayloadState {
            expected,
            found: self.state(),
        }
    }
}
