//! # Envelopes
//!
//! Request and response frames built from varint32-delimited segments.
//!
//! ## Invariants
//! - **Segment Order**: a request writes its header segment before its
//!   payload segment; a response has no header segment at all.
//! - **Exact Reads**: `read_from` consumes exactly one frame and leaves any
//!   following bytes untouched.
//! - **Bounded Reads**: a segment longer than `Limits::max_segment_len` is
//!   rejected before anything is allocated for it.

use std::fmt;

use bytes::Buf;
use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;
use prost::Message;

use crate::error::Error;
use crate::error::Result;
use crate::header::RequestHeader;
use crate::message::DynMessage;
use crate::payload::Payload;
use crate::varint;

/// Default ceiling for a single segment: 64 MiB.
pub const DEFAULT_MAX_SEGMENT_LEN: usize = 64 * 1024 * 1024;

/// Bounds applied while reading frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_segment_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_segment_len: DEFAULT_MAX_SEGMENT_LEN,
        }
    }
}

/// A frame that can be sized, written, and read back.
pub trait Envelope: Sized {
    /// Exact number of bytes `write_to` emits.
    ///
    /// # Errors
    /// Returns `Uninitialized` if the payload is `Empty`.
    fn length(&self) -> Result<usize>;

    /// Writes the frame. Nothing is written if the buffer cannot hold all of it.
    fn write_to(&self, buf: &mut impl BufMut) -> Result<()>;

    /// Reads one frame, keeping the payload as raw bytes.
    fn read_from(buf: &mut impl Buf, limits: &Limits) -> Result<Self>;

    fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.length()?);
        self.write_to(&mut buf)?;
        Ok(buf.freeze())
    }
}

/// Client to server frame: header plus payload.
#[derive(Debug)]
pub struct RequestEnvelope {
    header: RequestHeader,
    payload: Payload,
}

impl RequestEnvelope {
    pub fn new(header: RequestHeader, request: impl DynMessage) -> Self {
        Self::from_payload(header, Payload::encoded(request))
    }

    pub fn from_boxed(header: RequestHeader, request: Box<dyn DynMessage>) -> Self {
        Self::from_payload(header, Payload::Encoded(request))
    }

    pub fn from_payload(header: RequestHeader, payload: Payload) -> Self {
        Self { header, payload }
    }

    pub fn header(&self) -> &RequestHeader {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_parts(self) -> (RequestHeader, Payload) {
        (self.header, self.payload)
    }

    /// Decodes the raw payload once the method's request type is known.
    pub fn decode_payload<M: Message + Default>(&self) -> Result<M> {
        self.payload.decode()
    }

    fn header_delimited_len(&self) -> Result<usize> {
        let len = self.header.encoded_len();
        Ok(varint::encoded_len(varint::segment_len(len)?) + len)
    }
}

impl Envelope for RequestEnvelope {
    fn length(&self) -> Result<usize> {
        Ok(self.header_delimited_len()? + self.payload.delimited_len()?)
    }

    fn write_to(&self, buf: &mut impl BufMut) -> Result<()> {
        ensure_capacity(self.length()?, &*buf)?;
        let header_len = varint::segment_len(self.header.encoded_len())?;
        varint::write(header_len, buf);
        self.header.encode(buf)?;
        self.payload.write_delimited(buf)
    }

    fn read_from(buf: &mut impl Buf, limits: &Limits) -> Result<Self> {
        let header_bytes = read_segment(buf, limits)?;
        let header = RequestHeader::parse(&header_bytes)?;
        let payload = Payload::Decoded(read_segment(buf, limits)?);
        Ok(Self { header, payload })
    }
}

impl fmt::Display for RequestEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.header.protocol_name, self.header.method_name)
    }
}

/// Server to client frame: payload only.
///
/// Correlation with the originating request is the transport's job, so no
/// header travels with a response.
#[derive(Debug, Default)]
pub struct ResponseEnvelope {
    payload: Payload,
}

impl ResponseEnvelope {
    pub fn new(response: impl DynMessage) -> Self {
        Self {
            payload: Payload::encoded(response),
        }
    }

    /// Wraps raw response bytes, as received from the wire.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            payload: Payload::decoded(bytes),
        }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Decodes the raw payload into the caller's expected response type.
    pub fn decode_payload<M: Message + Default>(&self) -> Result<M> {
        self.payload.decode()
    }
}

impl Envelope for ResponseEnvelope {
    fn length(&self) -> Result<usize> {
        self.payload.delimited_len()
    }

    fn write_to(&self, buf: &mut impl BufMut) -> Result<()> {
        ensure_capacity(self.length()?, &*buf)?;
        self.payload.write_delimited(buf)
    }

    fn read_from(buf: &mut impl Buf, limits: &Limits) -> Result<Self> {
        let bytes = read_segment(buf, limits)?;
        Ok(Self {
            payload: Payload::Decoded(bytes),
        })
    }
}

impl fmt::Display for ResponseEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Empty => write!(f, "response(empty)"),
            Payload::Encoded(message) => write!(f, "response({})", message.type_name()),
            Payload::Decoded(bytes) => write!(f, "response({} bytes)", bytes.len()),
        }
    }
}

fn ensure_capacity(needed: usize, buf: &impl BufMut) -> Result<()> {
    let remaining = buf.remaining_mut();
    if remaining < needed {
        return Err(Error::BufferTooSmall { needed, remaining });
    }
    Ok(())
}

/// Reads one varint32 length N followed by exactly N bytes.
fn read_segment(buf: &mut impl Buf, limits: &Limits) -> Result<Bytes> {
    let len = varint::read(buf)? as usize;
    if len > limits.max_segment_len {
        return Err(Error::SegmentTooLarge {
            len,
            max: limits.max_segment_len,
        });
    }
    if buf.remaining() < len {
        return Err(Error::Truncated {
            needed: len,
            have: buf.remaining(),
        });
    }
    Ok(buf.copy_to_bytes(len))
}
