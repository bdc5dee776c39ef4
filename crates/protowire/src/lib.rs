//! # Protowire
//!
//! The byte-level framing contract shared by every protorpc peer.
//!
//! ## Format
//!
//! ```text
//! request  := varint32(len(header)) header varint32(len(payload)) payload
//! response := varint32(len(payload)) payload
//! ```
//!
//! The header is a protobuf `RequestHeader` and is parsed as soon as it is
//! read, so routing and logging never need the payload schema. The payload is
//! kept as raw bytes until the caller names the message type to decode into.
//!
//! ## Invariants
//! - **Exact Sizing**: `Envelope::length` equals the number of bytes
//!   `Envelope::write_to` emits, for every populated envelope.
//! - **No Partial Values**: a short or oversized segment is an error, never a
//!   best-effort decode.

pub mod envelope;
pub mod error;
pub mod header;
pub mod message;
pub mod payload;
pub mod varint;

pub use envelope::Envelope;
pub use envelope::Limits;
pub use envelope::RequestEnvelope;
pub use envelope::ResponseEnvelope;
pub use error::Error;
pub use error::Result;
pub use header::RequestHeader;
pub use message::DynMessage;
pub use payload::Payload;
