//! # Request Header
//!
//! The schema-independent half of a request: which method of which protocol
//! version is being called.
//!
//! Field tags and the `required` labels match `RequestHeaderProto`, so the
//! header bytes are identical to what any peer speaking the same protocol
//! produces. Required fields are always written, even when they hold a zero
//! value, and a header missing any of them is rejected on read.

use prost::Message;

use crate::error::Error;
use crate::error::Result;

#[derive(Clone, PartialEq, Eq, Hash, Message)]
pub struct RequestHeader {
    /// Name of the method being invoked.
    #[prost(string, required, tag = "1")]
    pub method_name: String,
    /// Name of the protocol that declares the method.
    #[prost(string, required, tag = "2")]
    pub protocol_name: String,
    /// Protocol version the client was built against.
    #[prost(int64, required, tag = "3")]
    pub protocol_version: i64,
}

impl RequestHeader {
    pub fn new(method_name: impl Into<String>, protocol_name: impl Into<String>, protocol_version: i64) -> Self {
        Self {
            method_name: method_name.into(),
            protocol_name: protocol_name.into(),
            protocol_version,
        }
    }

    /// Parses a header segment, requiring all three fields to be present.
    ///
    /// Present but zero-valued fields (an empty name, version 0) are accepted.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let wire = WireHeader::decode(bytes)?;
        Ok(Self {
            method_name: wire.method_name.ok_or_else(|| missing(1, "method_name"))?,
            protocol_name: wire.protocol_name.ok_or_else(|| missing(2, "protocol_name"))?,
            protocol_version: wire.protocol_version.ok_or_else(|| missing(3, "protocol_version"))?,
        })
    }
}

fn missing(tag: u32, name: &str) -> Error {
    Error::MalformedHeader(format!("missing field {tag} ({name})"))
}

/// Decode-side view of `RequestHeader` that records which fields were on the
/// wire. prost fills absent `required` fields with their defaults, so
/// presence is only observable through `optional` labels.
#[derive(Clone, PartialEq, Message)]
struct WireHeader {
    #[prost(string, optional, tag = "1")]
    method_name: Option<String>,
    #[prost(string, optional, tag = "2")]
    protocol_name: Option<String>,
    #[prost(int64, optional, tag = "3")]
    protocol_version: Option<i64>,
}
