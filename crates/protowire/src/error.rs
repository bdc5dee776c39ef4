//! # Error Definitions
//!
//! Every way sizing, writing, or reading an envelope can fail.

/// Framing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `length` or `write_to` was called on an envelope with no payload.
    #[error("length or write on uninitialized envelope")]
    Uninitialized,
    /// The payload is in the other representation (e.g. raw bytes were
    /// requested from an outgoing message).
    #[error("payload is {found}, expected {expected}")]
    WrongPayloadState {
        expected: &'static str,
        found: &'static str,
    },
    /// The input ended before a varint or a segment was complete.
    #[error("truncated frame: need {needed} bytes, have {have}")]
    Truncated { needed: usize, have: usize },
    /// A length prefix did not fit in 32 bits or ran past 5 bytes.
    #[error("varint32 length prefix overflows 32 bits")]
    VarintOverflow,
    /// A segment is longer than the configured limit (or than `u32::MAX`).
    #[error("segment of {len} bytes exceeds the {max} byte limit")]
    SegmentTooLarge { len: usize, max: usize },
    /// The output buffer cannot hold the whole frame.
    #[error("output buffer too small: need {needed} bytes, {remaining} remaining")]
    BufferTooSmall { needed: usize, remaining: usize },
    #[error("failed to encode message: {0}")]
    Encode(#[from] prost::EncodeError),
    #[error("failed to decode message: {0}")]
    Decode(#[from] prost::DecodeError),
    /// The header parsed but lacks a method or protocol name.
    #[error("malformed request header: {0}")]
    MalformedHeader(String),
}

/// A specialized Result type for framing operations.
pub type Result<T> = std::result::Result<T, Error>;
