//! # Varint32
//!
//! Length prefixes are protobuf base-128 varints restricted to 32 bits: each
//! byte carries seven payload bits, lowest group first, with the high bit set
//! on every byte except the last.

use bytes::Buf;
use bytes::BufMut;

use crate::error::Error;
use crate::error::Result;

/// Longest encoding of a 32-bit value.
pub const MAX_LEN: usize = 5;

/// Number of bytes `write` emits for `value`.
pub fn encoded_len(value: u32) -> usize {
    prost::encoding::encoded_len_varint(u64::from(value))
}

/// Appends the varint encoding of `value`.
pub fn write(value: u32, buf: &mut impl BufMut) {
    prost::encoding::encode_varint(u64::from(value), buf);
}

/// Reads one varint32, consuming exactly its encoded bytes.
///
/// # Errors
/// Returns `Truncated` if the input ends mid-varint and `VarintOverflow` if
/// the value needs more than 32 bits.
pub fn read(buf: &mut impl Buf) -> Result<u32> {
    let mut value: u64 = 0;
    for i in 0..MAX_LEN {
        if !buf.has_remaining() {
            return Err(Error::Truncated { needed: i + 1, have: i });
        }
        let byte = buf.get_u8();
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return u32::try_from(value).map_err(|_| Error::VarintOverflow);
        }
    }
    Err(Error::VarintOverflow)
}

/// Converts a segment length to its prefix value.
pub(crate) fn segment_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::SegmentTooLarge {
        len,
        max: u32::MAX as usize,
    })
}
