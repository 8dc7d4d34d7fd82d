//! Bounds-checked big-endian readers.
use crate::errors::DecodeError;

#[inline]
fn window(buf: &[u8], offset: usize, width: usize) -> Result<&[u8], DecodeError> {
    offset
        .checked_add(width)
        .and_then(|end| buf.get(offset..end))
        .ok_or(DecodeError::OutOfBounds {
            offset,
            width,
            available: buf.len(),
        })
}

#[inline]
pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8, DecodeError> {
    window(buf, offset, 1).map(|b| b[0])
}

#[inline]
pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16, DecodeError> {
    window(buf, offset, 2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

#[inline]
pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32, DecodeError> {
    window(buf, offset, 4).map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Returns `len` bytes starting at `offset`.
#[inline]
pub fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], DecodeError> {
    window(buf, offset, len)
}
