//! Domain name decoding with RFC 1035 §4.1.4 compression.
//!
//! Pointers are followed iteratively. Each pointer must target an offset
//! strictly before its own position and at most [`MAX_POINTER_HOPS`] pointers
//! are followed per name, so adversarial input cannot make decoding loop or
//! recurse without bound.
use super::{MAX_NAME_LEN, MAX_POINTER_HOPS};
use crate::errors::DecodeError;
use std::fmt::Write;

const POINTER_MASK: u8 = 0xC0;

/// Decodes the name starting at `offset` in `buf`.
///
/// Returns the canonical dotted name (empty for the root) together with the
/// number of octets the name occupies at `offset`. Octets reached through a
/// compression pointer are not counted: a pointer contributes exactly two.
pub fn decode_name(buf: &[u8], offset: usize) -> Result<(String, usize), DecodeError> {
    let truncated = |at: usize| DecodeError::TruncatedName {
        offset: at,
        available: buf.len(),
    };

    let mut name = String::new();
    let mut labels = 0usize;
    // Uncompressed wire length, starting with the terminating root octet.
    let mut wire_len = 1usize;
    let mut cursor = offset;
    let mut consumed: Option<usize> = None;
    let mut hops = 0usize;

    loop {
        let len = *buf.get(cursor).ok_or_else(|| truncated(cursor))?;

        match len & POINTER_MASK {
            0x00 if len == 0 => {
                let consumed = consumed.unwrap_or_else(|| cursor + 1 - offset);
                return Ok((name, consumed));
            }
            0x00 => {
                let start = cursor + 1;
                let label = buf
                    .get(start..start + usize::from(len))
                    .ok_or_else(|| truncated(cursor))?;

                wire_len += 1 + label.len();
                if wire_len > MAX_NAME_LEN {
                    return Err(DecodeError::NameTooLong { length: wire_len });
                }

                if labels > 0 {
                    name.push('.');
                }
                push_label(&mut name, label);
                labels += 1;
                cursor = start + label.len();
            }
            POINTER_MASK => {
                let low = *buf.get(cursor + 1).ok_or_else(|| truncated(cursor))?;
                let target = (usize::from(len & !POINTER_MASK) << 8) | usize::from(low);

                hops += 1;
                if target >= cursor || hops > MAX_POINTER_HOPS {
                    return Err(DecodeError::CompressionLoop {
                        offset: cursor,
                        target,
                        hops,
                    });
                }

                if consumed.is_none() {
                    consumed = Some(cursor + 2 - offset);
                }
                cursor = target;
            }
            _ => {
                return Err(DecodeError::UnsupportedLabelType {
                    offset: cursor,
                    octet: len,
                })
            }
        }
    }
}

/// Appends a label in presentation form: printable ASCII is kept, `.`, `\`
/// and every other octet become `\DDD`.
fn push_label(name: &mut String, label: &[u8]) {
    for &b in label {
        match b {
            0x21..=0x7E if b != b'.' && b != b'\\' => name.push(char::from(b)),
            _ => {
                let _ = write!(name, "\\{:03}", b);
            }
        }
    }
}
