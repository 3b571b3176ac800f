//! Delta decoding: reconstruct objects from copy/insert instruction streams.
//!
//! Delta format:
//! ```text
//! [source_size: varint] [target_size: varint]
//! [instruction]*
//! ```
//!
//! Instructions:
//! - Copy:   `[1SSSOOOO] [offset_bytes] [size_bytes]`
//! - Insert: `[0NNNNNNN] [N literal bytes]`

use crate::PackError;

/// Read a variable-length size from delta header bytes: little-endian
/// 7-bit groups with the high bit as continuation.
///
/// Returns `(value, bytes_consumed)`, or `None` on a truncated encoding
/// or one with more continuation bytes than a `usize` can hold.
pub fn read_varint(data: &[u8]) -> Option<(usize, usize)> {
    let mut value: usize = 0;
    let mut shift = 0u32;
    let mut pos = 0;

    loop {
        if pos >= data.len() || shift >= usize::BITS {
            return None;
        }
        let byte = data[pos];
        pos += 1;
        value |= ((byte & 0x7f) as usize) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            break;
        }
    }
    Some((value, pos))
}

/// Apply a delta instruction stream to a base object, producing the target.
///
/// Validates the declared source size against the base, bounds-checks every
/// copy against the base, and requires the output to reach exactly the
/// declared target size.
pub fn apply_delta(base: &[u8], delta: &[u8]) -> Result<Vec<u8>, PackError> {
    let mut pos = 0;

    let (source_size, consumed) =
        read_varint(&delta[pos..]).ok_or_else(|| PackError::InvalidDelta {
            offset: 0,
            reason: "truncated source size".into(),
        })?;
    pos += consumed;

    let (target_size, consumed) =
        read_varint(&delta[pos..]).ok_or_else(|| PackError::InvalidDelta {
            offset: pos as u64,
            reason: "truncated target size".into(),
        })?;
    pos += consumed;

    if source_size != base.len() {
        return Err(PackError::InvalidDelta {
            offset: 0,
            reason: format!(
                "source size mismatch: delta says {source_size}, base is {}",
                base.len()
            ),
        });
    }

    let mut output = Vec::with_capacity(target_size);

    while pos < delta.len() {
        let cmd = delta[pos];
        pos += 1;

        if cmd & 0x80 != 0 {
            // Copy instruction: bits 0x01-0x08 select offset bytes,
            // bits 0x10-0x40 select size bytes.
            let mut offset: usize = 0;
            let mut size: usize = 0;

            for (bit, shift) in [(0x01u8, 0), (0x02, 8), (0x04, 16), (0x08, 24)] {
                if cmd & bit != 0 {
                    if pos >= delta.len() {
                        return Err(PackError::InvalidDelta {
                            offset: pos as u64,
                            reason: "truncated copy offset".into(),
                        });
                    }
                    offset |= (delta[pos] as usize) << shift;
                    pos += 1;
                }
            }

            for (bit, shift) in [(0x10u8, 0), (0x20, 8), (0x40, 16)] {
                if cmd & bit != 0 {
                    if pos >= delta.len() {
                        return Err(PackError::InvalidDelta {
                            offset: pos as u64,
                            reason: "truncated copy size".into(),
                        });
                    }
                    size |= (delta[pos] as usize) << shift;
                    pos += 1;
                }
            }

            // A size of 0 means 0x10000 (65536).
            if size == 0 {
                size = 0x10000;
            }

            if offset + size > base.len() {
                return Err(PackError::InvalidDelta {
                    offset: pos as u64,
                    reason: format!(
                        "copy out of bounds: offset={offset}, size={size}, base_len={}",
                        base.len()
                    ),
                });
            }

            output.extend_from_slice(&base[offset..offset + size]);
        } else if cmd != 0 {
            // Insert instruction: cmd is the literal byte count.
            let n = cmd as usize;
            if pos + n > delta.len() {
                return Err(PackError::InvalidDelta {
                    offset: pos as u64,
                    reason: "truncated insert data".into(),
                });
            }
            output.extend_from_slice(&delta[pos..pos + n]);
            pos += n;
        } else {
            return Err(PackError::InvalidDelta {
                offset: (pos - 1) as u64,
                reason: "unexpected delta opcode 0".into(),
            });
        }
    }

    if output.len() != target_size {
        return Err(PackError::InvalidDelta {
            offset: 0,
            reason: format!(
                "target size mismatch: delta says {target_size}, got {}",
                output.len()
            ),
        });
    }

    Ok(output)
}
