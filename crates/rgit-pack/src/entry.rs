//! Pack entry header parsing.

use rgit_hash::ObjectId;

use crate::{PackEntryType, PackError};

/// A raw entry header read from a pack (before decompression).
#[derive(Debug, Clone)]
pub struct PackEntry {
    pub entry_type: PackEntryType,
    pub uncompressed_size: usize,
    /// Number of bytes consumed by the header (including any delta base id).
    pub header_size: usize,
}

/// Parse a pack entry header starting at the given position in `data`.
///
/// `entry_offset` is the absolute offset of this entry in the pack,
/// carried for error context.
///
/// First byte: bit 7 = size continuation, bits 6-4 = type, bits 3-0 =
/// low size bits. Continuation bytes append 7 bits each at shift 4, 11,
/// 18, and so on.
pub fn parse_entry_header(data: &[u8], entry_offset: u64) -> Result<PackEntry, PackError> {
    if data.is_empty() {
        return Err(PackError::CorruptEntry(entry_offset));
    }

    let mut pos = 0;
    let c = data[pos];
    pos += 1;

    let type_num = (c >> 4) & 0x07;
    let mut size: u64 = (c & 0x0f) as u64;
    let mut shift = 4;

    let mut byte = c;
    while byte & 0x80 != 0 {
        if pos >= data.len() {
            return Err(PackError::CorruptEntry(entry_offset));
        }
        byte = data[pos];
        pos += 1;
        if shift >= u64::BITS {
            return Err(PackError::CorruptEntry(entry_offset));
        }
        size |= ((byte & 0x7f) as u64) << shift;
        shift += 7;
    }

    let entry_type = match type_num {
        1 => PackEntryType::Commit,
        2 => PackEntryType::Tree,
        3 => PackEntryType::Blob,
        4 => PackEntryType::Tag,
        6 => {
            // OFS_DELTA: offset-relative deltas are out of scope; the
            // fetch request never enables the capability that produces
            // them.
            return Err(PackError::UnsupportedType {
                code: 6,
                offset: entry_offset,
            });
        }
        7 => {
            // REF_DELTA: 20 raw bytes name the base object.
            let hash_len = ObjectId::LEN;
            if pos + hash_len > data.len() {
                return Err(PackError::CorruptEntry(entry_offset));
            }
            let base = ObjectId::from_bytes(&data[pos..pos + hash_len])
                .map_err(|_| PackError::CorruptEntry(entry_offset))?;
            pos += hash_len;
            PackEntryType::RefDelta { base }
        }
        code => {
            return Err(PackError::InvalidType {
                code,
                offset: entry_offset,
            });
        }
    };

    Ok(PackEntry {
        entry_type,
        uncompressed_size: size as usize,
        header_size: pos,
    })
}

/// Encode a pack entry header into bytes.
///
/// For REF_DELTA the caller appends the 20 base id bytes separately.
pub fn encode_entry_header(type_num: u8, size: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(10);
    let mut s = size;

    let mut byte = ((type_num & 0x07) << 4) | (s & 0x0f) as u8;
    s >>= 4;
    while s > 0 {
        buf.push(byte | 0x80);
        byte = (s & 0x7f) as u8;
        s >>= 7;
    }
    buf.push(byte);
    buf
}
