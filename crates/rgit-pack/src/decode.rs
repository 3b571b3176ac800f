//! Linear pack decoding.

use std::io::Read;

use flate2::bufread::ZlibDecoder;
use rgit_object::ObjectType;

use crate::entry;
use crate::{
    PackEntryType, PackError, PackedObject, PendingDelta, PACK_HEADER_SIZE, PACK_SIGNATURE,
    PACK_VERSION,
};

/// The result of decoding a pack: whole objects and ref-delta records,
/// each in pack order.
#[derive(Debug, Default)]
pub struct DecodedPack {
    pub objects: Vec<PackedObject>,
    pub deltas: Vec<PendingDelta>,
}

/// Decode a whole pack from memory.
///
/// A single pass over the buffer with an explicit cursor; any malformed
/// record aborts the decode. The compressed length of a record is not
/// stored, so the cursor advances by however many bytes the zlib stream
/// actually consumed. Bytes after the final record (the pack checksum)
/// are ignored.
pub fn decode_pack(data: &[u8]) -> Result<DecodedPack, PackError> {
    if data.len() < PACK_HEADER_SIZE {
        return Err(PackError::InvalidHeader(format!(
            "pack too short: {} bytes",
            data.len()
        )));
    }
    if &data[..4] != PACK_SIGNATURE {
        return Err(PackError::InvalidHeader("missing PACK signature".into()));
    }
    let version = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    if version != PACK_VERSION {
        return Err(PackError::UnsupportedVersion(version));
    }
    let count = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);

    let mut decoded = DecodedPack::default();
    let mut pos = PACK_HEADER_SIZE;

    for _ in 0..count {
        let entry_offset = pos as u64;
        let entry = entry::parse_entry_header(&data[pos..], entry_offset)?;
        pos += entry.header_size;

        let (payload, consumed) = inflate(&data[pos..], entry.uncompressed_size, entry_offset)?;
        pos += consumed;

        if payload.len() != entry.uncompressed_size {
            return Err(PackError::SizeMismatch {
                offset: entry_offset,
                expected: entry.uncompressed_size,
                actual: payload.len(),
            });
        }

        match entry.entry_type {
            PackEntryType::Commit => decoded.objects.push(PackedObject {
                obj_type: ObjectType::Commit,
                data: payload,
            }),
            PackEntryType::Tree => decoded.objects.push(PackedObject {
                obj_type: ObjectType::Tree,
                data: payload,
            }),
            PackEntryType::Blob => decoded.objects.push(PackedObject {
                obj_type: ObjectType::Blob,
                data: payload,
            }),
            PackEntryType::Tag => decoded.objects.push(PackedObject {
                obj_type: ObjectType::Tag,
                data: payload,
            }),
            PackEntryType::RefDelta { base } => decoded.deltas.push(PendingDelta {
                base,
                data: payload,
            }),
        }
    }

    Ok(decoded)
}

/// Inflate one zlib stream from the front of `compressed`.
///
/// Returns the decompressed bytes and the exact count of compressed bytes
/// consumed, so the caller can advance past the stream.
fn inflate(
    compressed: &[u8],
    size_hint: usize,
    offset: u64,
) -> Result<(Vec<u8>, usize), PackError> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut buf = Vec::with_capacity(size_hint);
    decoder
        .read_to_end(&mut buf)
        .map_err(|_| PackError::CorruptEntry(offset))?;
    let consumed = decoder.total_in() as usize;
    Ok((buf, consumed))
}
