//! Integration tests for pack decoding: hand-built packs exercising every
//! record shape and failure mode.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use rgit_hash::{Hasher, ObjectId};
use rgit_object::ObjectType;
use rgit_pack::delta::apply_delta;
use rgit_pack::entry::encode_entry_header;
use rgit_pack::{decode_pack, PackError, PACK_VERSION};

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn pack_header(count: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"PACK");
    out.extend_from_slice(&PACK_VERSION.to_be_bytes());
    out.extend_from_slice(&count.to_be_bytes());
    out
}

fn type_num(obj_type: ObjectType) -> u8 {
    match obj_type {
        ObjectType::Commit => 1,
        ObjectType::Tree => 2,
        ObjectType::Blob => 3,
        ObjectType::Tag => 4,
    }
}

fn whole_record(obj_type: ObjectType, content: &[u8]) -> Vec<u8> {
    let mut out = encode_entry_header(type_num(obj_type), content.len() as u64);
    out.extend_from_slice(&deflate(content));
    out
}

fn ref_delta_record(base: &ObjectId, delta: &[u8]) -> Vec<u8> {
    let mut out = encode_entry_header(7, delta.len() as u64);
    out.extend_from_slice(base.as_bytes());
    out.extend_from_slice(&deflate(delta));
    out
}

/// Build a delta that inserts the given bytes wholesale.
fn insert_delta(source_size: usize, target: &[u8]) -> Vec<u8> {
    let mut delta = Vec::new();
    for mut value in [source_size, target.len()] {
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value > 0 {
                byte |= 0x80;
            }
            delta.push(byte);
            if value == 0 {
                break;
            }
        }
    }
    for chunk in target.chunks(127) {
        delta.push(chunk.len() as u8);
        delta.extend_from_slice(chunk);
    }
    delta
}

#[test]
fn decode_empty_pack() {
    let pack = pack_header(0);
    let decoded = decode_pack(&pack).unwrap();
    assert!(decoded.objects.is_empty());
    assert!(decoded.deltas.is_empty());
}

#[test]
fn decode_single_blob() {
    let mut pack = pack_header(1);
    pack.extend_from_slice(&whole_record(ObjectType::Blob, b"hello world\n"));

    let decoded = decode_pack(&pack).unwrap();
    assert_eq!(decoded.objects.len(), 1);
    assert!(decoded.deltas.is_empty());
    assert_eq!(decoded.objects[0].obj_type, ObjectType::Blob);
    assert_eq!(decoded.objects[0].data, b"hello world\n");
}

#[test]
fn decode_preserves_pack_order() {
    let mut pack = pack_header(3);
    pack.extend_from_slice(&whole_record(ObjectType::Commit, b"fake commit"));
    pack.extend_from_slice(&whole_record(ObjectType::Tree, b"fake tree"));
    pack.extend_from_slice(&whole_record(ObjectType::Blob, b"fake blob"));

    let decoded = decode_pack(&pack).unwrap();
    assert_eq!(decoded.objects.len(), 3);
    assert_eq!(decoded.objects[0].obj_type, ObjectType::Commit);
    assert_eq!(decoded.objects[1].obj_type, ObjectType::Tree);
    assert_eq!(decoded.objects[2].obj_type, ObjectType::Blob);
}

#[test]
fn decode_blob_and_ref_delta() {
    let base_content = b"base content";
    let base_id = Hasher::hash_object("blob", base_content).unwrap();

    let delta = insert_delta(base_content.len(), b"rebuilt");

    let mut pack = pack_header(2);
    pack.extend_from_slice(&whole_record(ObjectType::Blob, base_content));
    pack.extend_from_slice(&ref_delta_record(&base_id, &delta));

    let decoded = decode_pack(&pack).unwrap();
    assert_eq!(decoded.objects.len(), 1);
    assert_eq!(decoded.deltas.len(), 1);
    assert_eq!(decoded.deltas[0].base, base_id);

    let rebuilt = apply_delta(base_content, &decoded.deltas[0].data).unwrap();
    assert_eq!(rebuilt, b"rebuilt");
}

#[test]
fn decode_ignores_trailing_checksum() {
    let mut pack = pack_header(1);
    pack.extend_from_slice(&whole_record(ObjectType::Blob, b"data"));
    // Real packs end with a 20-byte SHA-1 of everything before it.
    pack.extend_from_slice(&[0xabu8; 20]);

    let decoded = decode_pack(&pack).unwrap();
    assert_eq!(decoded.objects.len(), 1);
    assert_eq!(decoded.objects[0].data, b"data");
}

#[test]
fn decode_large_object_with_multibyte_size() {
    let content = vec![0x42u8; 100_000];
    let mut pack = pack_header(1);
    pack.extend_from_slice(&whole_record(ObjectType::Blob, &content));

    let decoded = decode_pack(&pack).unwrap();
    assert_eq!(decoded.objects[0].data.len(), 100_000);
}

#[test]
fn rejects_bad_magic() {
    let mut pack = pack_header(0);
    pack[0] = b'K';
    let err = decode_pack(&pack).unwrap_err();
    assert!(matches!(err, PackError::InvalidHeader(_)));
}

#[test]
fn rejects_short_input() {
    let err = decode_pack(b"PACK").unwrap_err();
    assert!(matches!(err, PackError::InvalidHeader(_)));
}

#[test]
fn rejects_unsupported_version() {
    let mut pack = Vec::new();
    pack.extend_from_slice(b"PACK");
    pack.extend_from_slice(&3u32.to_be_bytes());
    pack.extend_from_slice(&0u32.to_be_bytes());

    let err = decode_pack(&pack).unwrap_err();
    assert!(matches!(err, PackError::UnsupportedVersion(3)));
}

#[test]
fn rejects_ofs_delta() {
    let mut pack = pack_header(1);
    pack.extend_from_slice(&encode_entry_header(6, 4));
    pack.push(0x01); // base offset
    pack.extend_from_slice(&deflate(b"dltx"));

    let err = decode_pack(&pack).unwrap_err();
    assert!(matches!(err, PackError::UnsupportedType { code: 6, .. }));
}

#[test]
fn rejects_invalid_type_code() {
    let mut pack = pack_header(1);
    pack.extend_from_slice(&encode_entry_header(5, 4));
    pack.extend_from_slice(&deflate(b"abcd"));

    let err = decode_pack(&pack).unwrap_err();
    assert!(matches!(err, PackError::InvalidType { code: 5, .. }));
}

#[test]
fn rejects_declared_size_mismatch() {
    let mut pack = pack_header(1);
    // Header says 10 bytes, stream holds 4.
    pack.extend_from_slice(&encode_entry_header(3, 10));
    pack.extend_from_slice(&deflate(b"abcd"));

    let err = decode_pack(&pack).unwrap_err();
    assert!(matches!(
        err,
        PackError::SizeMismatch {
            expected: 10,
            actual: 4,
            ..
        }
    ));
}

#[test]
fn rejects_runaway_size_varint() {
    // Entry header whose size field never fits in 64 bits: the decoder
    // must fail cleanly instead of overflowing the accumulator shift.
    let mut pack = pack_header(1);
    pack.push(0x80 | 0x35);
    pack.extend_from_slice(&[0x80; 10]);
    pack.push(0x00);

    let err = decode_pack(&pack).unwrap_err();
    assert!(matches!(err, PackError::CorruptEntry(_)));
}

#[test]
fn rejects_truncated_record() {
    let mut pack = pack_header(1);
    pack.extend_from_slice(&encode_entry_header(3, 4));
    let compressed = deflate(b"abcd");
    pack.extend_from_slice(&compressed[..compressed.len() / 2]);

    let err = decode_pack(&pack).unwrap_err();
    assert!(matches!(err, PackError::CorruptEntry(_)));
}

#[test]
fn rejects_missing_entries() {
    // Count claims 2 but only one record present.
    let mut pack = pack_header(2);
    pack.extend_from_slice(&whole_record(ObjectType::Blob, b"only one"));

    assert!(decode_pack(&pack).is_err());
}

#[test]
fn consecutive_streams_use_exact_compressed_lengths() {
    // Back-to-back records with no padding: the cursor must land exactly
    // on each next entry header.
    let contents: [&[u8]; 4] = [b"first", b"second object", b"", b"fourth"];
    let mut pack = pack_header(contents.len() as u32);
    for content in contents {
        pack.extend_from_slice(&whole_record(ObjectType::Blob, content));
    }

    let decoded = decode_pack(&pack).unwrap();
    assert_eq!(decoded.objects.len(), 4);
    for (obj, expected) in decoded.objects.iter().zip(contents) {
        assert_eq!(obj.data, expected);
    }
}
