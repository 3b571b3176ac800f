use std::io::Write;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use rgit_pack::delta::apply_delta;
use rgit_pack::entry::encode_entry_header;
use rgit_pack::{decode_pack, PACK_VERSION};

fn build_pack(blobs: &[Vec<u8>]) -> Vec<u8> {
    let mut pack = Vec::new();
    pack.extend_from_slice(b"PACK");
    pack.extend_from_slice(&PACK_VERSION.to_be_bytes());
    pack.extend_from_slice(&(blobs.len() as u32).to_be_bytes());
    for blob in blobs {
        pack.extend_from_slice(&encode_entry_header(3, blob.len() as u64));
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(blob).unwrap();
        pack.extend_from_slice(&encoder.finish().unwrap());
    }
    pack
}

fn bench_decode_pack(c: &mut Criterion) {
    let blobs: Vec<Vec<u8>> = (0..100)
        .map(|i| {
            (0..4096)
                .map(|j| ((i * 31 + j) % 256) as u8)
                .collect()
        })
        .collect();
    let pack = build_pack(&blobs);

    let mut group = c.benchmark_group("pack_decode");
    group.throughput(Throughput::Bytes(pack.len() as u64));
    group.bench_function("decode_100x4k", |b| {
        b.iter(|| {
            decode_pack(&pack).unwrap();
        });
    });
    group.finish();
}

fn bench_delta_apply(c: &mut Criterion) {
    let base: Vec<u8> = (0..65536).map(|i| (i % 256) as u8).collect();

    // Delta: copy the whole 64k base in one instruction, then insert a tail.
    let mut delta = Vec::new();
    for mut value in [base.len(), base.len() + 4] {
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
    delta.push(0x80); // copy, offset 0, size 0 => 0x10000
    delta.extend_from_slice(&[4, b't', b'a', b'i', b'l']);

    c.bench_function("delta_apply_64k", |b| {
        b.iter(|| {
            apply_delta(&base, &delta).unwrap();
        });
    });
}

criterion_group!(benches, bench_decode_pack, bench_delta_apply);
criterion_main!(benches);
