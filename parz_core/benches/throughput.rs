//! Engine throughput over the bundled codecs, on compressible text and on
//! shuffled structured data.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use parz_codecs::{DeflateCodec, Lz4Codec, ZstdCodec};
use parz_core::{compress, uncompress, BlockCodec, Compression};

const INPUT_SIZE: usize = 1 << 20;

fn text_data() -> Vec<u8> {
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    pattern
        .iter()
        .cycle()
        .take(INPUT_SIZE)
        .copied()
        .collect()
}

fn int32_data() -> Vec<u8> {
    (0..(INPUT_SIZE / 4) as u32)
        .flat_map(|i| (i.wrapping_mul(7)).to_le_bytes())
        .collect()
}

fn codecs() -> [(&'static str, Box<dyn BlockCodec>); 3] {
    [
        ("deflate", Box::new(DeflateCodec)),
        ("lz4", Box::new(Lz4Codec)),
        ("zstd", Box::new(ZstdCodec)),
    ]
}

fn bench_compress(c: &mut Criterion) {
    let data = text_data();
    let config = Compression::default();

    let mut group = c.benchmark_group("compress");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for (name, codec) in codecs() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| compress(codec.as_ref(), &config, data, None).unwrap());
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let data = text_data();
    let config = Compression::default();

    let mut group = c.benchmark_group("decompress");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for (name, codec) in codecs() {
        let subblocks = compress(codec.as_ref(), &config, &data, None).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &subblocks,
            |b, subblocks| {
                let mut out = vec![0u8; data.len()];
                b.iter(|| uncompress(codec.as_ref(), &config, &mut out, subblocks, None).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_shuffled_compress(c: &mut Criterion) {
    let data = int32_data();
    let config = Compression {
        byte_shuffling: true,
        item_size: 4,
        ..Compression::default()
    };

    let mut group = c.benchmark_group("compress_shuffled_int32");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for (name, codec) in codecs() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| compress(codec.as_ref(), &config, data, None).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compress,
    bench_decompress,
    bench_shuffled_compress
);
criterion_main!(benches);
