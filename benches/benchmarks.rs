// benches/benchmarks.rs
// Micro-benchmarks on the codec itself: scalar writes and reads, the
// variable-length size encoding, and composite shapes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gfstream::*;
use std::collections::BTreeMap;

// Test data generation utilities
fn create_entities(count: usize) -> Vec<(String, (f32, f32), u64)> {
    (0..count)
        .map(|i| {
            (
                format!("entity_{i}"),
                (i as f32 * 1.5, i as f32 * -0.5),
                i as u64,
            )
        })
        .collect()
}

fn create_property_map(count: usize) -> BTreeMap<String, i64> {
    (0..count)
        .map(|i| (format!("property_{i}"), i as i64 * 31))
        .collect()
}

fn encode_to_vec<T: Encode>(value: &T) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut output = BufferOutputStream::new(&mut buffer);
    let mut serializer = Serializer::new(&mut output).unwrap();
    serializer.encode(value).unwrap();
    drop(serializer);
    drop(output);
    buffer
}

const ENTITY_COUNT: usize = 1000;
const PROPERTY_COUNT: usize = 500;

// === SCALAR AND SIZE CODEC ===

fn bench_scalar_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_codec");
    group.throughput(Throughput::Bytes(8 * 10_000));

    group.bench_function("write_10k_u64", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(8 * 10_000 + 4);
            let mut output = BufferOutputStream::new(&mut buffer);
            let mut serializer = Serializer::new(&mut output).unwrap();
            for i in 0..10_000u64 {
                serializer.write_u64(i).unwrap();
            }
            drop(serializer);
            drop(output);
            black_box(buffer);
        });
    });

    let archive = {
        let mut buffer = Vec::new();
        let mut output = BufferOutputStream::new(&mut buffer);
        let mut serializer = Serializer::new(&mut output).unwrap();
        for i in 0..10_000u64 {
            serializer.write_u64(i).unwrap();
        }
        drop(serializer);
        drop(output);
        buffer
    };

    group.bench_function("read_10k_u64", |b| {
        b.iter(|| {
            let mut input = SliceInputStream::new(&archive);
            let mut deserializer = Deserializer::new(&mut input).unwrap();
            let mut sum = 0u64;
            for _ in 0..10_000 {
                sum = sum.wrapping_add(deserializer.read_u64().unwrap());
            }
            black_box(sum);
        });
    });

    group.finish();
}

fn bench_size_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("size_codec");

    // One value per tier, so every branch gets exercised.
    let values: Vec<u64> = vec![
        0x42,
        0x1234,
        0x12_3456,
        0x1234_5678,
        0x12_3456_789A,
        0x1234_5678_9ABC,
        0x12_3456_789A_BCDE,
        u64::MAX / 2,
    ];

    group.bench_function("write_all_tiers", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(128);
            let mut output = BufferOutputStream::new(&mut buffer);
            for &value in &values {
                size::write(&mut output, value).unwrap();
            }
            black_box(buffer);
        });
    });

    let encoded = {
        let mut buffer = Vec::new();
        let mut output = BufferOutputStream::new(&mut buffer);
        for &value in &values {
            size::write(&mut output, value).unwrap();
        }
        drop(output);
        buffer
    };

    group.bench_function("read_all_tiers", |b| {
        b.iter(|| {
            let mut input = SliceInputStream::new(&encoded);
            for _ in 0..values.len() {
                black_box(size::read(&mut input).unwrap());
            }
        });
    });

    group.finish();
}

// === COMPOSITE SHAPES ===

fn bench_composites(c: &mut Criterion) {
    let mut group = c.benchmark_group("composites");

    let entities = create_entities(ENTITY_COUNT);
    let entity_archive = encode_to_vec(&entities);
    group.throughput(Throughput::Bytes(entity_archive.len() as u64));

    group.bench_with_input(
        BenchmarkId::new("encode_entities", ENTITY_COUNT),
        &entities,
        |b, entities| {
            b.iter(|| black_box(encode_to_vec(entities)));
        },
    );

    group.bench_with_input(
        BenchmarkId::new("decode_entities", ENTITY_COUNT),
        &entity_archive,
        |b, archive| {
            b.iter(|| {
                let mut input = SliceInputStream::new(archive);
                let mut deserializer = Deserializer::new(&mut input).unwrap();
                let decoded: Vec<(String, (f32, f32), u64)> =
                    deserializer.decode().unwrap();
                black_box(decoded);
            });
        },
    );

    let properties = create_property_map(PROPERTY_COUNT);
    let property_archive = encode_to_vec(&properties);

    group.bench_with_input(
        BenchmarkId::new("encode_property_map", PROPERTY_COUNT),
        &properties,
        |b, properties| {
            b.iter(|| black_box(encode_to_vec(properties)));
        },
    );

    group.bench_with_input(
        BenchmarkId::new("decode_property_map", PROPERTY_COUNT),
        &property_archive,
        |b, archive| {
            b.iter(|| {
                let mut input = SliceInputStream::new(archive);
                let mut deserializer = Deserializer::new(&mut input).unwrap();
                let decoded: BTreeMap<String, i64> = deserializer.decode().unwrap();
                black_box(decoded);
            });
        },
    );

    group.finish();
}

// === STRING PATHS ===

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");

    for len in [16usize, 256, 4096] {
        let text = "g".repeat(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("roundtrip", len), &text, |b, text| {
            b.iter(|| {
                let archive = encode_to_vec(text);
                let mut input = SliceInputStream::new(&archive);
                let mut deserializer = Deserializer::new(&mut input).unwrap();
                black_box(deserializer.read_string().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_scalar_writes,
    bench_size_codec,
    bench_composites,
    bench_strings
);
criterion_main!(benches);
