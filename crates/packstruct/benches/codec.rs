// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record Codec Benchmark
//!
//! Measures decode, encode and representation round trips for:
//! - a small flat record (Point)
//! - a record with an embedded array of records in the other byte order (Shape)
//! - a larger sample buffer of 64 records in one array

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use packstruct::{parse_record, ByteOrder, FieldDescriptor, Record, RecordType, TypeRegistry};
use std::sync::Arc;

fn point_type() -> Arc<RecordType> {
    RecordType::builder("Point")
        .field("x", FieldDescriptor::named("int16").expect("int16"))
        .field("y", FieldDescriptor::named("int16").expect("int16"))
        .build()
        .expect("Point")
}

fn shape_type(point: &Arc<RecordType>, count: usize) -> Arc<RecordType> {
    RecordType::builder("Shape")
        .byte_order(ByteOrder::Big)
        .field("name", FieldDescriptor::named("string").and_then(|f| f.repeat(8)).expect("name"))
        .field("numpoints", FieldDescriptor::named("int32").expect("int32"))
        .field(
            "points",
            FieldDescriptor::embedded(point.clone())
                .repeat(count)
                .expect("points"),
        )
        .build()
        .expect("Shape")
}

fn sample_buffer(size: usize) -> Vec<u8> {
    let mut rng = fastrand::Rng::with_seed(42);
    (0..size).map(|_| rng.u8(..)).collect()
}

fn bench_decode(c: &mut Criterion) {
    let point = point_type();
    let mut group = c.benchmark_group("decode");

    for count in [4usize, 64] {
        let shape = shape_type(&point, count);
        let buf = sample_buffer(shape.size());
        group.throughput(Throughput::Bytes(buf.len() as u64));
        group.bench_with_input(BenchmarkId::new("shape", count), &buf, |b, buf| {
            b.iter(|| Record::from_bytes(&shape, black_box(buf)).expect("decode"));
        });
    }

    let buf = sample_buffer(point.size());
    group.bench_function("point", |b| {
        b.iter(|| Record::from_bytes(&point, black_box(&buf)).expect("decode"));
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let point = point_type();
    let mut group = c.benchmark_group("encode");

    for count in [4usize, 64] {
        let shape = shape_type(&point, count);
        let record = Record::from_bytes(&shape, &sample_buffer(shape.size())).expect("decode");
        group.throughput(Throughput::Bytes(shape.size() as u64));
        group.bench_with_input(BenchmarkId::new("shape", count), &record, |b, record| {
            b.iter(|| black_box(record).to_bytes().expect("encode"));
        });
    }

    group.finish();
}

fn bench_repr(c: &mut Criterion) {
    let point = point_type();
    let shape = shape_type(&point, 4);
    let record = Record::from_bytes(&shape, &sample_buffer(shape.size())).expect("decode");
    let registry: TypeRegistry = [shape].into_iter().collect();
    let text = record.repr();

    c.bench_function("repr_format", |b| b.iter(|| black_box(&record).repr()));
    c.bench_function("repr_parse", |b| {
        b.iter(|| parse_record(black_box(&text), &registry).expect("parse"));
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_repr);
criterion_main!(benches);
