//! Performance benchmarks for configly.
//!
//! Measures a full load against in-memory sources, how it scales with the number
//! of sources that have to be searched, and the cost of the text conversions.

use configly::core::{Kind, coerce, parse_duration, parse_tag};
use configly::prelude::*;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

#[derive(Debug, Default)]
struct BenchConfig {
    name: String,
    port: u16,
    workers: i64,
    ratio: f64,
    enabled: bool,
    timeout: Duration,
}

impl Configurable for BenchConfig {
    fn describe(schema: &mut Schema<Self>) {
        schema.field("name", |c| &mut c.name).tag("configly", "NAME,minLen=1,maxLen=64");
        schema.field("port", |c| &mut c.port).tag("configly", "PORT,min=1,max=65535");
        schema.field("workers", |c| &mut c.workers).tag("configly", "WORKERS,default=4");
        schema.field("ratio", |c| &mut c.ratio).tag("configly", "RATIO,default=0.5");
        schema.field("enabled", |c| &mut c.enabled).tag("configly", "ENABLED");
        schema.field("timeout", |c| &mut c.timeout).tag("configly", "TIMEOUT,default=1m30s");
    }
}

fn full_source(name: &str) -> MockSource {
    MockSource::new(name)
        .with_value("NAME", "benchmark")
        .with_value("PORT", "8080")
        .with_value("ENABLED", "true")
}

/// Benchmark a load where the first source has every value
fn benchmark_load(c: &mut Criterion) {
    let loader = Loader::builder()
        .with_source(full_source("bench"))
        .build::<BenchConfig>()
        .unwrap();

    let mut group = c.benchmark_group("load");
    group.bench_function("single_source", |b| {
        b.iter(|| black_box(loader.load().unwrap()));
    });
    group.finish();
}

/// Benchmark how lookups scale when values live in the last source
fn benchmark_source_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("source_depth");

    for depth in [1usize, 4, 16] {
        let mut builder = Loader::builder();
        for i in 0..depth - 1 {
            builder = builder.with_source(MockSource::new(format!("empty{}", i)));
        }
        let loader = builder
            .with_source(full_source("last"))
            .build::<BenchConfig>()
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(depth), &loader, |b, loader| {
            b.iter(|| black_box(loader.load().unwrap()));
        });
    }

    group.finish();
}

/// Benchmark tag parsing and text conversion
fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.bench_function("parse_tag", |b| {
        b.iter(|| black_box(parse_tag(black_box("PORT,required,default=8080,min=1,max=65535"))));
    });
    group.bench_function("coerce_u16", |b| {
        b.iter(|| black_box(coerce(Kind::U16, black_box("8080"))));
    });
    group.bench_function("parse_duration", |b| {
        b.iter(|| black_box(parse_duration(black_box("1h15m30.918273645s"))));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_load,
    benchmark_source_depth,
    benchmark_parsing,
);

criterion_main!(benches);
