//! Benchmarks for content type resolution.

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId, Throughput};
use s3_put_stage::utils::content_type::{resolve_content_type, sniff_content_type};

/// Benchmark extension lookup against sniffing for the same content
fn bench_resolution_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_type_resolution");
    let content = vec![b'a'; 64 * 1024];

    group.bench_function("by_extension", |b| {
        b.iter(|| resolve_content_type(black_box("assets/app.js"), black_box(&content)))
    });

    group.bench_function("by_sniffing", |b| {
        b.iter(|| resolve_content_type(black_box("assets/LICENSE"), black_box(&content)))
    });

    group.finish();
}

/// Benchmark sniffing for different content sizes; only the head is inspected
fn bench_sniff_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sniff_sizes");

    let sizes = vec![
        (64, "64B"),
        (512, "512B"),
        (1024 * 1024, "1MB"),
    ];

    for (size, name) in sizes {
        let data = vec![b'x'; size];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("sniff_content_type", name),
            &data,
            |b, data| {
                b.iter(|| sniff_content_type(black_box(data)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_resolution_paths, bench_sniff_sizes);
criterion_main!(benches);
