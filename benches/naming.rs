//! Benchmarks for cache-key derivation and argument classification.

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memostore::prelude::*;

/// Build a relevant-argument map with `n` entries of mixed shapes.
fn arg_map(n: usize) -> BTreeMap<String, ArgValue> {
    (0..n)
        .map(|i| {
            let value = match i % 3 {
                0 => ArgValue::from(i as i64),
                1 => ArgValue::from(format!("value-{}", i)),
                _ => ArgValue::from(vec![i as i64, (i + 1) as i64]),
            };
            (format!("arg_name_{}", i), value)
        })
        .collect()
}

fn bench_readable_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("name_for_args");
    let mut namer = Namer::new().with_max_length(4096);
    namer.configure_name("bench");

    for n in [1usize, 4, 8, 16] {
        let args = arg_map(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(namer.name_for_args(black_box(&args)).unwrap()));
        });
    }
    group.finish();
}

fn bench_abbreviated_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("name_for_args_abbreviated");
    let mut namer = Namer::new().with_abbreviation(true).with_max_length(4096);
    namer.configure_name("bench");

    for n in [1usize, 4, 8, 16] {
        let args = arg_map(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(namer.name_for_args(black_box(&args)).unwrap()));
        });
    }
    group.finish();
}

fn bench_bind_and_classify(c: &mut Criterion) {
    let signature = Signature::builder()
        .param("a")
        .param("b")
        .param_with_default("c", 3)
        .param_with_default("mode", "fast")
        .build()
        .unwrap();

    let call = CallArgs::new()
        .positional(1)
        .positional(vec![2, 3])
        .keyword("mode", "slow");

    c.bench_function("bind_and_classify", |b| {
        b.iter(|| {
            let bound = signature.bind(black_box(&call)).unwrap();
            black_box((bound.relevant(), bound.full()));
        });
    });
}

criterion_group!(
    benches,
    bench_readable_names,
    bench_abbreviated_names,
    bench_bind_and_classify
);
criterion_main!(benches);
