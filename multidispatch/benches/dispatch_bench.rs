//! Dispatch benchmarks using criterion.
//!
//! Compares cached and uncached invocation across hierarchy depths, and
//! measures the cost of registration with its cache invalidation.
//!
//! Run with: cargo bench --bench dispatch_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use multidispatch::{
    BinaryFunction, DispatchConfig, Tagged, TypeHierarchy, TypeTag, UnaryFunction,
};

type Value = Tagged<u64>;

/// A linear chain `T0 <: ... <: T(depth-1)`, most general first.
fn chain(depth: usize) -> Vec<TypeTag> {
    let mut h = TypeHierarchy::new();
    let mut tags: Vec<TypeTag> = Vec::with_capacity(depth);
    for i in 0..depth {
        let tag = match tags.last().cloned() {
            Some(parent) => h.define(format!("T{}", i), &[&parent]),
            None => h.define(format!("T{}", i), &[]),
        };
        tags.push(tag.expect("fresh hierarchy"));
    }
    tags
}

/// One inner method per level, ending in a leaf at the root.
fn chained_function(tags: &[TypeTag], config: DispatchConfig) -> UnaryFunction<Value, u64> {
    let f = UnaryFunction::with_config("depth", config);
    f.add_leaf([tags[0].clone()], |args| args[0].value).unwrap();
    for tag in &tags[1..] {
        f.add_inner([tag.clone()], |next, _| Ok(next.call()? + 1))
            .unwrap();
    }
    f
}

fn bench_unary_invoke(c: &mut Criterion) {
    let mut group = c.benchmark_group("unary_invoke");
    group.throughput(Throughput::Elements(1));

    for depth in [1usize, 4, 16] {
        let tags = chain(depth);
        let arg = [Tagged::new(&tags[depth - 1], 0)];

        let cached = chained_function(&tags, DispatchConfig::default());
        group.bench_with_input(BenchmarkId::new("cached", depth), &arg, |b, arg| {
            b.iter(|| black_box(cached.invoke(black_box(arg)).unwrap()))
        });

        let uncached = chained_function(&tags, DispatchConfig::default().without_cache());
        group.bench_with_input(BenchmarkId::new("uncached", depth), &arg, |b, arg| {
            b.iter(|| black_box(uncached.invoke(black_box(arg)).unwrap()))
        });
    }

    group.finish();
}

fn bench_binary_invoke(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_invoke");
    let tags = chain(8);

    let f: BinaryFunction<Value, u64> = BinaryFunction::new("pair");
    for left in &tags {
        for right in &tags {
            f.add_leaf([left.clone(), right.clone()], |args| {
                args[0].value + args[1].value
            })
            .unwrap();
        }
    }

    let args = [Tagged::new(&tags[7], 1), Tagged::new(&tags[3], 2)];
    group.bench_function("cached_64_methods", |b| {
        b.iter(|| black_box(f.invoke(black_box(&args)).unwrap()))
    });

    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");
    let tags = chain(32);

    group.bench_function("register_32_after_warm_cache", |b| {
        b.iter(|| {
            let f: UnaryFunction<Value, u64> = UnaryFunction::new("grow");
            f.add_leaf([tags[0].clone()], |_| 0).unwrap();
            for tag in &tags {
                black_box(f.invoke(&[Tagged::new(tag, 0)]).unwrap());
            }
            for tag in &tags[1..] {
                f.add_leaf([tag.clone()], |_| 1).unwrap();
            }
            black_box(f.cached_signatures())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_unary_invoke,
    bench_binary_invoke,
    bench_registration,
);
criterion_main!(benches);
