//! Criterion micro-benchmarks for the advection kernels and CFL reduction.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strato_bench::{build, reference_profile, stress_profile};

fn bench_exec(c: &mut Criterion) {
    let mut group = c.benchmark_group("advec_exec");
    for (label, profile) in [("reference", reference_profile()), ("stress", stress_profile())] {
        let (grid, mut fields, advec) = build(&profile, 42);
        group.bench_function(label, |b| {
            b.iter(|| {
                fields.reset_tendencies();
                advec.exec(black_box(&mut fields), &grid);
            });
        });
    }
    group.finish();
}

fn bench_cfl(c: &mut Criterion) {
    let (grid, fields, advec) = build(&reference_profile(), 42);

    c.bench_function("advec_get_cfl_reference", |b| {
        b.iter(|| black_box(advec.get_cfl(black_box(&fields), &grid, 0.5)));
    });

    c.bench_function("advec_get_time_limit_reference", |b| {
        b.iter(|| black_box(advec.get_time_limit(black_box(&fields), &grid, 1000, 0.5)));
    });
}

fn bench_diagnostics(c: &mut Criterion) {
    let (grid, fields, _) = build(&reference_profile(), 42);

    c.bench_function("fields_check_tke_reference", |b| {
        b.iter(|| black_box(fields.check_tke(&grid)));
    });
}

criterion_group!(benches, bench_exec, bench_cfl, bench_diagnostics);
criterion_main!(benches);
