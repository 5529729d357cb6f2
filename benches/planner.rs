//! Curve lookup and full plan evaluation benchmarks.
//!
//! The planner is called on every slider movement, so both paths should stay
//! well under a microsecond.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use glidepath::{AssetClass, HoldingsSnapshot, Planner, RiskLevel, target_allocation};

fn sample_holdings() -> HoldingsSnapshot {
    HoldingsSnapshot::new()
        .with(AssetClass::Stablecoin, 12_500.0)
        .with(AssetClass::Bitcoin, 8_200.5)
        .with(AssetClass::LargeCapAlt, 3_100.25)
        .with(AssetClass::MidCapAlt, 950.0)
        .with(AssetClass::SmallCapAlt, 410.75)
}

fn bench_curve(c: &mut Criterion) {
    c.bench_function("target_allocation", |b| {
        b.iter(|| {
            for level in 1..=10 {
                black_box(target_allocation(black_box(level)));
            }
        })
    });
}

fn bench_plan(c: &mut Criterion) {
    let holdings = sample_holdings();
    let mut group = c.benchmark_group("plan");
    for tol in [0.0, 1.0, 5.0] {
        let planner = Planner::new(tol).expect("valid tolerance");
        group.bench_with_input(BenchmarkId::from_parameter(tol), &planner, |b, planner| {
            b.iter(|| {
                for level in RiskLevel::all() {
                    black_box(planner.plan(level, black_box(&holdings)).expect("plan"));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_curve, bench_plan);
criterion_main!(benches);
