//! Benchmarks for series assembly and chart rendering on a full-day grid.

use chrono::TimeZone;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chrono_tz::America::Los_Angeles;

use drivetime_core::assemble::assemble;
use drivetime_core::chart;
use drivetime_core::domain::TrafficModel;
use drivetime_core::engine::DurationTable;

/// 05:00-23:45 at 15-minute steps: 76 instants, 152 cells.
fn full_day_table() -> DurationTable {
    let mut table = DurationTable::new();
    for i in 0..76u32 {
        let minutes = 300 + i * 15;
        let departure = Los_Angeles
            .with_ymd_and_hms(2025, 6, 2, minutes / 60, minutes % 60, 0)
            .unwrap();
        // A smooth commute-shaped curve, no randomness needed.
        let base = 25.0 + 10.0 * ((i as f64) * 0.17).sin();
        table.record(departure, TrafficModel::Optimistic, (base * 10.0).round() / 10.0);
        table.record(
            departure,
            TrafficModel::Pessimistic,
            ((base + 8.0) * 10.0).round() / 10.0,
        );
    }
    table
}

fn bench_assemble(c: &mut Criterion) {
    let table = full_day_table();
    c.bench_function("assemble_full_day", |b| {
        b.iter(|| assemble(black_box(&table)).unwrap())
    });
}

fn bench_chart(c: &mut Criterion) {
    let assembled = assemble(&full_day_table()).unwrap();
    c.bench_function("render_chart_full_day", |b| {
        b.iter(|| chart::render(black_box(&assembled.points), chart::DEFAULT_HEIGHT))
    });
}

criterion_group!(benches, bench_assemble, bench_chart);
criterion_main!(benches);
