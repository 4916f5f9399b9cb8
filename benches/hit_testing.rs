//! Benchmarks for coordinate lookups and view building.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scigrid::filter::{ColumnFilter, FilterEngine, FilterOperator, SortState, ViewSpec};
use scigrid::layout::{ColumnLayout, ScrollBridge};
use scigrid::{SortOrder, VecProvider};

/// Binary search for the column under x across layout sizes
fn bench_column_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_at");
    for count in [100_usize, 10_000, 100_000] {
        let layout = ColumnLayout::new(count, 100.0);
        let total = layout.total_width();
        group.bench_with_input(BenchmarkId::from_parameter(count), &layout, |b, layout| {
            let mut x = 0.0;
            b.iter(|| {
                x = (x + 7_919.0) % total;
                layout.column_at(black_box(x))
            })
        });
    }
    group.finish();
}

/// Rebuilding offsets after a column move
fn bench_move_column(c: &mut Criterion) {
    let mut layout = ColumnLayout::new(10_000, 100.0);
    c.bench_function("move_column_10k", |b| {
        b.iter(|| layout.move_column(black_box(0), black_box(9_999)))
    });
}

/// Native scroll mapping on a capped axis
fn bench_scroll_mapping(c: &mut Criterion) {
    let mut bridge = ScrollBridge::new();
    bridge.update_virtual_size(1_000_000.0, 1e9, 1200.0, 800.0);
    let mut top = 0.0;
    c.bench_function("on_native_scroll", |b| {
        b.iter(|| {
            top = (top + 137.0) % 14_000_000.0;
            bridge.on_native_scroll(black_box(0.0), black_box(top))
        })
    });
}

/// Filter plus sort over a numeric table
fn bench_build_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_view");
    let engine = FilterEngine::new();
    let spec = ViewSpec {
        filters: vec![ColumnFilter::new(1, FilterOperator::Gt, 250.0)],
        sorts: vec![SortState {
            col: 2,
            order: SortOrder::Desc,
        }],
        ..ViewSpec::default()
    };

    for rows in [1_000_usize, 100_000] {
        let provider =
            VecProvider::from_fn(rows, 4, |r, c| f64::from((r * 31 + c * 17) % 1000));
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &provider, |b, provider| {
            b.iter(|| engine.build_view(black_box(provider), &spec))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_column_at,
    bench_move_column,
    bench_scroll_mapping,
    bench_build_view,
);

criterion_main!(benches);
