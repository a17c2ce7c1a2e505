//! Benchmarks for the sort, filter and recompute paths.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use progrid::filter::QuickFilter;
use progrid::sort::SortEngine;
use progrid::{ColumnDef, ColumnType, GridOptions, GridState, Row, SortItem};
use serde_json::json;

const CITIES: [&str; 5] = ["Berlin", "Lisbon", "New York", "Osaka", "Zurich"];

fn generate_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("user {}", (i * 7919) % count),
                "age": 18 + (i * 31) % 60,
                "city": CITIES[i % CITIES.len()],
                "active": i % 3 != 0,
                "joined": format!("2020-{:02}-{:02}", 1 + i % 12, 1 + i % 28),
            })
            .as_object()
            .cloned()
            .unwrap()
        })
        .collect()
}

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("id").with_type(ColumnType::Number).sortable(),
        ColumnDef::new("name").sortable(),
        ColumnDef::new("age").with_type(ColumnType::Number).sortable(),
        ColumnDef::new("city").sortable(),
        ColumnDef::new("active").with_type(ColumnType::Boolean),
        ColumnDef::new("joined").with_type(ColumnType::Date).sortable(),
    ]
}

/// Multi-column sort over growing row counts
fn bench_sort(c: &mut Criterion) {
    let cols = columns();
    let model = vec![SortItem::asc("city"), SortItem::desc("age"), SortItem::asc("name")];
    let mut group = c.benchmark_group("sort");
    for size in [1_000usize, 10_000, 100_000] {
        let rows = generate_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| SortEngine::sort_indices(black_box(rows), &model, &cols))
        });
    }
    group.finish();
}

/// Natural text sort, the most expensive comparator
fn bench_text_sort(c: &mut Criterion) {
    let cols = columns();
    let rows = generate_rows(10_000);
    let model = vec![SortItem::asc("name")];
    c.bench_function("sort_text_10k", |b| {
        b.iter(|| SortEngine::sort_indices(black_box(&rows), &model, &cols))
    });
}

/// Quick filter with a warm matcher cache
fn bench_quick_filter(c: &mut Criterion) {
    let cols = columns();
    let mut group = c.benchmark_group("quick_filter");
    for size in [1_000usize, 10_000, 100_000] {
        let rows = generate_rows(size);
        let mut quick = QuickFilter::new();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| quick.filter(black_box(rows), &cols, "user york").len())
        });
    }
    group.finish();
}

/// Full filter, sort, paginate, virtualize recompute through the orchestrator
fn bench_recompute(c: &mut Criterion) {
    let mut grid = GridState::new(GridOptions {
        pagination: true,
        page_size: 100,
        ..GridOptions::default()
    });
    grid.set_columns(&columns());
    grid.set_rows(generate_rows(50_000));
    grid.set_quick_filter("lisbon");
    grid.set_sort_model(vec![SortItem::desc("joined"), SortItem::asc("id")]);

    c.bench_function("recompute_50k", |b| b.iter(|| grid.recompute()));
}

/// Scrolling only moves the visible window
fn bench_scroll(c: &mut Criterion) {
    let mut grid = GridState::new(GridOptions::default());
    grid.set_columns(&columns());
    grid.set_rows(generate_rows(100_000));
    let max = grid.scroller().max_scroll_top();

    c.bench_function("scroll_100k", |b| {
        let mut top = 0.0;
        b.iter(|| {
            top = (top + 977.0) % max;
            grid.set_scroll_top(black_box(top));
            grid.visible_range()
        })
    });
}

criterion_group!(
    benches,
    bench_sort,
    bench_text_sort,
    bench_quick_filter,
    bench_recompute,
    bench_scroll
);
criterion_main!(benches);
