//! Benchmarks for viewport and selection transitions.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use xlgrid::{CellRange, Dimensions, EngineConfig, GridEngine, MergeTable};

fn engine() -> GridEngine {
    let mut engine = GridEngine::new(EngineConfig::default()).expect("valid config");
    engine.set_viewport_dimensions(1_920.0, 1_080.0);
    engine
}

/// Wheel scrolling through a fresh document
fn bench_scroll_by(c: &mut Criterion) {
    c.bench_function("scroll_by_wheel", |b| {
        let mut engine = engine();
        b.iter(|| {
            engine.scroll_by(black_box(0.0), black_box(120.0));
        })
    });
}

/// Alternating jumps to the far ends of the grid
fn bench_scroll_to_cell(c: &mut Criterion) {
    c.bench_function("scroll_to_cell_far_jump", |b| {
        let mut engine = engine();
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let row = if flip { 1_000_000 } else { 0 };
            engine.scroll_to_cell(black_box(row), black_box(0), false);
        })
    });
}

/// Arrow-key navigation with the visibility check on every step
fn bench_move_selection(c: &mut Criterion) {
    c.bench_function("move_selection_down", |b| {
        let mut engine = engine();
        engine.select_cell(0, 0);
        b.iter(|| {
            engine.move_selection(black_box(1), 0, false);
        })
    });
}

/// Offset lookup cost as the number of overrides grows
fn bench_offsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("x_of_with_overrides");

    for count in [0u32, 100, 10_000] {
        let widths: BTreeMap<u32, f64> = (0..count).map(|i| (i * 3, 140.0)).collect();
        let mut dims = Dimensions::new(100.0, 20.0);
        dims.set_all(&widths, &BTreeMap::new());

        group.bench_with_input(BenchmarkId::new("x_of", count), &dims, |b, dims| {
            b.iter(|| dims.x_of(black_box(16_000)))
        });
    }

    group.finish();
}

/// Shift-extend across a sheet full of merged regions
fn bench_merge_extension(c: &mut Criterion) {
    let merges: Vec<CellRange> = (0..500u32)
        .map(|i| CellRange::new(i * 4, 0, i * 4 + 1, 2))
        .collect();
    c.bench_function("extend_with_500_merges", |b| {
        let mut engine = engine().with_merge_lookup(MergeTable::new(merges.clone()));
        engine.select_cell(0, 0);
        b.iter(|| {
            engine.extend_selection(black_box(1_500), black_box(3));
        })
    });
}

criterion_group!(
    benches,
    bench_scroll_by,
    bench_scroll_to_cell,
    bench_move_selection,
    bench_offsets,
    bench_merge_extension,
);

criterion_main!(benches);
