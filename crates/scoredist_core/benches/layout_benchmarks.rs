//! Criterion benchmarks for the chart layout pass
//!
//! Run with: cargo bench -p scoredist_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use scoredist_core::layout::{PlotFrame, compute_layout};
use scoredist_core::model::{BucketId, DistributionSeries, DistributionSnapshot, PriceBar, SelectionContext};
use scoredist_core::ratio::{derive_ratios, ratio_stats};
use scoredist_core::selection::{DisplayMode, SelectionEvent, VisibilityState};

/// Deterministic series of `days` snapshots with a price on every date.
fn create_series(days: usize) -> DistributionSeries {
    let start = jiff::civil::date(2020, 1, 1);
    let snapshots = (0..days)
        .map(|i| {
            let wave = (i % 17) as u32;
            let mut snapshot = DistributionSnapshot::new(
                start.saturating_add(jiff::Span::new().days(i as i64)),
                [40 + wave, 90 - wave, 120, 95 + wave, 155 - wave],
            );
            snapshot.price = Some(PriceBar {
                close: Some(3_000.0 + (i as f64 * 0.1).sin() * 250.0),
                ..Default::default()
            });
            snapshot
        })
        .collect();
    DistributionSeries::new(snapshots, SelectionContext::default(), Some("SPY".into()), Vec::new())
}

fn bench_layout_by_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_layout");
    let frame = PlotFrame::default();
    let view = VisibilityState::default();

    for days in [21, 252, 1_260] {
        let series = create_series(days);
        group.bench_with_input(BenchmarkId::new("days", days), &series, |b, series| {
            b.iter(|| compute_layout(black_box(series), black_box(&view), &frame, Some(days / 2)))
        });
    }
    group.finish();
}

fn bench_layout_view_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_view");
    let frame = PlotFrame::default();
    let series = create_series(1_260);

    let count = VisibilityState::default().apply(SelectionEvent::SetDisplayMode(DisplayMode::Count));
    group.bench_function("count_mode", |b| {
        b.iter(|| compute_layout(black_box(&series), black_box(&count), &frame, None))
    });

    let hovered = VisibilityState::default().apply(SelectionEvent::SetHovered(Some(BucketId::From40To60)));
    group.bench_function("hovered", |b| {
        b.iter(|| compute_layout(black_box(&series), black_box(&hovered), &frame, None))
    });
    group.finish();
}

fn bench_ratios(c: &mut Criterion) {
    let series = create_series(1_260);

    c.bench_function("derive_ratios_5yr", |b| {
        b.iter(|| derive_ratios(black_box(series.snapshots())))
    });

    let points = derive_ratios(series.snapshots());
    c.bench_function("ratio_stats_5yr", |b| {
        b.iter(|| ratio_stats(black_box(&points), black_box(600)))
    });
}

criterion_group!(
    benches,
    bench_layout_by_length,
    bench_layout_view_variants,
    bench_ratios
);
criterion_main!(benches);
