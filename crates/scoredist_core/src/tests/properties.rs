//! Tests for engine-wide guarantees
//!
//! These tests verify:
//! - Stacked percentages never exceed 100% and shrink when buckets are hidden
//! - Layout is a pure function of view state
//! - Hiding and restoring all buckets restores the geometry
//! - Ratio zero-division policy
//! - Missing breakdowns project to an empty list

use super::series_of;
use crate::breakdown::{breakdown_view, project};
use crate::layout::{PlotFrame, compute_layout, stack_values};
use crate::model::{BucketId, DistributionSnapshot};
use crate::ratio::{RatioPoint, SENTINEL_RATIO};
use crate::selection::{DisplayMode, SelectionEvent, VisibilityState};

const COUNTS: [[u32; 5]; 6] = [
    [10, 20, 30, 25, 15],
    [0, 0, 0, 0, 0],
    [100, 0, 0, 0, 1],
    [3, 3, 3, 3, 3],
    [0, 7, 0, 9, 0],
    [40, 30, 20, 7, 3],
];

fn top_of_stack(view: &VisibilityState) -> Vec<f64> {
    let stacks = stack_values(&super::daily(&COUNTS), view);
    (0..COUNTS.len())
        .map(|i| stacks.last().map_or(0.0, |s| s.bands[i].upper))
        .collect()
}

#[test]
fn test_all_visible_percentages_at_most_100() {
    for top in top_of_stack(&VisibilityState::default()) {
        assert!(top <= 100.0 + 1e-9, "stack reached {top}");
    }
}

#[test]
fn test_percentages_with_short_total_stay_bounded() {
    let mut snapshot = DistributionSnapshot::new(jiff::civil::date(2024, 1, 1), [10, 10, 10, 10, 10]);
    snapshot.total_constituents = 20;
    let stacks = stack_values(&[snapshot], &VisibilityState::default());
    let top = stacks.last().unwrap().bands[0].upper;
    assert!(top <= 100.0 + 1e-9);
}

#[test]
fn test_visible_subset_never_exceeds_all_visible() {
    let all = top_of_stack(&VisibilityState::default());
    for mask in 0u8..32 {
        let mut view = VisibilityState::default().apply(SelectionEvent::ToggleAll(false));
        for bucket in BucketId::ALL {
            if mask & (1 << bucket.index()) != 0 {
                view = view.apply(SelectionEvent::ToggleBucket(bucket));
            }
        }
        for (subset, full) in top_of_stack(&view).iter().zip(&all) {
            assert!(subset <= full, "mask {mask:05b}: {subset} > {full}");
        }
    }
}

#[test]
fn test_display_mode_round_trip_is_identical() {
    let series = series_of(&COUNTS);
    let frame = PlotFrame::default();
    let view = VisibilityState::default().apply(SelectionEvent::SetHovered(Some(BucketId::From40To60)));
    let before = compute_layout(&series, &view, &frame, Some(3));

    let round_trip = view
        .apply(SelectionEvent::SetDisplayMode(DisplayMode::Count))
        .apply(SelectionEvent::SetDisplayMode(DisplayMode::Percentage));
    let after = compute_layout(&series, &round_trip, &frame, Some(3));
    assert_eq!(before, after);
}

#[test]
fn test_hide_all_then_show_all_restores_layers() {
    let series = series_of(&COUNTS);
    let frame = PlotFrame::default();
    let view = VisibilityState::default();
    let before = compute_layout(&series, &view, &frame, None);

    let hidden = view.apply(SelectionEvent::ToggleAll(false));
    let empty = compute_layout(&series, &hidden, &frame, None);
    assert!(empty.layers.is_empty());

    let restored = compute_layout(&series, &hidden.apply(SelectionEvent::ToggleAll(true)), &frame, None);
    assert_eq!(before.layers, restored.layers);
}

#[test]
fn test_ratio_sentinel_policy() {
    let point = |counts| RatioPoint::from_snapshot(&DistributionSnapshot::new(jiff::civil::date(2024, 1, 1), counts));
    assert_eq!(point([0, 0, 0, 0, 0]).ratio, 0.0);
    assert_eq!(point([0, 0, 0, 5, 0]).ratio, SENTINEL_RATIO);
    assert_eq!(point([4, 3, 3, 10, 20]).ratio, 3.0);
}

#[test]
fn test_breakdown_without_symbols_is_empty_with_zero_listed() {
    let series = series_of(&COUNTS);
    for bucket in BucketId::ALL {
        assert!(project(&series, 0, bucket).is_empty());
    }
    let view = breakdown_view(&series, 1, BucketId::From0To20);
    assert!(view.rows.is_empty());
    assert_eq!(view.listed(), 0);
    assert_eq!(view.bucket_count, 0);
}
