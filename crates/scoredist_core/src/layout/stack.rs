//! Cumulative stacking of visible buckets.
//!
//! Layer order is fixed (lowest score range at the bottom). Hidden buckets
//! are skipped entirely, so the next visible bucket sits directly on the
//! previous visible one rather than leaving a zero-height gap.

use super::PlotFrame;
use super::scale::LinearScale;
use crate::model::{BucketId, DistributionSnapshot};
use crate::selection::{DisplayMode, VisibilityState};

const LAYER_OPACITY: f32 = 0.6;
const HOVERED_OPACITY: f32 = 0.9;
const DIMMED_OPACITY: f32 = 0.35;
const STROKE_WIDTH: f32 = 1.0;
const HOVERED_STROKE_WIDTH: f32 = 2.5;

/// One bucket's band at one time index, in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackBand {
    pub lower: f64,
    pub upper: f64,
}

/// Bands of one visible bucket across the series.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStack {
    pub bucket: BucketId,
    pub bands: Vec<StackBand>,
}

/// Bucket value in display units: percent of constituents, or raw count.
#[must_use]
pub fn display_value(snapshot: &DistributionSnapshot, bucket: BucketId, mode: DisplayMode) -> f64 {
    match mode {
        DisplayMode::Percentage => snapshot.share(bucket),
        DisplayMode::Count => f64::from(snapshot.count(bucket)),
    }
}

/// Stack the visible buckets of every snapshot.
pub fn stack_values(snapshots: &[DistributionSnapshot], view: &VisibilityState) -> Vec<BucketStack> {
    let mut running = vec![0.0; snapshots.len()];

    view.visible_buckets()
        .map(|bucket| {
            let bands = snapshots
                .iter()
                .zip(running.iter_mut())
                .map(|(snapshot, cumulative)| {
                    let lower = *cumulative;
                    *cumulative += display_value(snapshot, bucket, view.mode);
                    StackBand {
                        lower,
                        upper: *cumulative,
                    }
                })
                .collect();
            BucketStack { bucket, bands }
        })
        .collect()
}

/// Pixel-space polygon for one visible bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedLayer {
    pub bucket: BucketId,
    /// Upper edge, left to right.
    pub top: Vec<(f64, f64)>,
    /// Lower edge, left to right.
    pub bottom: Vec<(f64, f64)>,
    pub highlighted: bool,
    pub opacity: f32,
    pub stroke_width: f32,
}

impl StackedLayer {
    /// Closed outline: top edge forward, bottom edge backward.
    #[must_use]
    pub fn polygon(&self) -> Vec<(f64, f64)> {
        self.top
            .iter()
            .copied()
            .chain(self.bottom.iter().rev().copied())
            .collect()
    }
}

/// Map stacks to pixels. Nothing is produced for fewer than two points.
pub(crate) fn layers(
    stacks: &[BucketStack],
    frame: &PlotFrame,
    y_scale: &LinearScale,
    hovered: Option<BucketId>,
) -> Vec<StackedLayer> {
    stacks
        .iter()
        .filter(|stack| stack.bands.len() >= 2)
        .map(|stack| {
            let n = stack.bands.len();
            let edge = |pick: fn(&StackBand) -> f64| -> Vec<(f64, f64)> {
                stack
                    .bands
                    .iter()
                    .enumerate()
                    .map(|(i, band)| (frame.time_x(i, n), y_scale.map(pick(band))))
                    .collect()
            };
            let highlighted = hovered == Some(stack.bucket);
            let opacity = match hovered {
                None => LAYER_OPACITY,
                Some(_) if highlighted => HOVERED_OPACITY,
                Some(_) => DIMMED_OPACITY,
            };
            StackedLayer {
                bucket: stack.bucket,
                top: edge(|b| b.upper),
                bottom: edge(|b| b.lower),
                highlighted,
                opacity,
                stroke_width: if highlighted {
                    HOVERED_STROKE_WIDTH
                } else {
                    STROKE_WIDTH
                },
            }
        })
        .collect()
}
