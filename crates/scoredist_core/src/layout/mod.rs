//! Scaling and layout of the stacked distribution chart.
//!
//! Everything is computed in a fixed logical canvas (pixels, y grows
//! downward) and is a pure function of the series, the view state and the
//! current index: the same inputs always produce the same [`ChartLayout`].
//!
//! - `scale` - Linear value-to-pixel maps and round grid steps
//! - `stack` - Cumulative layers of the visible buckets
//! - `axis` - Date ticks and value grid lines
//! - `overlay` - Independently scaled price line

mod axis;
mod overlay;
mod scale;
mod stack;

pub use axis::{GridLine, X_TICK_TARGET, XTick, x_ticks, y_grid};
pub use overlay::{PriceOverlay, price_overlay};
pub use scale::{LinearScale, nice_step};
pub use stack::{BucketStack, StackBand, StackedLayer, display_value, stack_values};

use serde::{Deserialize, Serialize};

use crate::model::{BucketId, DistributionSeries};
use crate::selection::{DisplayMode, VisibilityState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 400.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 60.0,
            bottom: 40.0,
            left: 60.0,
        }
    }
}

/// Canvas plus margins; the plot area is what the margins leave over.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotFrame {
    pub canvas: CanvasSize,
    pub margins: Margins,
}

impl PlotFrame {
    pub fn new(canvas: CanvasSize, margins: Margins) -> Self {
        Self { canvas, margins }
    }

    pub fn left(&self) -> f64 {
        self.margins.left
    }

    pub fn right(&self) -> f64 {
        self.left() + self.plot_width()
    }

    pub fn top(&self) -> f64 {
        self.margins.top
    }

    pub fn bottom(&self) -> f64 {
        self.top() + self.plot_height()
    }

    pub fn plot_width(&self) -> f64 {
        (self.canvas.width - self.margins.left - self.margins.right).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.canvas.height - self.margins.top - self.margins.bottom).max(0.0)
    }

    /// x of index `i` in a series of `n`; a lone point sits at the left margin.
    pub fn time_x(&self, i: usize, n: usize) -> f64 {
        if n <= 1 {
            return self.left();
        }
        self.left() + i as f64 / (n - 1) as f64 * self.plot_width()
    }

    /// Nearest index under canvas x, clamped to the series.
    pub fn index_at_x(&self, x: f64, n: usize) -> Option<usize> {
        match n {
            0 => None,
            1 => Some(0),
            _ => {
                let width = self.plot_width();
                if width <= 0.0 {
                    return Some(0);
                }
                let t = ((x - self.left()) / width).clamp(0.0, 1.0);
                Some(((t * (n - 1) as f64).round() as usize).min(n - 1))
            }
        }
    }
}

/// Raw count of the hovered bucket at one index, placed on its layer's top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverMarker {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub count: u32,
}

/// Dot for a visible bucket when the series has a single snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMarker {
    pub bucket: BucketId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub frame: PlotFrame,
    pub mode: DisplayMode,
    pub y_scale: LinearScale,
    pub layers: Vec<StackedLayer>,
    pub x_ticks: Vec<XTick>,
    pub y_grid: Vec<GridLine>,
    pub price: Option<PriceOverlay>,
    pub hover_markers: Vec<HoverMarker>,
    pub point_markers: Vec<PointMarker>,
    pub cursor_x: Option<f64>,
    /// Zero or one snapshot: show the "no data" affordance.
    pub no_data: bool,
}

impl ChartLayout {
    pub fn layer(&self, bucket: BucketId) -> Option<&StackedLayer> {
        self.layers.iter().find(|l| l.bucket == bucket)
    }
}

/// Y domain for the display mode: `[0, 100]` or `[0, max total]`.
pub fn y_domain(series: &DistributionSeries, mode: DisplayMode) -> (f64, f64) {
    match mode {
        DisplayMode::Percentage => (0.0, 100.0),
        DisplayMode::Count => (0.0, series.max_total().max(1) as f64),
    }
}

/// Full layout pass.
pub fn compute_layout(
    series: &DistributionSeries,
    view: &VisibilityState,
    frame: &PlotFrame,
    current_index: Option<usize>,
) -> ChartLayout {
    let snapshots = series.snapshots();
    let n = snapshots.len();
    let y_scale = LinearScale::new(y_domain(series, view.mode), (frame.bottom(), frame.top()));

    let stacks = stack_values(snapshots, view);
    let layers = stack::layers(&stacks, frame, &y_scale, view.hovered);

    let hover_markers = view
        .hovered
        .and_then(|bucket| stacks.iter().find(|s| s.bucket == bucket))
        .map(|stack| {
            stack
                .bands
                .iter()
                .zip(snapshots)
                .enumerate()
                .map(|(index, (band, snapshot))| HoverMarker {
                    index,
                    x: frame.time_x(index, n),
                    y: y_scale.map(band.upper),
                    count: snapshot.count(stack.bucket),
                })
                .collect()
        })
        .unwrap_or_default();

    let point_markers = if n == 1 {
        stacks
            .iter()
            .map(|stack| PointMarker {
                bucket: stack.bucket,
                x: frame.left(),
                y: y_scale.map(stack.bands[0].upper),
            })
            .collect()
    } else {
        Vec::new()
    };

    let cursor_x = series
        .last_index()
        .map(|last| frame.time_x(current_index.unwrap_or(last).min(last), n));

    tracing::debug!(
        snapshots = n,
        layers = layers.len(),
        mode = ?view.mode,
        hovered = ?view.hovered,
        "computed chart layout"
    );

    ChartLayout {
        frame: *frame,
        mode: view.mode,
        y_scale,
        layers,
        x_ticks: x_ticks(snapshots, frame),
        y_grid: y_grid(view.mode, &y_scale),
        price: price_overlay(series, frame),
        hover_markers,
        point_markers,
        cursor_x,
        no_data: series.is_degenerate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_x_endpoints() {
        let frame = PlotFrame::default();
        assert_eq!(frame.time_x(0, 10), 60.0);
        assert_eq!(frame.time_x(9, 10), 940.0);
        assert_eq!(frame.time_x(0, 1), 60.0);
        assert_eq!(frame.right(), 940.0);
        assert_eq!(frame.bottom(), 360.0);
    }

    #[test]
    fn test_index_at_x_round_trips_and_clamps() {
        let frame = PlotFrame::default();
        for i in 0..10 {
            assert_eq!(frame.index_at_x(frame.time_x(i, 10), 10), Some(i));
        }
        assert_eq!(frame.index_at_x(-500.0, 10), Some(0));
        assert_eq!(frame.index_at_x(5_000.0, 10), Some(9));
        assert_eq!(frame.index_at_x(300.0, 0), None);
        assert_eq!(frame.index_at_x(300.0, 1), Some(0));
    }

    #[test]
    fn test_tiny_canvas_does_not_go_negative() {
        let frame = PlotFrame::new(
            CanvasSize {
                width: 50.0,
                height: 30.0,
            },
            Margins::default(),
        );
        assert_eq!(frame.plot_width(), 0.0);
        assert_eq!(frame.plot_height(), 0.0);
        assert_eq!(frame.index_at_x(55.0, 4), Some(0));
    }
}
