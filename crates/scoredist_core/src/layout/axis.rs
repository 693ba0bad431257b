//! Axis ticks and grid lines.

use super::PlotFrame;
use super::scale::{LinearScale, nice_step};
use crate::model::DistributionSnapshot;
use crate::selection::DisplayMode;

/// Target number of date labels along the x axis.
pub const X_TICK_TARGET: usize = 12;
const PERCENT_DIVISIONS: u32 = 10;
const COUNT_DIVISIONS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct XTick {
    pub index: usize,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub value: f64,
    pub y: f64,
    pub label: String,
}

/// Ticks every `ceil(n / 12)` snapshots, labelled with the date.
pub fn x_ticks(snapshots: &[DistributionSnapshot], frame: &PlotFrame) -> Vec<XTick> {
    let n = snapshots.len();
    if n == 0 {
        return Vec::new();
    }
    let step = n.div_ceil(X_TICK_TARGET);

    snapshots
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(index, snapshot)| XTick {
            index,
            x: frame.time_x(index, n),
            label: snapshot.date.to_string(),
        })
        .collect()
}

/// Horizontal grid: every 10% in percentage mode, a round step in count mode.
pub fn y_grid(mode: DisplayMode, y_scale: &LinearScale) -> Vec<GridLine> {
    match mode {
        DisplayMode::Percentage => (0..=PERCENT_DIVISIONS)
            .map(|i| {
                let value = f64::from(i * 100 / PERCENT_DIVISIONS);
                GridLine {
                    value,
                    y: y_scale.map(value),
                    label: format!("{value:.0}%"),
                }
            })
            .collect(),
        DisplayMode::Count => {
            let (_, top) = y_scale.domain();
            let step = nice_step(top, COUNT_DIVISIONS).max(1.0);
            let steps = (top / step).floor() as u32;
            (0..=steps)
                .map(|i| {
                    let value = f64::from(i) * step;
                    GridLine {
                        value,
                        y: y_scale.map(value),
                        label: format!("{value:.0}"),
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> Vec<DistributionSnapshot> {
        let start = jiff::civil::date(2024, 1, 1);
        (0..n)
            .map(|i| {
                let date = start.saturating_add(jiff::Span::new().days(i as i64));
                DistributionSnapshot::new(date, [1, 1, 1, 1, 1])
            })
            .collect()
    }

    #[test]
    fn test_x_tick_interval() {
        let frame = PlotFrame::default();
        assert_eq!(x_ticks(&series(12), &frame).len(), 12);
        let ticks = x_ticks(&series(25), &frame);
        // step = ceil(25 / 12) = 3
        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks[1].index, 3);
        assert_eq!(ticks[1].label, "2024-01-04");
        assert!(x_ticks(&series(0), &frame).is_empty());
    }

    #[test]
    fn test_single_point_tick_at_left_margin() {
        let frame = PlotFrame::default();
        let ticks = x_ticks(&series(1), &frame);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].x, frame.margins.left);
    }

    #[test]
    fn test_percentage_grid() {
        let scale = LinearScale::new((0.0, 100.0), (360.0, 20.0));
        let grid = y_grid(DisplayMode::Percentage, &scale);
        assert_eq!(grid.len(), 11);
        assert_eq!(grid[4].label, "40%");
        assert_eq!(grid[10].y, 20.0);
    }

    #[test]
    fn test_count_grid_round_steps() {
        let scale = LinearScale::new((0.0, 300.0), (360.0, 20.0));
        let grid = y_grid(DisplayMode::Count, &scale);
        let labels: Vec<&str> = grid.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["0", "100", "200", "300"]);

        let tiny = LinearScale::new((0.0, 1.0), (360.0, 20.0));
        assert_eq!(y_grid(DisplayMode::Count, &tiny).len(), 2);
    }
}
