//! Benchmark price line drawn over the stacked area.
//!
//! Scaled on its own `[min, max]` domain across the full plot height. It
//! never influences the primary axis.

use super::PlotFrame;
use super::scale::LinearScale;
use crate::model::DistributionSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceOverlay {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub scale: LinearScale,
    /// Empty when fewer than two priced snapshots exist.
    pub line: Vec<(f64, f64)>,
    /// Single priced point, drawn as a marker instead of a line.
    pub markers: Vec<(f64, f64)>,
}

impl PriceOverlay {
    #[must_use]
    pub fn min_label(&self) -> String {
        format!("{:.2}", self.min)
    }

    #[must_use]
    pub fn max_label(&self) -> String {
        format!("{:.2}", self.max)
    }
}

pub fn price_overlay(series: &DistributionSeries, frame: &PlotFrame) -> Option<PriceOverlay> {
    let n = series.len();
    let priced: Vec<(usize, f64)> = series
        .snapshots()
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.price.and_then(|p| p.overlay_value()).map(|v| (i, v)))
        .collect();

    if priced.is_empty() {
        return None;
    }

    let min = priced.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = priced.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let scale = LinearScale::new((min, max), (frame.bottom(), frame.top()));

    let points: Vec<(f64, f64)> = priced
        .iter()
        .map(|(i, v)| (frame.time_x(*i, n), scale.map(*v)))
        .collect();

    let (line, markers) = if points.len() >= 2 {
        (points, Vec::new())
    } else {
        (Vec::new(), points)
    };

    Some(PriceOverlay {
        label: series.price_label().to_string(),
        min,
        max,
        scale,
        line,
        markers,
    })
}
