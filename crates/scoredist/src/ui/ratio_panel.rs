use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Sparkline};

use scoredist_core::ratio::{RatioPoint, RatioStats};

use super::style;
use crate::util::format::{format_optional, format_ratio, format_ratio_value, format_share};

pub fn stats_lines(stats: &RatioStats) -> Vec<Line<'static>> {
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<11}"), Style::default().fg(style::HEADER_COLOR)),
            Span::raw(value),
        ])
    };
    vec![
        row("Upper/Lower", stats.current.as_ref().map_or_else(|| "-".to_string(), format_ratio)),
        row("Max", format_optional(stats.max, format_ratio_value)),
        row("Average", format_optional(stats.average, format_ratio_value)),
        row("Percentile", format_optional(stats.percentile_rank, format_share)),
    ]
}

/// Bars for the sparkline. Sentinel points are capped at the largest finite ratio.
pub fn sparkline_data(points: &[RatioPoint]) -> Vec<u64> {
    let cap = points
        .iter()
        .filter(|p| !p.is_sentinel())
        .map(|p| p.ratio)
        .fold(1.0, f64::max);
    points
        .iter()
        .map(|p| (p.ratio.min(cap) * 100.0).round() as u64)
        .collect()
}

pub fn render_ratio_panel(frame: &mut Frame, area: Rect, stats: &RatioStats, points: &[RatioPoint]) {
    let block = style::panel(" Ratio 60-100 vs 0-60 ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [text_area, spark_area] = Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(inner);
    frame.render_widget(Paragraph::new(stats_lines(stats)), text_area);

    if spark_area.height > 0 && !points.is_empty() {
        let sparkline = Sparkline::default()
            .data(sparkline_data(points))
            .style(Style::default().fg(style::HEADER_COLOR));
        frame.render_widget(sparkline, spark_area);
    }
}
