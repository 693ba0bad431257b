//! Stacked distribution chart drawn on a ratatui canvas.
//!
//! The canvas bounds are the logical layout canvas, so layout coordinates
//! are used as-is apart from flipping y (layout y grows downward).

use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::Paragraph;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};

use scoredist_core::layout::{ChartLayout, StackedLayer};
use scoredist_core::model::DistributionSeries;

use super::style::{self, CURSOR_COLOR, GRID_COLOR, PRICE_COLOR};
use crate::util::format::format_count;

/// Width of a `YYYY-MM-DD` label plus a gap, in cells.
const DATE_LABEL_CELLS: f64 = 11.0;

pub fn render_chart(frame: &mut Frame, area: Rect, series: &DistributionSeries, layout: &ChartLayout, loading: bool) {
    let context = series.context();
    let mut title = format!(" {} | {} | {} | {} ", context.index, context.metric, context.range, layout.mode.label());
    if layout.no_data && !series.is_empty() {
        title.push_str(&format!("| no data: {} date ", series.len()));
    }
    if let Some(price) = &layout.price {
        title.push_str(&format!("| {} {}..{} ", price.label, price.min_label(), price.max_label()));
    }
    if loading {
        title.push_str("| loading ");
    }
    let block = style::panel(title);

    if series.is_empty() {
        let message = if loading { "Loading..." } else { "No data for this selection" };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(style::HELP_COLOR))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner_width = f64::from(block.inner(area).width.max(1));
    let canvas_size = layout.frame.canvas;
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, canvas_size.width])
        .y_bounds([0.0, canvas_size.height])
        .paint(|ctx| paint(ctx, layout, inner_width));

    frame.render_widget(canvas, area);
}

fn paint(ctx: &mut Context, layout: &ChartLayout, inner_width: f64) {
    let height = layout.frame.canvas.height;
    let flip = |y: f64| height - y;
    let plot = &layout.frame;

    for line in &layout.y_grid {
        ctx.draw(&CanvasLine::new(plot.left(), flip(line.y), plot.right(), flip(line.y), GRID_COLOR));
        ctx.print(2.0, flip(line.y), Span::styled(line.label.clone(), Style::default().fg(style::HELP_COLOR)));
    }

    // Braille gives two dots per cell horizontally.
    let columns = (inner_width * 2.0).max(2.0) as usize;
    for layer in &layout.layers {
        fill_layer(ctx, layer, plot.left(), plot.right(), columns, height);
    }
    ctx.layer();

    for layer in &layout.layers {
        let color = if layer.highlighted {
            Color::White
        } else {
            style::bucket_color(layer.bucket)
        };
        draw_polyline(ctx, &layer.top, color, height);
    }

    if let Some(price) = &layout.price {
        draw_polyline(ctx, &price.line, PRICE_COLOR, height);
        let coords: Vec<(f64, f64)> = price.markers.iter().map(|(x, y)| (*x, flip(*y))).collect();
        ctx.draw(&Points {
            coords: &coords,
            color: PRICE_COLOR,
        });
    }

    for marker in &layout.point_markers {
        ctx.draw(&Points {
            coords: &[(marker.x, flip(marker.y))],
            color: style::bucket_color(marker.bucket),
        });
    }

    if layout.no_data {
        let (x, y) = (plot.left() + plot.plot_width() / 3.0, flip(plot.top() + plot.plot_height() / 2.0));
        ctx.print(x, y, Span::styled("No data to chart: need two dates", Style::default().fg(style::HELP_COLOR)));
    }

    if let Some(x) = layout.cursor_x {
        ctx.draw(&CanvasLine::new(x, flip(plot.top()), x, flip(plot.bottom()), CURSOR_COLOR));
    }

    let hover_coords: Vec<(f64, f64)> = layout.hover_markers.iter().map(|m| (m.x, flip(m.y))).collect();
    ctx.draw(&Points {
        coords: &hover_coords,
        color: Color::White,
    });
    let current = layout
        .cursor_x
        .and_then(|cursor| layout.hover_markers.iter().find(|m| m.x == cursor));
    if let Some(marker) = current {
        ctx.print(marker.x, flip(marker.y), Span::raw(format_count(u64::from(marker.count))).bold());
    }

    // Skip date labels that would overlap the previous one.
    let min_gap = DATE_LABEL_CELLS * layout.frame.canvas.width / inner_width;
    let label_y = layout.frame.margins.bottom / 2.0;
    let mut last_x = f64::NEG_INFINITY;
    for tick in &layout.x_ticks {
        if tick.x - last_x < min_gap {
            continue;
        }
        ctx.print(tick.x, label_y, Span::styled(tick.label.clone(), Style::default().fg(style::HELP_COLOR)));
        last_x = tick.x;
    }
}

/// Shade one band with vertical strokes sampled across the plot width.
fn fill_layer(ctx: &mut Context, layer: &StackedLayer, left: f64, right: f64, columns: usize, height: f64) {
    let color = style::bucket_fill(layer.bucket, layer.opacity);
    for k in 0..=columns {
        let x = left + (right - left) * k as f64 / columns as f64;
        let (Some(top), Some(bottom)) = (edge_at(&layer.top, x), edge_at(&layer.bottom, x)) else {
            continue;
        };
        ctx.draw(&CanvasLine::new(x, height - bottom, x, height - top, color));
    }
}

fn draw_polyline(ctx: &mut Context, points: &[(f64, f64)], color: Color, height: f64) {
    for pair in points.windows(2) {
        let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
        ctx.draw(&CanvasLine::new(x1, height - y1, x2, height - y2, color));
    }
}

/// Linear interpolation of a left-to-right edge at `x`.
pub(crate) fn edge_at(edge: &[(f64, f64)], x: f64) -> Option<f64> {
    let first = edge.first()?;
    let last = edge.last()?;
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }
    let i = edge.partition_point(|p| p.0 < x);
    let (x0, y0) = edge[i - 1];
    let (x1, y1) = edge[i];
    if x1 == x0 {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}
