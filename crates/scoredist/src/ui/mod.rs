//! Terminal rendering.
//!
//! - `chart` - Stacked area, grid, price overlay and cursor on a canvas
//! - `legend` - Per-bucket toggles with count and share at the current date
//! - `ratio_panel` - Upper/lower ratio with whole-series statistics
//! - `breakdown_table` - Constituents of the hovered or first visible bucket
//! - `status_bar` - Date, playback state and key help

mod breakdown_table;
mod chart;
mod legend;
mod ratio_panel;
mod status_bar;
pub mod style;

pub use status_bar::{HELP_TEXT, StatusLine};

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use scoredist_core::layout::PlotFrame;
use scoredist_core::session::LoadState;
use scoredist_core::{Dashboard, Scheduler};

/// Draw the whole screen. Returns the chart area for pointer scrubbing.
pub fn draw<S: Scheduler>(frame: &mut Frame, dashboard: &Dashboard<S>, plot: &PlotFrame, status: &StatusLine) -> Rect {
    let [main, status_area] = Layout::vertical([Constraint::Min(10), Constraint::Length(3)]).areas(frame.area());
    let [left, right] = Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(main);
    let [chart_area, breakdown_area] = Layout::vertical([Constraint::Min(8), Constraint::Length(10)]).areas(left);
    let [legend_area, ratio_area] = Layout::vertical([Constraint::Length(7), Constraint::Min(6)]).areas(right);

    let load_state = dashboard.load_state();
    if let LoadState::Failed(err) = load_state {
        render_error(frame, chart_area, &err.user_message());
    } else {
        let layout = dashboard.layout(plot);
        chart::render_chart(frame, chart_area, dashboard.series(), &layout, load_state.is_loading());
    }

    let snapshot = dashboard.current_index().and_then(|i| dashboard.series().get(i));
    legend::render_legend(frame, legend_area, dashboard.view(), snapshot);
    ratio_panel::render_ratio_panel(frame, ratio_area, &dashboard.ratio_stats(), dashboard.ratios());

    let breakdown = dashboard.breakdown_bucket().map(|bucket| dashboard.breakdown(bucket));
    breakdown_table::render_breakdown(frame, breakdown_area, breakdown.as_ref());

    status_bar::render_status_bar(frame, status_area, status);
    chart_area
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(style::ERROR_COLOR))),
        Line::from(""),
        Line::from(Span::styled("press r to retry", Style::default().fg(style::HELP_COLOR))),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(style::panel(" Failed to load ").border_style(Style::default().fg(style::ERROR_COLOR)));
    frame.render_widget(paragraph, area);
}
