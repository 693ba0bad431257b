use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use scoredist_core::model::{BucketId, DistributionSnapshot};
use scoredist_core::selection::VisibilityState;

use super::style;
use crate::util::format::{format_count, format_share};

/// One line per bucket: toggle key, swatch, range, count and share at the current date.
pub fn legend_lines(view: &VisibilityState, snapshot: Option<&DistributionSnapshot>) -> Vec<Line<'static>> {
    BucketId::ALL
        .into_iter()
        .map(|bucket| {
            let visible = view.is_visible(bucket);
            let swatch = if visible { "■■" } else { "□□" };
            let stats = snapshot.map_or_else(
                || "-".to_string(),
                |s| format!("{:>6} {:>6}", format_count(u64::from(s.count(bucket))), format_share(s.share(bucket))),
            );

            let mut text_style = if visible {
                Style::default()
            } else {
                Style::default().fg(style::HELP_COLOR)
            };
            if view.hovered == Some(bucket) {
                text_style = text_style.add_modifier(Modifier::REVERSED);
            }

            Line::from(vec![
                Span::styled(format!("{} ", bucket.index() + 1), Style::default().fg(style::HELP_COLOR)),
                Span::styled(swatch, Style::default().fg(style::bucket_color(bucket))),
                Span::styled(format!(" {:<7}", bucket.key()), text_style),
                Span::styled(stats, text_style),
            ])
        })
        .collect()
}

pub fn render_legend(frame: &mut Frame, area: Rect, view: &VisibilityState, snapshot: Option<&DistributionSnapshot>) {
    let paragraph = Paragraph::new(legend_lines(view, snapshot)).block(style::panel(format!(" Buckets | {} ", view.mode.label())));
    frame.render_widget(paragraph, area);
}
