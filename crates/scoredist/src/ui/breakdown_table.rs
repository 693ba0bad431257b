use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Row, Table};

use scoredist_core::breakdown::BreakdownView;

use super::style;
use crate::util::format::format_count;

pub fn breakdown_title(view: &BreakdownView) -> String {
    let date = view.date.map_or_else(|| "-".to_string(), |d| d.to_string());
    format!(
        " {} on {date}: {} listed of {} ",
        view.bucket,
        format_count(view.listed() as u64),
        format_count(u64::from(view.bucket_count))
    )
}

pub fn render_breakdown(frame: &mut Frame, area: Rect, view: Option<&BreakdownView>) {
    let Some(view) = view else {
        let paragraph = Paragraph::new("No visible bucket")
            .style(Style::default().fg(style::HELP_COLOR))
            .block(style::panel(" Constituents "));
        frame.render_widget(paragraph, area);
        return;
    };

    let block = style::panel(breakdown_title(view));
    if view.rows.is_empty() {
        let paragraph = Paragraph::new("No constituents listed for this date")
            .style(Style::default().fg(style::HELP_COLOR))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(["Symbol", "Company", "Industry", "Value"])
        .style(Style::default().fg(style::HEADER_COLOR).add_modifier(Modifier::BOLD));
    let rows = view.rows.iter().map(|row| {
        Row::new([
            row.symbol.clone(),
            row.company_name.clone().unwrap_or_else(|| "-".to_string()),
            row.industry.clone().unwrap_or_else(|| "-".to_string()),
            row.display_value.clone(),
        ])
    });
    let widths = [
        Constraint::Length(10),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(10),
    ];
    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoredist_core::model::BucketId;

    #[test]
    fn test_title_counts() {
        let view = BreakdownView {
            bucket: BucketId::From60To80,
            date: Some(jiff::civil::date(2024, 5, 2)),
            bucket_count: 1_204,
            rows: Vec::new(),
        };
        assert_eq!(breakdown_title(&view), " 60-80 on 2024-05-02: 0 listed of 1,204 ");
    }
}
