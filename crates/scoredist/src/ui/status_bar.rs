use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::style;

pub const HELP_TEXT: &str = "space play | ←/→ step | home/end | 1-5 bucket | a/n all/none | m mode | h hover | +/- speed | [/] index | t range | r retry | q quit";

/// What the status bar shows, already formatted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub date: Option<String>,
    pub position: Option<(usize, usize)>,
    pub playing: bool,
    pub interval: String,
    pub source: String,
    pub notice: Option<String>,
}

impl StatusLine {
    pub fn summary(&self) -> String {
        let date = self.date.as_deref().unwrap_or("-");
        let position = self
            .position
            .map_or_else(|| "0/0".to_string(), |(i, n)| format!("{}/{n}", i + 1));
        let state = if self.playing { "▶ playing" } else { "■ stopped" };
        format!("{date}  {position}  {state} @ {}  [{}]", self.interval, self.source)
    }
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, status: &StatusLine) {
    let first = match &status.notice {
        Some(notice) => Line::from(vec![
            Span::styled("Error: ", Style::default().fg(style::ERROR_COLOR)),
            Span::raw(notice.clone()),
        ]),
        None => Line::from(status.summary()),
    };
    let help = Line::from(Span::styled(HELP_TEXT, Style::default().fg(style::HELP_COLOR)));

    let paragraph = Paragraph::new(vec![first, help]).block(Block::default().borders(Borders::TOP));
    frame.render_widget(paragraph, area);
}
