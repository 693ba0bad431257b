//! Colors and blocks shared by the panels

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders};

use scoredist_core::model::BucketId;

/// Fill colors from the weakest to the strongest bucket.
const BUCKET_RGB: [(u8, u8, u8); BucketId::COUNT] = [
    (214, 69, 65),
    (235, 137, 52),
    (222, 196, 72),
    (128, 196, 92),
    (46, 158, 88),
];

/// Background the fills are blended toward.
const BACKGROUND_RGB: (u8, u8, u8) = (18, 18, 18);

pub const HELP_COLOR: Color = Color::DarkGray;
pub const HEADER_COLOR: Color = Color::Cyan;
pub const GRID_COLOR: Color = Color::Rgb(60, 60, 60);
pub const PRICE_COLOR: Color = Color::Cyan;
pub const CURSOR_COLOR: Color = Color::White;
pub const ERROR_COLOR: Color = Color::Red;

pub fn bucket_color(bucket: BucketId) -> Color {
    let (r, g, b) = BUCKET_RGB[bucket.index()];
    Color::Rgb(r, g, b)
}

/// Bucket color at `opacity` over the chart background.
pub fn bucket_fill(bucket: BucketId, opacity: f32) -> Color {
    let (r, g, b) = BUCKET_RGB[bucket.index()];
    let (br, bg, bb) = BACKGROUND_RGB;
    let opacity = opacity.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| (f32::from(fg) * opacity + f32::from(bg) * (1.0 - opacity)).round() as u8;
    Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
}

pub fn panel(title: impl Into<Line<'static>>) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title.into())
}
