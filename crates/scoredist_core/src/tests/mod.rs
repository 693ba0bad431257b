//! Integration tests for the distribution engine
//!
//! Tests are organized by topic:
//! - `properties` - Whole-engine guarantees over layout, ratios and breakdowns
//! - `playback` - Playback controller driven by a manual scheduler
//! - `session` - Last-request-wins loading and series replacement
//! - `layout` - Chart geometry for degenerate and overlay cases

mod playback;
mod properties;
mod session;

use crate::model::{DistributionSeries, DistributionSnapshot, SelectionContext};

/// Consecutive daily snapshots starting 2024-01-01.
pub(super) fn daily(counts: &[[u32; 5]]) -> Vec<DistributionSnapshot> {
    let start = jiff::civil::date(2024, 1, 1);
    counts
        .iter()
        .enumerate()
        .map(|(i, c)| DistributionSnapshot::new(start.saturating_add(jiff::Span::new().days(i as i64)), *c))
        .collect()
}

pub(super) fn series_of(counts: &[[u32; 5]]) -> DistributionSeries {
    DistributionSeries::new(daily(counts), SelectionContext::default(), None, Vec::new())
}
