//! Score-distribution time series engine
//!
//! This crate turns per-date snapshots of an index's constituents, bucketed
//! into five score ranges, into everything a front end needs to draw an
//! animated stacked-area view:
//! - Normalisation of the backend payload into an immutable series
//! - Upper/lower bucket ratio derivation with a finite sentinel for `x/0`
//! - Stacked layer, axis and price overlay layout on a logical canvas
//! - A playback state machine driven by an external tick scheduler
//! - Visibility/hover/display-mode view state
//! - Per-bucket constituent breakdown for the current date
//!
//! Nothing in here performs I/O or spawns threads. Fetching and timers live
//! in the front end and talk to the core through [`session::Session`] and
//! [`playback::Scheduler`].
//!
//! ```ignore
//! use scoredist_core::{Dashboard, layout::PlotFrame};
//!
//! let mut dashboard = Dashboard::new(context, scheduler);
//! let (ticket, query) = dashboard.request(context, today);
//! // ... hand `query` to a fetcher, then:
//! dashboard.complete(ticket, response);
//! let layout = dashboard.layout(&PlotFrame::default());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod breakdown;
pub mod dashboard;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod playback;
pub mod ratio;
pub mod selection;
pub mod session;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;
pub mod wire;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use dashboard::Dashboard;
pub use error::FetchError;
pub use model::{
    BucketCounts, BucketId, DistributionSeries, DistributionSnapshot, SelectionContext, TimeRange,
};
pub use playback::{PlaybackController, PlaybackEvent, PlaybackState, PlaybackStatus, Scheduler};
pub use ratio::{RatioPoint, RatioStats, SENTINEL_RATIO};
pub use selection::{DisplayMode, SelectionEvent, VisibilityState};
pub use session::{ApplyOutcome, LoadState, RequestTicket, Session};
