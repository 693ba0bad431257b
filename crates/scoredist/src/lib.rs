//! Terminal front end for score distribution playback
//!
//! Wires the `scoredist_core` engine to a ratatui interface:
//! - Background fetching from the distribution API or a deterministic demo source
//! - A timer thread that drives playback ticks
//! - YAML configuration and file logging under the data directory

// ============================================================================
// Data and timing
// ============================================================================

pub mod config;
pub mod source;
pub mod ticker;
pub mod worker;

// ============================================================================
// Interface
// ============================================================================

pub mod logging;
pub mod ui;
pub mod util;

#[cfg(feature = "native")]
pub mod app;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

#[cfg(feature = "native")]
pub use app::{App, AppAction};
pub use config::{AppConfig, ConfigError, SelectionOverrides};
pub use logging::init_logging;
pub use source::{DemoSource, DistributionSource};
