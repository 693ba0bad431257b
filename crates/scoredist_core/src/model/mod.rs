//! Data model for bucketed distribution series
//!
//! - `bucket` - The five fixed score buckets and per-bucket counts
//! - `snapshot` - One trading date: counts, optional price, optional breakdown
//! - `series` - The immutable, date-ordered series plus load metadata
//! - `context` - What was asked for: index, metric and time range

mod bucket;
mod context;
mod series;
mod snapshot;

pub use bucket::{BucketCounts, BucketId};
pub use context::{DEFAULT_INDEX, DEFAULT_METRIC, DateWindow, SelectionContext, TimeRange};
pub use series::{DataAnomaly, DistributionSeries};
pub use snapshot::{DetailValue, DistributionSnapshot, PriceBar, SymbolBreakdown, SymbolDetail};
