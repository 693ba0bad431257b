use std::sync::Arc;

use jiff::civil::Date;

use super::bucket::BucketId;
use super::context::SelectionContext;
use super::snapshot::DistributionSnapshot;

/// A data-quality issue absorbed during normalisation. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataAnomaly {
    MissingBucket { date: Date, bucket: BucketId },
    UnknownBucket { date: Date, key: String },
    UnreadableCount { date: Date, key: String },
    MissingTotal { date: Date },
    TotalMismatch { date: Date, reported: u64, summed: u64 },
    DuplicateDate { date: Date },
}

/// Immutable, date-ascending series for one selection.
///
/// Cloning is cheap: snapshots are shared. A new selection produces a new
/// series; nothing mutates one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSeries {
    snapshots: Arc<[DistributionSnapshot]>,
    context: SelectionContext,
    base_symbol: Option<String>,
    anomalies: Arc<[DataAnomaly]>,
}

impl DistributionSeries {
    /// Build from snapshots already sorted ascending by unique date.
    pub fn new(
        snapshots: Vec<DistributionSnapshot>,
        context: SelectionContext,
        base_symbol: Option<String>,
        anomalies: Vec<DataAnomaly>,
    ) -> Self {
        debug_assert!(snapshots.windows(2).all(|w| w[0].date < w[1].date));
        Self {
            snapshots: snapshots.into(),
            context,
            base_symbol,
            anomalies: anomalies.into(),
        }
    }

    pub fn empty(context: SelectionContext) -> Self {
        Self::new(Vec::new(), context, None, Vec::new())
    }

    pub fn snapshots(&self) -> &[DistributionSnapshot] {
        &self.snapshots
    }

    pub fn get(&self, index: usize) -> Option<&DistributionSnapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Zero or one snapshot: nothing to draw as a path.
    pub fn is_degenerate(&self) -> bool {
        self.snapshots.len() < 2
    }

    pub fn last_index(&self) -> Option<usize> {
        self.snapshots.len().checked_sub(1)
    }

    pub fn context(&self) -> &SelectionContext {
        &self.context
    }

    /// Benchmark symbol the backend resolved the index to, if it differs.
    pub fn base_symbol(&self) -> Option<&str> {
        self.base_symbol.as_deref()
    }

    /// Label for the price axis: resolved base symbol, else the index name.
    pub fn price_label(&self) -> &str {
        self.base_symbol().unwrap_or(&self.context.index)
    }

    pub fn anomalies(&self) -> &[DataAnomaly] {
        &self.anomalies
    }

    /// Largest reported constituent total (count-mode axis ceiling).
    pub fn max_total(&self) -> u64 {
        self.snapshots
            .iter()
            .map(DistributionSnapshot::share_base)
            .max()
            .unwrap_or(0)
    }

    pub fn has_price(&self) -> bool {
        self.snapshots
            .iter()
            .any(|s| s.price.and_then(|p| p.overlay_value()).is_some())
    }

    pub fn has_breakdown(&self) -> bool {
        self.snapshots.iter().any(|s| s.symbol_breakdown.is_some())
    }

    pub fn first_date(&self) -> Option<Date> {
        self.snapshots.first().map(|s| s.date)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.snapshots.last().map(|s| s.date)
    }
}
