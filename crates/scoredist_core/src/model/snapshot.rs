use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::bucket::{BucketCounts, BucketId};

/// OHLCV for the benchmark instrument on one date. Any field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl PriceBar {
    /// Value plotted on the overlay: close, falling back to open.
    #[must_use]
    pub fn overlay_value(&self) -> Option<f64> {
        self.close.or(self.open).filter(|v| v.is_finite())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }
}

/// The metric value that placed a constituent in its bucket.
///
/// Upstream sends numbers most of the time and strings occasionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DetailValue {
    Number(f64),
    Label(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDetail {
    pub symbol: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub value: DetailValue,
}

/// Constituent lists keyed by bucket, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolBreakdown {
    by_bucket: [Vec<SymbolDetail>; BucketId::COUNT],
}

impl SymbolBreakdown {
    #[must_use]
    pub fn bucket(&self, bucket: BucketId) -> &[SymbolDetail] {
        &self.by_bucket[bucket.index()]
    }

    pub fn insert(&mut self, bucket: BucketId, details: Vec<SymbolDetail>) {
        self.by_bucket[bucket.index()] = details;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_bucket.iter().all(Vec::is_empty)
    }
}

/// Bucketed state of an index on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSnapshot {
    pub date: Date,
    pub bucket_counts: BucketCounts,
    /// Should equal `bucket_counts.total()`; mismatches are tolerated.
    pub total_constituents: u64,
    pub price: Option<PriceBar>,
    pub symbol_breakdown: Option<SymbolBreakdown>,
}

impl DistributionSnapshot {
    #[must_use]
    pub fn new(date: Date, counts: [u32; BucketId::COUNT]) -> Self {
        let bucket_counts = BucketCounts::new(counts);
        Self {
            date,
            total_constituents: bucket_counts.total(),
            bucket_counts,
            price: None,
            symbol_breakdown: None,
        }
    }

    #[must_use]
    pub fn count(&self, bucket: BucketId) -> u32 {
        self.bucket_counts.get(bucket)
    }

    /// Denominator for percentage display.
    ///
    /// Uses the larger of the reported total and the bucket sum, so shares
    /// never exceed 100% when the backend under-reports the total.
    #[must_use]
    pub fn share_base(&self) -> u64 {
        self.total_constituents.max(self.bucket_counts.total())
    }

    /// Bucket share in percent (0..=100). Zero when the snapshot is empty.
    #[must_use]
    pub fn share(&self, bucket: BucketId) -> f64 {
        let base = self.share_base();
        if base == 0 {
            0.0
        } else {
            f64::from(self.count(bucket)) / base as f64 * 100.0
        }
    }

    #[must_use]
    pub fn upper_count(&self) -> u64 {
        self.bucket_counts.sum_of(&BucketId::UPPER)
    }

    #[must_use]
    pub fn lower_count(&self) -> u64 {
        self.bucket_counts.sum_of(&BucketId::LOWER)
    }

    #[must_use]
    pub fn symbols(&self, bucket: BucketId) -> &[SymbolDetail] {
        self.symbol_breakdown
            .as_ref()
            .map(|breakdown| breakdown.bucket(bucket))
            .unwrap_or_default()
    }
}
