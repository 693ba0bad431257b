use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five fixed, non-overlapping score ranges.
///
/// Variant order is the stacking order: lowest range at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketId {
    #[serde(rename = "0-20")]
    From0To20,
    #[serde(rename = "20-40")]
    From20To40,
    #[serde(rename = "40-60")]
    From40To60,
    #[serde(rename = "60-80")]
    From60To80,
    #[serde(rename = "80-100")]
    From80To100,
}

impl BucketId {
    pub const COUNT: usize = 5;

    pub const ALL: [BucketId; Self::COUNT] = [
        BucketId::From0To20,
        BucketId::From20To40,
        BucketId::From40To60,
        BucketId::From60To80,
        BucketId::From80To100,
    ];

    /// Buckets whose sum forms the ratio numerator.
    pub const UPPER: [BucketId; 2] = [BucketId::From60To80, BucketId::From80To100];

    /// Buckets whose sum forms the ratio denominator.
    pub const LOWER: [BucketId; 3] = [
        BucketId::From0To20,
        BucketId::From20To40,
        BucketId::From40To60,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Wire key, e.g. `"40-60"`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            BucketId::From0To20 => "0-20",
            BucketId::From20To40 => "20-40",
            BucketId::From40To60 => "40-60",
            BucketId::From60To80 => "60-80",
            BucketId::From80To100 => "80-100",
        }
    }

    /// Parse a wire key. Tolerates surrounding whitespace and `_` as separator.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.key() == key || b.key().replace('-', "_") == key)
    }

    /// Inclusive lower and exclusive upper score bound.
    #[must_use]
    pub const fn range(self) -> (u8, u8) {
        match self {
            BucketId::From0To20 => (0, 20),
            BucketId::From20To40 => (20, 40),
            BucketId::From40To60 => (40, 60),
            BucketId::From60To80 => (60, 80),
            BucketId::From80To100 => (80, 100),
        }
    }

    #[must_use]
    pub const fn is_upper(self) -> bool {
        matches!(self, BucketId::From60To80 | BucketId::From80To100)
    }

    /// Comma-joined keys as sent in the `bucket_ranges` query parameter.
    #[must_use]
    pub fn query_ranges() -> String {
        Self::ALL.map(BucketId::key).join(",")
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Constituent count per bucket for a single date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketCounts([u32; BucketId::COUNT]);

impl BucketCounts {
    #[must_use]
    pub const fn new(counts: [u32; BucketId::COUNT]) -> Self {
        Self(counts)
    }

    #[must_use]
    pub const fn get(&self, bucket: BucketId) -> u32 {
        self.0[bucket.index()]
    }

    pub fn set(&mut self, bucket: BucketId, count: u32) {
        self.0[bucket.index()] = count;
    }

    /// Sum of all five counts, widened so `u32::MAX` per bucket cannot overflow.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().map(|c| u64::from(*c)).sum()
    }

    #[must_use]
    pub fn sum_of(&self, buckets: &[BucketId]) -> u64 {
        buckets.iter().map(|b| u64::from(self.get(*b))).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BucketId, u32)> + '_ {
        BucketId::ALL.into_iter().map(|b| (b, self.get(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_order_is_stack_order() {
        let mut sorted = BucketId::ALL;
        sorted.sort();
        assert_eq!(sorted, BucketId::ALL);
        for (i, b) in BucketId::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
            assert_eq!(BucketId::from_index(i), Some(*b));
        }
        assert_eq!(BucketId::from_index(5), None);
    }

    #[test]
    fn test_from_key() {
        assert_eq!(BucketId::from_key("60-80"), Some(BucketId::From60To80));
        assert_eq!(BucketId::from_key(" 0-20 "), Some(BucketId::From0To20));
        assert_eq!(BucketId::from_key("80_100"), Some(BucketId::From80To100));
        assert_eq!(BucketId::from_key("100-120"), None);
    }

    #[test]
    fn test_upper_lower_partition() {
        for b in BucketId::ALL {
            assert_eq!(b.is_upper(), BucketId::UPPER.contains(&b));
            assert_eq!(!b.is_upper(), BucketId::LOWER.contains(&b));
        }
        assert_eq!(BucketId::query_ranges(), "0-20,20-40,40-60,60-80,80-100");
    }

    #[test]
    fn test_counts_sums() {
        let counts = BucketCounts::new([1, 2, 3, 4, 5]);
        assert_eq!(counts.total(), 15);
        assert_eq!(counts.sum_of(&BucketId::UPPER), 9);
        assert_eq!(counts.sum_of(&BucketId::LOWER), 6);
    }

    #[test]
    fn test_counts_sum_past_u32() {
        let counts = BucketCounts::new([u32::MAX; BucketId::COUNT]);
        assert_eq!(counts.total(), 5 * u64::from(u32::MAX));
        assert_eq!(counts.sum_of(&BucketId::UPPER), 2 * u64::from(u32::MAX));
    }
}
