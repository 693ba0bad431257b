//! Upper-vs-lower bucket ratio series.
//!
//! numerator = `60-80` + `80-100`, denominator = `0-20` + `20-40` + `40-60`.
//!
//! A zero denominator never yields infinity: `n/0` with `n > 0` is
//! [`SENTINEL_RATIO`] and `0/0` is zero, so axis math downstream stays
//! finite. The sentinel is an approximation; callers that need the true
//! value should check [`RatioPoint::is_sentinel`].

use jiff::civil::Date;

use crate::model::DistributionSnapshot;

/// Stand-in for an undefined `n/0` ratio.
pub const SENTINEL_RATIO: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioPoint {
    pub date: Date,
    pub ratio: f64,
    pub numerator: u64,
    pub denominator: u64,
}

impl RatioPoint {
    #[must_use]
    pub fn from_snapshot(snapshot: &DistributionSnapshot) -> Self {
        let numerator = snapshot.upper_count();
        let denominator = snapshot.lower_count();
        Self {
            date: snapshot.date,
            ratio: ratio_of(numerator, denominator),
            numerator,
            denominator,
        }
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.denominator == 0 && self.numerator > 0
    }
}

#[must_use]
pub fn ratio_of(numerator: u64, denominator: u64) -> f64 {
    match (numerator, denominator) {
        (0, 0) => 0.0,
        (_, 0) => SENTINEL_RATIO,
        (n, d) => n as f64 / d as f64,
    }
}

/// One point per snapshot, same order.
pub fn derive_ratios(snapshots: &[DistributionSnapshot]) -> Vec<RatioPoint> {
    snapshots.iter().map(RatioPoint::from_snapshot).collect()
}

/// Whole-series summary relative to the current index.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatioStats {
    pub current: Option<RatioPoint>,
    /// Includes sentinel values.
    pub max: Option<f64>,
    /// Mean of non-sentinel ratios.
    pub average: Option<f64>,
    /// Share (0..=100) of non-sentinel ratios at or below the current one.
    /// `None` when the current ratio is a sentinel.
    pub percentile_rank: Option<f64>,
}

pub fn ratio_stats(points: &[RatioPoint], current_index: usize) -> RatioStats {
    let current = points.get(current_index).copied();
    let max = points.iter().map(|p| p.ratio).reduce(f64::max);

    let finite: Vec<f64> = points
        .iter()
        .filter(|p| !p.is_sentinel())
        .map(|p| p.ratio)
        .collect();

    let average = (!finite.is_empty()).then(|| finite.iter().sum::<f64>() / finite.len() as f64);

    let percentile_rank = current
        .filter(|c| !c.is_sentinel() && !finite.is_empty())
        .map(|c| {
            let at_or_below = finite.iter().filter(|r| **r <= c.ratio).count();
            at_or_below as f64 / finite.len() as f64 * 100.0
        });

    RatioStats {
        current,
        max,
        average,
        percentile_rank,
    }
}
