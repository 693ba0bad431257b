use std::fmt;
use std::str::FromStr;

use jiff::ToSpan;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Look-back window preset, resolved against an end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "3Y")]
    ThreeYears,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::ThreeYears,
        TimeRange::FiveYears,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1Y",
            TimeRange::ThreeYears => "3Y",
            TimeRange::FiveYears => "5Y",
        }
    }

    pub fn span(self) -> jiff::Span {
        match self {
            TimeRange::OneMonth => 1.month(),
            TimeRange::ThreeMonths => 3.months(),
            TimeRange::SixMonths => 6.months(),
            TimeRange::OneYear => 1.year(),
            TimeRange::ThreeYears => 3.years(),
            TimeRange::FiveYears => 5.years(),
        }
    }

    /// Next preset, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn resolve(self, end: Date) -> DateWindow {
        DateWindow {
            start: end.saturating_sub(self.span()),
            end,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown time range {wanted:?} (expected 1M, 3M, 6M, 1Y, 3Y or 5Y)"))
    }
}

/// Inclusive date bounds of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Date,
    pub end: Date,
}

/// The (index, metric, time range) selection a series was fetched for.
///
/// Changing any field requires a full refetch; series are never patched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionContext {
    pub index: String,
    pub metric: String,
    pub range: TimeRange,
}

pub const DEFAULT_INDEX: &str = "SPX";
pub const DEFAULT_METRIC: &str = "momentum";

impl Default for SelectionContext {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX, DEFAULT_METRIC, TimeRange::default())
    }
}

impl SelectionContext {
    pub fn new(index: impl Into<String>, metric: impl Into<String>, range: TimeRange) -> Self {
        Self {
            index: index.into(),
            metric: metric.into(),
            range,
        }
    }
}
