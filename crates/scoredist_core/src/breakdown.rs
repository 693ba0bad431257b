//! Constituent list for one bucket at the current date.

use jiff::civil::Date;

use crate::model::{BucketId, DetailValue, DistributionSeries, SymbolDetail};

/// Display-ready constituent record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstituentRow {
    pub symbol: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub display_value: String,
}

impl From<&SymbolDetail> for ConstituentRow {
    fn from(detail: &SymbolDetail) -> Self {
        Self {
            symbol: detail.symbol.clone(),
            company_name: detail.company_name.clone(),
            industry: detail.industry.clone(),
            display_value: format_detail_value(&detail.value),
        }
    }
}

/// Numbers to two decimals, labels verbatim, missing as `-`.
#[must_use]
pub fn format_detail_value(value: &DetailValue) -> String {
    match value {
        DetailValue::Number(v) => format!("{v:.2}"),
        DetailValue::Label(label) => label.clone(),
        DetailValue::Missing => "-".to_string(),
    }
}

/// Rows for `bucket` at `index`, in upstream order.
///
/// Empty when the index is out of range or the date carries no symbols for
/// that bucket.
pub fn project(series: &DistributionSeries, index: usize, bucket: BucketId) -> Vec<ConstituentRow> {
    series
        .get(index)
        .map(|snapshot| snapshot.symbols(bucket).iter().map(ConstituentRow::from).collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownView {
    pub bucket: BucketId,
    pub date: Option<Date>,
    /// Bucket count reported for the date, independent of the listed rows.
    pub bucket_count: u32,
    pub rows: Vec<ConstituentRow>,
}

impl BreakdownView {
    /// Number of constituents listed.
    #[must_use]
    pub fn listed(&self) -> usize {
        self.rows.len()
    }
}

pub fn breakdown_view(series: &DistributionSeries, index: usize, bucket: BucketId) -> BreakdownView {
    let snapshot = series.get(index);
    BreakdownView {
        bucket,
        date: snapshot.map(|s| s.date),
        bucket_count: snapshot.map(|s| s.count(bucket)).unwrap_or(0),
        rows: project(series, index, bucket),
    }
}
