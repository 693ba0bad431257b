//! Backend contract for the distribution endpoint.
//!
//! Request: `GET distribution` with the parameters of [`DistributionQuery`].
//! Response: `{ data: [{date, distribution: {bucket: {count, symbols?}}, total_symbols, price?}], base_symbol? }`.
//!
//! Response types are deliberately loose: counts, totals and prices are kept
//! as raw JSON values and coerced by the normaliser, and symbol entries may
//! be objects or bare strings.

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{BucketId, SelectionContext};

/// Query parameters for one series fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionQuery {
    pub index: String,
    pub start_date: Date,
    pub end_date: Date,
    pub bucket_ranges: String,
    pub metric: String,
    pub include_price: bool,
    pub include_symbols: bool,
}

impl DistributionQuery {
    /// Query for a selection, with the window ending on `today`.
    pub fn for_selection(context: &SelectionContext, today: Date) -> Self {
        let window = context.range.resolve(today);
        Self {
            index: context.index.clone(),
            start_date: window.start,
            end_date: window.end,
            bucket_ranges: BucketId::query_ranges(),
            metric: context.metric.clone(),
            include_price: true,
            include_symbols: true,
        }
    }

    /// Flattened `(name, value)` pairs for a URL query string.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("index", self.index.clone()),
            ("start_date", self.start_date.to_string()),
            ("end_date", self.end_date.to_string()),
            ("bucket_ranges", self.bucket_ranges.clone()),
            ("metric", self.metric.clone()),
            ("include_price", self.include_price.to_string()),
            ("include_symbols", self.include_symbols.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionResponse {
    #[serde(default)]
    pub data: Vec<RawSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub date: String,
    #[serde(default)]
    pub distribution: FxHashMap<String, RawBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_symbols: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<RawPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBucket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<RawSymbol>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSymbol {
    Detailed {
        symbol: String,
        #[serde(default, alias = "companyName", skip_serializing_if = "Option::is_none")]
        company_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        industry: Option<String>,
        #[serde(default)]
        value: Value,
    },
    Bare(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPrice {
    #[serde(default)]
    pub open: Option<Value>,
    #[serde(default)]
    pub high: Option<Value>,
    #[serde(default)]
    pub low: Option<Value>,
    #[serde(default)]
    pub close: Option<Value>,
    #[serde(default)]
    pub volume: Option<Value>,
}

/// Decode a response body.
pub fn decode_response(body: &str) -> Result<DistributionResponse, serde_json::Error> {
    serde_json::from_str(body)
}
