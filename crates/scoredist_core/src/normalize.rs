//! Raw payload to [`DistributionSeries`].
//!
//! Shape problems inside a snapshot (missing bucket, unreadable count,
//! total mismatch, duplicate date) are absorbed: the value defaults to zero
//! or the later record wins, and a [`DataAnomaly`] is recorded. A date that
//! cannot be parsed fails the whole load, since the series order would be
//! meaningless.

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::FetchError;
use crate::model::{
    BucketCounts, BucketId, DataAnomaly, DetailValue, DistributionSeries, DistributionSnapshot,
    PriceBar, SelectionContext, SymbolBreakdown, SymbolDetail,
};
use crate::wire::{DistributionResponse, RawPrice, RawSnapshot, RawSymbol};

/// Normalise a decoded response for `context`.
pub fn normalize(
    response: DistributionResponse,
    context: &SelectionContext,
) -> Result<DistributionSeries, FetchError> {
    let mut anomalies = Vec::new();
    let mut by_date: FxHashMap<Date, DistributionSnapshot> = FxHashMap::default();

    for raw in response.data {
        let snapshot = normalize_snapshot(raw, &mut anomalies)?;
        let date = snapshot.date;
        if by_date.insert(date, snapshot).is_some() {
            anomalies.push(DataAnomaly::DuplicateDate { date });
        }
    }

    let mut snapshots: Vec<DistributionSnapshot> = by_date.into_values().collect();
    snapshots.sort_unstable_by_key(|s| s.date);

    let base_symbol = resolve_base_symbol(response.base_symbol, &context.index);

    if !anomalies.is_empty() {
        tracing::warn!(
            index = %context.index,
            metric = %context.metric,
            count = anomalies.len(),
            first = ?anomalies.first(),
            "distribution payload had shape anomalies; defaults applied"
        );
    }
    tracing::debug!(
        index = %context.index,
        snapshots = snapshots.len(),
        base_symbol = ?base_symbol,
        "normalised distribution series"
    );

    Ok(DistributionSeries::new(
        snapshots,
        context.clone(),
        base_symbol,
        anomalies,
    ))
}

fn normalize_snapshot(
    raw: RawSnapshot,
    anomalies: &mut Vec<DataAnomaly>,
) -> Result<DistributionSnapshot, FetchError> {
    let date = parse_date(&raw.date)?;

    let mut counts = BucketCounts::default();
    let mut seen = [false; BucketId::COUNT];
    let mut breakdown = SymbolBreakdown::default();
    let mut has_symbols = false;

    for (key, bucket) in raw.distribution {
        let Some(id) = BucketId::from_key(&key) else {
            anomalies.push(DataAnomaly::UnknownBucket { date, key });
            continue;
        };
        seen[id.index()] = true;

        match bucket.count.as_ref().map(loose_count) {
            Some(Some(count)) => counts.set(id, count),
            _ => anomalies.push(DataAnomaly::UnreadableCount {
                date,
                key: key.clone(),
            }),
        }

        if let Some(symbols) = bucket.symbols {
            has_symbols = true;
            breakdown.insert(id, symbols.into_iter().map(symbol_detail).collect());
        }
    }

    for bucket in BucketId::ALL {
        if !seen[bucket.index()] {
            anomalies.push(DataAnomaly::MissingBucket { date, bucket });
        }
    }

    let summed = counts.total();
    let total_constituents = match raw.total_symbols.as_ref().and_then(loose_count).map(u64::from) {
        Some(reported) => {
            if reported != summed {
                anomalies.push(DataAnomaly::TotalMismatch {
                    date,
                    reported,
                    summed,
                });
            }
            reported
        }
        None => {
            anomalies.push(DataAnomaly::MissingTotal { date });
            summed
        }
    };

    Ok(DistributionSnapshot {
        date,
        bucket_counts: counts,
        total_constituents,
        price: raw.price.map(price_bar).filter(|p| !p.is_empty()),
        symbol_breakdown: has_symbols.then_some(breakdown),
    })
}

/// Accepts `YYYY-MM-DD` and datetime strings starting with one.
fn parse_date(value: &str) -> Result<Date, FetchError> {
    let trimmed = value.trim();
    trimmed
        .parse::<Date>()
        .or_else(|_| trimmed.get(..10).unwrap_or(trimmed).parse::<Date>())
        .map_err(|_| FetchError::InvalidDate {
            value: value.to_string(),
        })
}

/// Surface the backend's resolved symbol only when it says something new.
fn resolve_base_symbol(base_symbol: Option<String>, index: &str) -> Option<String> {
    base_symbol
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(index))
}

/// Non-negative integer from a number or numeric string.
fn loose_count(value: &Value) -> Option<u32> {
    let n = loose_f64(value)?;
    if n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n.round() as u32)
}

fn loose_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn price_bar(raw: RawPrice) -> PriceBar {
    let field = |v: Option<Value>| v.as_ref().and_then(loose_f64);
    PriceBar {
        open: field(raw.open),
        high: field(raw.high),
        low: field(raw.low),
        close: field(raw.close),
        volume: field(raw.volume),
    }
}

fn symbol_detail(raw: RawSymbol) -> SymbolDetail {
    match raw {
        RawSymbol::Detailed {
            symbol,
            company_name,
            industry,
            value,
        } => SymbolDetail {
            symbol,
            company_name,
            industry,
            value: detail_value(value),
        },
        RawSymbol::Bare(symbol) => SymbolDetail {
            symbol,
            company_name: None,
            industry: None,
            value: DetailValue::Missing,
        },
    }
}

fn detail_value(value: Value) -> DetailValue {
    match value {
        Value::Null => DetailValue::Missing,
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map_or_else(|| DetailValue::Label(n.to_string()), DetailValue::Number),
        Value::String(s) => DetailValue::Label(s),
        other => DetailValue::Label(other.to_string()),
    }
}
