//! Where distribution series come from.
//!
//! - [`HttpSource`] - the backend's `GET {base}/distribution` endpoint
//! - [`DemoSource`] - a seeded synthetic series for offline use

use jiff::civil::{Date, Weekday};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng, distr::Distribution};
use rustc_hash::FxHasher;
use serde_json::{Value, json};
use std::hash::{Hash, Hasher};

use scoredist_core::FetchError;
use scoredist_core::model::BucketId;
use scoredist_core::wire::{DistributionQuery, DistributionResponse, RawBucket, RawPrice, RawSnapshot, RawSymbol};

/// A blocking fetcher for one distribution query. Runs on the worker thread.
pub trait DistributionSource: Send {
    fn fetch(&self, query: &DistributionQuery) -> Result<DistributionResponse, FetchError>;

    /// Short description for logs and the status bar.
    fn describe(&self) -> String;
}

// ============================================================================
// HTTP
// ============================================================================

#[cfg(feature = "native")]
pub use http::HttpSource;

#[cfg(feature = "native")]
mod http {
    use std::time::Duration;

    use super::DistributionSource;
    use scoredist_core::FetchError;
    use scoredist_core::wire::{DistributionQuery, DistributionResponse, decode_response};

    /// Longest slice of an error body kept in [`FetchError::Status`].
    const MAX_ERROR_BODY: usize = 200;

    pub struct HttpSource {
        client: reqwest::blocking::Client,
        endpoint: String,
    }

    impl HttpSource {
        pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            Ok(Self {
                client,
                endpoint: format!("{}/distribution", base_url.trim_end_matches('/')),
            })
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    impl DistributionSource for HttpSource {
        fn fetch(&self, query: &DistributionQuery) -> Result<DistributionResponse, FetchError> {
            let response = self
                .client
                .get(&self.endpoint)
                .query(&query.params())
                .send()
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    message: body.chars().take(MAX_ERROR_BODY).collect(),
                });
            }

            tracing::debug!(endpoint = %self.endpoint, bytes = body.len(), "distribution response received");
            Ok(decode_response(&body)?)
        }

        fn describe(&self) -> String {
            self.endpoint.clone()
        }
    }

}

// ============================================================================
// Demo
// ============================================================================

const DEMO_CONSTITUENTS: u32 = 120;
const DEMO_INDUSTRIES: [&str; 6] = ["Technology", "Financials", "Energy", "Healthcare", "Industrials", "Utilities"];
/// Bucket midpoints used to spread constituents around the market breadth level.
const BUCKET_CENTERS: [f64; BucketId::COUNT] = [10.0, 30.0, 50.0, 70.0, 90.0];

/// Deterministic synthetic data: the same query always yields the same series.
#[derive(Debug, Clone, Default)]
pub struct DemoSource {
    /// Extra seed mixed into every query.
    pub seed: u64,
}

impl DemoSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn query_seed(&self, query: &DistributionQuery) -> u64 {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        query.index.hash(&mut hasher);
        query.metric.hash(&mut hasher);
        hasher.finish()
    }
}

impl DistributionSource for DemoSource {
    fn fetch(&self, query: &DistributionQuery) -> Result<DistributionResponse, FetchError> {
        let mut rng = SmallRng::seed_from_u64(self.query_seed(query));
        let breadth_step = rand_distr::Normal::new(0.0, 0.04)
            .map_err(|e| FetchError::Decode(format!("demo breadth distribution: {e}")))?;
        let price_step = rand_distr::Normal::new(0.0003, 0.011)
            .map_err(|e| FetchError::Decode(format!("demo price distribution: {e}")))?;

        let mut breadth: f64 = rng.random_range(0.3..0.7);
        let mut price: f64 = rng.random_range(1_000.0..5_000.0);
        let mut data = Vec::new();

        for date in trading_days(query.start_date, query.end_date) {
            breadth = (breadth + breadth_step.sample(&mut rng)).clamp(0.05, 0.95);
            let open = price;
            price *= (price_step.sample(&mut rng) + (breadth - 0.5) * 0.004).exp();

            let counts = spread(DEMO_CONSTITUENTS, breadth, &mut rng);
            let mut distribution = rustc_hash::FxHashMap::default();
            let mut next_symbol = 1;
            for (bucket, count) in BucketId::ALL.into_iter().zip(counts) {
                let symbols = query
                    .include_symbols
                    .then(|| demo_symbols(bucket, count, &mut next_symbol, &mut rng));
                distribution.insert(
                    bucket.key().to_string(),
                    RawBucket {
                        count: Some(json!(count)),
                        symbols,
                    },
                );
            }

            data.push(RawSnapshot {
                date: date.to_string(),
                distribution,
                total_symbols: Some(json!(DEMO_CONSTITUENTS)),
                price: query.include_price.then(|| RawPrice {
                    open: Some(json!(round2(open))),
                    high: Some(json!(round2(open.max(price)))),
                    low: Some(json!(round2(open.min(price)))),
                    close: Some(json!(round2(price))),
                    volume: Some(json!(rng.random_range(1_000_000..9_000_000))),
                }),
            });
        }

        tracing::debug!(index = %query.index, snapshots = data.len(), "generated demo series");
        Ok(DistributionResponse {
            data,
            base_symbol: Some(format!("{}.DEMO", query.index)),
        })
    }

    fn describe(&self) -> String {
        "demo data".to_string()
    }
}

/// Weekdays in `[start, end]`.
fn trading_days(start: Date, end: Date) -> impl Iterator<Item = Date> {
    start
        .series(jiff::Span::new().days(1))
        .take_while(move |d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Saturday | Weekday::Sunday))
}

/// Split `total` constituents across the buckets, weighted toward the breadth level.
fn spread(total: u32, breadth: f64, rng: &mut SmallRng) -> [u32; BucketId::COUNT] {
    let center = breadth * 100.0;
    let weights: Vec<f64> = BUCKET_CENTERS
        .iter()
        .map(|c| (-((c - center) / 28.0).powi(2)).exp() * rng.random_range(0.8..1.2) + 0.02)
        .collect();
    let sum: f64 = weights.iter().sum();

    let mut counts = [0u32; BucketId::COUNT];
    for (slot, weight) in counts.iter_mut().zip(&weights) {
        *slot = (weight / sum * f64::from(total)).floor() as u32;
    }

    // Hand the rounding remainder to the heaviest bucket.
    let assigned: u32 = counts.iter().sum();
    if let Some(heaviest) = weights
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
    {
        counts[heaviest] += total.saturating_sub(assigned);
    }
    counts
}

fn demo_symbols(bucket: BucketId, count: u32, next_symbol: &mut u32, rng: &mut SmallRng) -> Vec<RawSymbol> {
    let (low, high) = bucket.range();
    (0..count)
        .map(|_| {
            let n = *next_symbol;
            *next_symbol += 1;
            // Every so often upstream sends a label instead of a number.
            let value = if n % 37 == 0 {
                Value::String("n/a".to_string())
            } else {
                json!(round2(rng.random_range(f64::from(low)..f64::from(high))))
            };
            RawSymbol::Detailed {
                symbol: format!("SYM{n:03}"),
                company_name: Some(format!("Demo Holdings {n:03}")),
                industry: Some(DEMO_INDUSTRIES[n as usize % DEMO_INDUSTRIES.len()].to_string()),
                value,
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
