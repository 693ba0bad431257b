use scoredist_core::ratio::{RatioPoint, SENTINEL_RATIO};

/// Integer with thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Share already in percent (0..=100)
pub fn format_share(percent: f64) -> String {
    format!("{percent:.1}%")
}

pub fn format_ratio_value(ratio: f64) -> String {
    if ratio >= SENTINEL_RATIO {
        format!("{SENTINEL_RATIO:.0}+")
    } else {
        format!("{ratio:.2}")
    }
}

/// Ratio with its counts, e.g. `3.00 (30/10)`
pub fn format_ratio(point: &RatioPoint) -> String {
    let value = if point.is_sentinel() {
        format!("{SENTINEL_RATIO:.0}+")
    } else {
        format!("{:.2}", point.ratio)
    };
    format!(
        "{value} ({}/{})",
        format_count(point.numerator),
        format_count(point.denominator)
    )
}

pub fn format_interval(ms: u64) -> String {
    if ms >= 1_000 {
        format!("{:.1}s", ms as f64 / 1_000.0)
    } else {
        format!("{ms}ms")
    }
}

/// `-` for a missing value
pub fn format_optional(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map_or_else(|| "-".to_string(), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_ratio_marks_sentinel() {
        let date = jiff::civil::date(2024, 1, 2);
        let point = RatioPoint {
            date,
            ratio: SENTINEL_RATIO,
            numerator: 5,
            denominator: 0,
        };
        assert_eq!(format_ratio(&point), "999+ (5/0)");

        let point = RatioPoint {
            date,
            ratio: 3.0,
            numerator: 30,
            denominator: 10,
        };
        assert_eq!(format_ratio(&point), "3.00 (30/10)");
        assert_eq!(format_ratio_value(SENTINEL_RATIO), "999+");
    }

    #[test]
    fn test_format_interval_and_optional() {
        assert_eq!(format_interval(250), "250ms");
        assert_eq!(format_interval(1_500), "1.5s");
        assert_eq!(format_optional(None, format_share), "-");
        assert_eq!(format_optional(Some(66.666), format_share), "66.7%");
    }
}
