/// Linear map from a value domain onto a pixel range.
///
/// The range may be inverted (pixel y grows downward). A zero-width domain
/// maps every value to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span.abs() < f64::EPSILON {
            return d0;
        }
        d0 + (pixel - r0) / span * (d1 - d0)
    }
}

/// Round step (1, 2 or 5 times a power of ten) giving about `divisions`
/// intervals over `[0, max]`.
#[must_use]
pub fn nice_step(max: f64, divisions: usize) -> f64 {
    let range = max.abs().max(f64::EPSILON);
    let divisions = divisions.max(1) as f64;
    let raw = range / divisions;
    let base = 10f64.powi(raw.log10().floor() as i32);

    match raw / base {
        r if r <= 1.0 => base,
        r if r <= 2.0 => 2.0 * base,
        r if r <= 5.0 => 5.0 * base,
        _ => 10.0 * base,
    }
}
