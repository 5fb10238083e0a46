//! Continuous and ordinal scales for chart layout.

/// Maps a continuous domain linearly onto a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// A degenerate domain maps every value to the middle of the range.
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }
}

/// Splits a range into `count` equal bands separated by inner padding.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    start: f64,
    step: f64,
    bandwidth: f64,
    count: usize,
}

impl BandScale {
    /// `padding_inner` and `padding_outer` are fractions of a step. With
    /// `round` set, step, start and bandwidth snap to whole pixels.
    pub fn new(
        count: usize,
        range: (f64, f64),
        padding_inner: f64,
        padding_outer: f64,
        round: bool,
    ) -> Self {
        let (r0, r1) = range;
        let (start, stop) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let n = count as f64;

        let mut step = (stop - start) / (n - padding_inner + padding_outer * 2.0).max(1.0);
        if round {
            step = step.floor();
        }
        // Leftover space is centered.
        let mut start = start + (stop - start - step * (n - padding_inner)) * 0.5;
        let mut bandwidth = step * (1.0 - padding_inner);
        if round {
            start = start.round();
            bandwidth = bandwidth.round();
        }

        Self { start, step, bandwidth, count }
    }

    /// Start of band `index`, or `None` when outside the domain.
    pub fn position(&self, index: usize) -> Option<f64> {
        (index < self.count).then(|| self.start + self.step * index as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
