//! Summary statistics for distribution checks in tests.

/// Mean, population standard deviation, and extremes of a sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleStats {
    pub count: usize,
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

/// Compute [`SampleStats`] for `samples`.  An empty slice yields all zeros.
#[allow(clippy::cast_precision_loss)]
pub fn sample_stats(samples: &[f64]) -> SampleStats {
    if samples.is_empty() {
        return SampleStats {
            count: 0,
            mean: 0.0,
            stddev: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    SampleStats {
        count: samples.len(),
        mean,
        stddev: variance.sqrt(),
        min: samples.iter().copied().fold(f64::INFINITY, f64::min),
        max: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}
