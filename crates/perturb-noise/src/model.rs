//! Scalar noise models.
//!
//! [`NoiseModel`] is a closed enum with static dispatch: no trait objects,
//! no string comparison at sample time.  Adding a distribution means adding
//! a variant here and a branch in [`NoiseParams`](crate::params::NoiseParams);
//! consumers only ever see [`NoiseInjector`](crate::injector::NoiseInjector).
//!
//! Sampling takes an explicit `&mut dyn RandomSource` so that determinism is
//! guaranteed when the same seed is provided.

use std::fmt;

use perturb_core::error::ConfigError;
use perturb_core::random::RandomSource;
use thiserror::Error;

// ---------------------------------------------------------------------------
// NoiseError
// ---------------------------------------------------------------------------

/// Validation errors for noise model parameters.
///
/// Implements [`Copy`] for cheap propagation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NoiseError {
    /// Uniform level was negative, NaN, or infinite.
    #[error("uniform noise level must be finite and >= 0, got {level}")]
    InvalidLevel { level: f64 },
    /// Range bounds are invalid: `low > high`, NaN, or infinite.
    #[error("range must satisfy low <= high with finite bounds, got [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },
    /// Standard deviation was negative, NaN, or infinite.
    #[error("gaussian stddev must be finite and >= 0, got {value}")]
    InvalidStdDev { value: f64 },
    /// Mean was NaN or infinite.
    #[error("gaussian mean must be finite, got {value}")]
    InvalidMean { value: f64 },
}

impl NoiseError {
    /// Name of the configuration attribute this error is about.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidLevel { .. } => "level",
            Self::InvalidRange { .. } => "range",
            Self::InvalidStdDev { .. } => "stddev",
            Self::InvalidMean { .. } => "mean",
        }
    }
}

impl From<NoiseError> for ConfigError {
    fn from(err: NoiseError) -> Self {
        Self::invalid(err.field(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// NoiseModel
// ---------------------------------------------------------------------------

/// Scalar noise model.
///
/// Models never clamp; restricting the perturbed value to a valid domain is
/// the consumer's job.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum NoiseModel {
    /// No perturbation; samples are always `0.0` and consume no draw.
    #[default]
    None,
    /// Uniform in `[low, high]`.
    Uniform { low: f64, high: f64 },
    /// Gaussian `N(mean, stddev²)`.
    Gaussian { mean: f64, stddev: f64 },
}

// ---------------------------------------------------------------------------
// Constructors (all validate parameters)
// ---------------------------------------------------------------------------

impl NoiseModel {
    /// Symmetric uniform noise in `[-level, level]`.
    ///
    /// A `level` of exactly zero yields [`None`](Self::None): declaring the
    /// model without enabling any noise is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::InvalidLevel`] if `level` is negative, NaN, or
    /// infinite.
    pub fn uniform(level: f64) -> Result<Self, NoiseError> {
        if !level.is_finite() || level < 0.0 {
            return Err(NoiseError::InvalidLevel { level });
        }
        if level == 0.0 {
            return Ok(Self::None);
        }
        Ok(Self::Uniform {
            low: -level,
            high: level,
        })
    }

    /// Uniform noise over an explicit range.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::InvalidRange`] if `low > high` or either bound is
    /// NaN/infinite.
    pub fn uniform_range(low: f64, high: f64) -> Result<Self, NoiseError> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(NoiseError::InvalidRange { low, high });
        }
        Ok(Self::Uniform { low, high })
    }

    /// Gaussian noise with the given mean and standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::InvalidStdDev`] if `stddev` is negative, NaN, or
    /// infinite, and [`NoiseError::InvalidMean`] if `mean` is not finite.
    pub fn gaussian(mean: f64, stddev: f64) -> Result<Self, NoiseError> {
        if !stddev.is_finite() || stddev < 0.0 {
            return Err(NoiseError::InvalidStdDev { value: stddev });
        }
        if !mean.is_finite() {
            return Err(NoiseError::InvalidMean { value: mean });
        }
        Ok(Self::Gaussian { mean, stddev })
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

impl NoiseModel {
    /// Draw one sample.
    ///
    /// [`None`](Self::None) returns `0.0` without touching `rng`; every other
    /// variant makes exactly one call on `rng`.
    pub fn sample(&self, rng: &mut dyn RandomSource) -> f64 {
        match *self {
            Self::None => 0.0,
            Self::Uniform { low, high } => rng.uniform_real(low, high),
            Self::Gaussian { mean, stddev } => rng.gaussian_real(stddev, mean),
        }
    }

    /// Whether sampling this model can produce anything but `0.0`.
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Configuration name of this model.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Uniform { .. } => "uniform",
            Self::Gaussian { .. } => "gaussian",
        }
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Uniform { low, high } => write!(f, "uniform[{low}, {high}]"),
            Self::Gaussian { mean, stddev } => write!(f, "gaussian(mean={mean}, stddev={stddev})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
