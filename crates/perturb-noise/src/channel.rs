//! Rules consumers use to fold a noise sample into a channel value.
//!
//! Injectors only produce samples.  How a sample combines with the ideal
//! value, and whether the result is clamped, is decided per channel by the
//! consumer through [`Perturbation`] and [`ChannelRange`].

// ---------------------------------------------------------------------------
// Perturbation
// ---------------------------------------------------------------------------

/// How a noise sample combines with an ideal value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Perturbation {
    /// `value + noise`.
    #[default]
    Additive,
    /// `value + value * noise`: the sample is a relative error.
    Relative,
}

impl Perturbation {
    pub fn apply(self, value: f64, noise: f64) -> f64 {
        match self {
            Self::Additive => value + noise,
            Self::Relative => value + value * noise,
        }
    }
}

// ---------------------------------------------------------------------------
// ChannelRange
// ---------------------------------------------------------------------------

/// Closed interval a bounded channel is truncated to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelRange {
    min: f64,
    max: f64,
}

impl ChannelRange {
    /// `[0, 1]`, e.g. a charge fraction.
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };

    /// Clamp `value` into the range.
    pub fn truncate(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_adds() {
        assert!((Perturbation::Additive.apply(1.0, 0.25) - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn relative_scales_by_value() {
        assert!((Perturbation::Relative.apply(200.0, 0.1) - 220.0).abs() < 1e-9);
        assert!(Perturbation::Relative.apply(0.0, 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unit_range_truncates() {
        assert!((ChannelRange::UNIT.truncate(1.2) - 1.0).abs() < f64::EPSILON);
        assert!(ChannelRange::UNIT.truncate(-0.3).abs() < f64::EPSILON);
        assert!((ChannelRange::UNIT.truncate(0.4) - 0.4).abs() < f64::EPSILON);
    }
}
