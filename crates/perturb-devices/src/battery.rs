//! Battery level sensor.
//!
//! Reports the charge fraction of a body with optional noise (tag `noise`)
//! and estimates the time left from the change between two readings.

use perturb_core::config::ConfigNode;
use perturb_core::error::ConfigError;
use perturb_core::random::RandomHandle;
use perturb_noise::prelude::*;

use crate::body::ChargeSource;
use crate::traits::{Device, channel_error};

/// Charge changes smaller than this count as no change.
const MIN_CHARGE_DELTA: f64 = 1e-6;

/// Latest battery reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatteryReading {
    /// Charge as a fraction of full charge, in `[0, 1]` once noise is applied.
    pub available_charge: f64,
    /// Estimated seconds until empty; infinite while the charge is steady.
    pub time_left: f64,
}

impl Default for BatteryReading {
    fn default() -> Self {
        Self {
            available_charge: 1.0,
            time_left: f64::INFINITY,
        }
    }
}

/// Battery sensor with one noise channel.
#[derive(Clone, Debug)]
pub struct BatterySensor {
    noise: NoiseInjector,
    reading: BatteryReading,
    /// Simulation clock tick in seconds.
    clock_tick: f64,
}

impl BatterySensor {
    /// Tag of the noise channel.
    pub const NOISE_TAG: &'static str = "noise";

    pub fn new(rng: RandomHandle, clock_tick: f64) -> Self {
        Self {
            noise: NoiseInjector::new(rng),
            reading: BatteryReading::default(),
            clock_tick,
        }
    }

    pub const fn noise(&self) -> &NoiseInjector {
        &self.noise
    }

    pub const fn reading(&self) -> &BatteryReading {
        &self.reading
    }

    /// Sample the body's battery.
    ///
    /// The charge fraction is only clamped to `[0, 1]` when noise is enabled.
    pub fn update(&mut self, battery: &impl ChargeSource) -> &BatteryReading {
        let old_charge = self.reading.available_charge;
        let full = battery.full_charge();
        let mut charge = if full > 0.0 {
            battery.available_charge() / full
        } else {
            0.0
        };
        if self.noise.enabled() {
            let noisy = Perturbation::Additive.apply(charge, self.noise.inject_noise());
            charge = ChannelRange::UNIT.truncate(noisy);
        }
        self.reading.available_charge = charge;

        let diff = old_charge - charge;
        self.reading.time_left = if diff.abs() > MIN_CHARGE_DELTA {
            old_charge * self.clock_tick / diff
        } else {
            f64::INFINITY
        };
        &self.reading
    }
}

impl Device for BatterySensor {
    fn init(&mut self, node: &ConfigNode) -> Result<(), ConfigError> {
        self.noise
            .init_from_child(node, Self::NOISE_TAG)
            .map_err(channel_error(self.name(), Self::NOISE_TAG))?;
        tracing::debug!(device = self.name(), noise = %self.noise.model(), "initialized");
        Ok(())
    }

    fn reset(&mut self) {
        self.noise.reset();
        self.reading = BatteryReading::default();
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "battery sensor"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RobotBody;
    use perturb_test_utils::{ScriptedSource, seeded_stream};

    const TICK: f64 = 0.1;

    fn body(charge: f64) -> RobotBody {
        RobotBody {
            available_charge: charge,
            full_charge: 2.0,
            ..RobotBody::default()
        }
    }

    fn noise_config(model: &str, level: f64) -> ConfigNode {
        ConfigNode::new("battery").with_child(
            ConfigNode::new("noise")
                .with_attribute("model", model)
                .with_attribute("level", level),
        )
    }

    #[test]
    fn noiseless_reading_is_charge_fraction() {
        let mut sensor = BatterySensor::new(seeded_stream(1), TICK);
        sensor.init(&ConfigNode::new("battery")).unwrap();
        let reading = sensor.update(&body(1.0));
        assert!((reading.available_charge - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn noise_is_added_then_clamped() {
        let (handle, _) = ScriptedSource::new([0.3, -0.9]).into_shared();
        let mut sensor = BatterySensor::new(handle, TICK);
        sensor.init(&noise_config("uniform", 1.0)).unwrap();

        let reading = *sensor.update(&body(1.6));
        assert!((reading.available_charge - 1.0).abs() < f64::EPSILON);

        let reading = *sensor.update(&body(1.0));
        assert!(reading.available_charge.abs() < f64::EPSILON);
    }

    #[test]
    fn uniform_noise_stays_in_unit_range() {
        let mut sensor = BatterySensor::new(seeded_stream(5), TICK);
        sensor.init(&noise_config("uniform", 0.5)).unwrap();
        for _ in 0..1000 {
            let charge = sensor.update(&body(1.8)).available_charge;
            assert!((0.0..=1.0).contains(&charge));
        }
    }

    #[test]
    fn time_left_from_discharge_rate() {
        let mut sensor = BatterySensor::new(seeded_stream(1), TICK);
        sensor.init(&ConfigNode::new("battery")).unwrap();
        sensor.update(&body(2.0));
        let reading = sensor.update(&body(1.8));
        // old 1.0, new 0.9: 1.0 * 0.1 / 0.1 = 1.0
        assert!((reading.time_left - 1.0).abs() < 1e-9);
    }

    #[test]
    fn steady_charge_has_infinite_time_left() {
        let mut sensor = BatterySensor::new(seeded_stream(1), TICK);
        sensor.init(&ConfigNode::new("battery")).unwrap();
        sensor.update(&body(1.0));
        assert!(sensor.update(&body(1.0)).time_left.is_infinite());
    }

    #[test]
    fn empty_full_charge_reads_zero() {
        let mut sensor = BatterySensor::new(seeded_stream(1), TICK);
        let empty = RobotBody {
            full_charge: 0.0,
            ..RobotBody::default()
        };
        assert!(sensor.update(&empty).available_charge.abs() < f64::EPSILON);
    }

    #[test]
    fn bad_noise_config_names_device_and_channel() {
        let mut sensor = BatterySensor::new(seeded_stream(1), TICK);
        let err = sensor.init(&noise_config("uniform", -0.2)).unwrap_err();
        assert_eq!(err.field(), Some("level"));
        assert!(err.to_string().starts_with("battery sensor: channel `noise`:"));
        assert!(!sensor.noise().enabled());
    }

    #[test]
    fn reset_restores_default_reading_and_noise() {
        let mut sensor = BatterySensor::new(seeded_stream(1), TICK);
        sensor.init(&noise_config("uniform", 0.1)).unwrap();
        sensor.update(&body(0.4));
        sensor.reset();
        assert_eq!(*sensor.reading(), BatteryReading::default());
        assert!(sensor.noise().enabled());
    }
}
