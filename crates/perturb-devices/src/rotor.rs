//! Quadrotor rotor actuator.
//!
//! Commanded rotor velocities are perturbed multiplicatively (`v + v * noise`)
//! before they reach the body.  The noise channel (tag `noise`) is built
//! through [`NoiseInjectorFactory`], so an unconfigured actuator holds no
//! injector at all.

use perturb_core::config::ConfigNode;
use perturb_core::error::ConfigError;
use perturb_core::random::RandomHandle;
use perturb_noise::prelude::*;

use crate::body::RotorSink;
use crate::traits::{Device, channel_error};

/// Number of rotors on a quadrotor.
pub const NUM_ROTORS: usize = 4;

/// Rotor actuator with one relative noise channel shared by all rotors.
#[derive(Clone, Debug)]
pub struct RotorActuator {
    noise: Option<NoiseInjector>,
    rng: RandomHandle,
    velocities: [f64; NUM_ROTORS],
}

impl RotorActuator {
    pub const NOISE_TAG: &'static str = "noise";

    pub fn new(rng: RandomHandle) -> Self {
        Self {
            noise: None,
            rng,
            velocities: [0.0; NUM_ROTORS],
        }
    }

    pub const fn noise(&self) -> Option<&NoiseInjector> {
        self.noise.as_ref()
    }

    /// Velocities as they will be applied, noise included.
    pub const fn velocities(&self) -> &[f64; NUM_ROTORS] {
        &self.velocities
    }

    /// Command new rotor velocities.
    ///
    /// With noise enabled, one draw is taken per rotor in rotor order.
    pub fn set_rotor_velocities(&mut self, commanded: [f64; NUM_ROTORS]) {
        self.velocities = match &self.noise {
            Some(noise) if noise.enabled() => {
                commanded.map(|v| Perturbation::Relative.apply(v, noise.inject_noise()))
            }
            _ => commanded,
        };
    }

    /// Push the current velocities to the body.
    pub fn update(&self, body: &mut impl RotorSink) {
        body.set_velocities(self.velocities);
    }
}

impl Device for RotorActuator {
    fn init(&mut self, node: &ConfigNode) -> Result<(), ConfigError> {
        self.noise = NoiseInjectorFactory::create_from_child(node, Self::NOISE_TAG, &self.rng)
            .map_err(channel_error(self.name(), Self::NOISE_TAG))?;
        match &self.noise {
            Some(noise) => tracing::debug!(device = self.name(), noise = %noise.model(), "initialized"),
            None => tracing::debug!(device = self.name(), "initialized without noise"),
        }
        Ok(())
    }

    fn reset(&mut self) {
        if let Some(noise) = &mut self.noise {
            noise.reset();
        }
        self.velocities = [0.0; NUM_ROTORS];
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "rotor actuator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RobotBody;
    use perturb_test_utils::{ScriptedSource, seeded_stream};

    fn noise_config(level: f64) -> ConfigNode {
        ConfigNode::new("rotors").with_child(
            ConfigNode::new("noise")
                .with_attribute("model", "uniform")
                .with_attribute("level", level),
        )
    }

    #[test]
    fn unconfigured_actuator_passes_velocities_through() {
        let mut rotors = RotorActuator::new(seeded_stream(1));
        rotors.init(&ConfigNode::new("rotors")).unwrap();
        assert!(rotors.noise().is_none());

        rotors.set_rotor_velocities([1.0, 2.0, 3.0, 4.0]);
        let mut body = RobotBody::default();
        rotors.update(&mut body);
        assert_eq!(body.rotor_velocities, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn model_none_builds_no_injector() {
        let mut rotors = RotorActuator::new(seeded_stream(1));
        let config = ConfigNode::new("rotors")
            .with_child(ConfigNode::new("noise").with_attribute("model", "none"));
        rotors.init(&config).unwrap();
        assert!(rotors.noise().is_none());
    }

    #[test]
    fn noise_is_relative_per_rotor_in_order() {
        let (handle, shared) = ScriptedSource::new([0.1, -0.1, 0.5, 0.0]).into_shared();
        let mut rotors = RotorActuator::new(handle);
        rotors.init(&noise_config(0.5)).unwrap();

        rotors.set_rotor_velocities([100.0, 100.0, 200.0, 300.0]);
        let expected = [110.0, 90.0, 300.0, 300.0];
        for (got, want) in rotors.velocities().iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
        assert_eq!(shared.borrow().calls().len(), NUM_ROTORS);
    }

    #[test]
    fn zero_velocity_stays_zero() {
        let mut rotors = RotorActuator::new(seeded_stream(3));
        rotors.init(&noise_config(0.5)).unwrap();
        rotors.set_rotor_velocities([0.0; NUM_ROTORS]);
        assert_eq!(*rotors.velocities(), [0.0; NUM_ROTORS]);
    }

    #[test]
    fn bad_config_names_device_and_channel() {
        let mut rotors = RotorActuator::new(seeded_stream(1));
        let err = rotors.init(&noise_config(-1.0)).unwrap_err();
        assert!(err.to_string().starts_with("rotor actuator: channel `noise`:"));
        assert_eq!(err.field(), Some("level"));
    }

    #[test]
    fn reset_zeroes_velocities_and_keeps_noise() {
        let mut rotors = RotorActuator::new(seeded_stream(1));
        rotors.init(&noise_config(0.1)).unwrap();
        rotors.set_rotor_velocities([5.0; NUM_ROTORS]);
        rotors.reset();
        assert_eq!(*rotors.velocities(), [0.0; NUM_ROTORS]);
        assert!(rotors.noise().is_some_and(NoiseInjector::enabled));
    }
}
