//! Positioning sensor.
//!
//! Reports the position and orientation of a body.  Three independent noise
//! channels are available:
//!
//! | tag           | perturbs                                   |
//! |---------------|--------------------------------------------|
//! | `pos_noise`   | each position component                    |
//! | `angle_noise` | rotation angle, in degrees                 |
//! | `axis_noise`  | each rotation axis component               |
//!
//! The angle and axis are recombined into a quaternion, so `angle_noise` and
//! `axis_noise` usually appear together.
//!
//! Draws per update, when any channel is enabled: position x, y, z, then
//! angle, then axis x, y, z.  Disabled channels draw nothing.

use nalgebra::{Unit, UnitQuaternion, Vector3};
use perturb_core::config::ConfigNode;
use perturb_core::error::ConfigError;
use perturb_core::random::RandomHandle;
use perturb_noise::prelude::*;

use crate::body::PoseSource;
use crate::traits::{Device, channel_error};

/// Latest positioning reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositioningReading {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Default for PositioningReading {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
        }
    }
}

/// Positioning sensor with position, angle, and axis noise channels.
#[derive(Clone, Debug)]
pub struct PositioningSensor {
    position_noise: NoiseInjector,
    angle_noise: NoiseInjector,
    axis_noise: NoiseInjector,
    reading: PositioningReading,
}

impl PositioningSensor {
    pub const POSITION_TAG: &'static str = "pos_noise";
    pub const ANGLE_TAG: &'static str = "angle_noise";
    pub const AXIS_TAG: &'static str = "axis_noise";

    /// All three channels draw from `rng`.
    pub fn new(rng: &RandomHandle) -> Self {
        Self {
            position_noise: NoiseInjector::new(rng.clone()),
            angle_noise: NoiseInjector::new(rng.clone()),
            axis_noise: NoiseInjector::new(rng.clone()),
            reading: PositioningReading::default(),
        }
    }

    pub const fn position_noise(&self) -> &NoiseInjector {
        &self.position_noise
    }

    pub const fn angle_noise(&self) -> &NoiseInjector {
        &self.angle_noise
    }

    pub const fn axis_noise(&self) -> &NoiseInjector {
        &self.axis_noise
    }

    pub const fn reading(&self) -> &PositioningReading {
        &self.reading
    }

    fn any_enabled(&self) -> bool {
        self.position_noise.enabled() || self.angle_noise.enabled() || self.axis_noise.enabled()
    }

    /// Sample the body's pose.
    pub fn update(&mut self, body: &impl PoseSource) -> &PositioningReading {
        self.reading.position = body.position();
        let orientation = body.orientation();
        if !self.any_enabled() {
            self.reading.orientation = orientation;
            return &self.reading;
        }

        let position_noise = self.position_noise.inject_noise_n::<3>();
        self.reading.position = perturb_axes(self.reading.position, position_noise);

        let (axis, angle) = orientation
            .axis_angle()
            .unwrap_or((Vector3::z_axis(), 0.0));
        let angle = Perturbation::Additive.apply(angle, self.angle_noise.inject_noise().to_radians());
        let perturbed = perturb_axes(axis.into_inner(), self.axis_noise.inject_noise_n::<3>());
        // A perturbation that cancels the axis keeps the unperturbed one.
        let axis = Unit::try_new(perturbed, f64::EPSILON).unwrap_or(axis);
        self.reading.orientation = UnitQuaternion::from_axis_angle(&axis, angle);
        &self.reading
    }
}

fn perturb_axes(value: Vector3<f64>, noise: [f64; 3]) -> Vector3<f64> {
    Vector3::from_fn(|i, _| Perturbation::Additive.apply(value[i], noise[i]))
}

impl Device for PositioningSensor {
    fn init(&mut self, node: &ConfigNode) -> Result<(), ConfigError> {
        let channels = [
            (&mut self.position_noise, Self::POSITION_TAG),
            (&mut self.angle_noise, Self::ANGLE_TAG),
            (&mut self.axis_noise, Self::AXIS_TAG),
        ];
        for (injector, tag) in channels {
            injector
                .init_from_child(node, tag)
                .map_err(channel_error("positioning sensor", tag))?;
        }
        tracing::debug!(
            device = self.name(),
            position = %self.position_noise.model(),
            angle = %self.angle_noise.model(),
            axis = %self.axis_noise.model(),
            "initialized"
        );
        Ok(())
    }

    fn reset(&mut self) {
        self.position_noise.reset();
        self.angle_noise.reset();
        self.axis_noise.reset();
        self.reading = PositioningReading::default();
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "positioning sensor"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
