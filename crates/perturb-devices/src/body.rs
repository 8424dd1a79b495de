//! Interfaces devices use to reach the robot body they are attached to.
//!
//! The host passes the body into each per-tick call; devices never hold on
//! to it.

use nalgebra::{UnitQuaternion, Vector3};

use crate::rotor::NUM_ROTORS;

/// Battery state of a body.
pub trait ChargeSource {
    fn available_charge(&self) -> f64;
    fn full_charge(&self) -> f64;
}

/// Pose of a body's origin anchor.
pub trait PoseSource {
    fn position(&self) -> Vector3<f64>;
    fn orientation(&self) -> UnitQuaternion<f64>;
}

/// Receiver of rotor velocity commands.
pub trait RotorSink {
    fn set_velocities(&mut self, velocities: [f64; NUM_ROTORS]);
}

// ---------------------------------------------------------------------------
// RobotBody
// ---------------------------------------------------------------------------

/// Plain body state implementing every body interface.
///
/// Hosts with their own body representation implement the traits directly.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotBody {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub available_charge: f64,
    pub full_charge: f64,
    pub rotor_velocities: [f64; NUM_ROTORS],
}

impl Default for RobotBody {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            available_charge: 1.0,
            full_charge: 1.0,
            rotor_velocities: [0.0; NUM_ROTORS],
        }
    }
}

impl ChargeSource for RobotBody {
    fn available_charge(&self) -> f64 {
        self.available_charge
    }

    fn full_charge(&self) -> f64 {
        self.full_charge
    }
}

impl PoseSource for RobotBody {
    fn position(&self) -> Vector3<f64> {
        self.position
    }

    fn orientation(&self) -> UnitQuaternion<f64> {
        self.orientation
    }
}

impl RotorSink for RobotBody {
    fn set_velocities(&mut self, velocities: [f64; NUM_ROTORS]) {
        self.rotor_velocities = velocities;
    }
}
