//! Reference consumers of noise injectors.
//!
//! Each device reads ideal values from a body through the small traits in
//! [`body`], perturbs them with one [`NoiseInjector`] per channel, and applies
//! its own combination and clamping rules.
//!
//! [`NoiseInjector`]: perturb_noise::injector::NoiseInjector

pub mod battery;
pub mod body;
pub mod positioning;
pub mod rotor;
pub mod traits;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::battery::{BatteryReading, BatterySensor};
    pub use crate::body::{ChargeSource, PoseSource, RobotBody, RotorSink};
    pub use crate::positioning::{PositioningReading, PositioningSensor};
    pub use crate::rotor::{NUM_ROTORS, RotorActuator};
    pub use crate::traits::Device;
}
