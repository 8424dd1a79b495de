//! Configurable noise injection for sensor readings and actuator commands.
//!
//! `perturb-noise` turns an ideal channel value into a realistic noisy one.
//! The perturbation is chosen at configuration time and sampled every
//! simulation tick from an explicitly passed, seeded random stream, so runs
//! are reproducible.
//!
//! # Architecture
//!
//! - [`NoiseModel`](model::NoiseModel) is a closed enum (`None`, `Uniform`,
//!   `Gaussian`).  All dispatch is static via `match`.
//! - [`NoiseParams`](params::NoiseParams) is the typed form of a noise tag and the
//!   only place model names are parsed.
//! - [`NoiseInjector`](injector::NoiseInjector) owns one model and a handle to
//!   a shared stream; consumers keep one per noisy channel.
//! - [`NoiseInjectorFactory`](factory::NoiseInjectorFactory) builds injectors
//!   directly from configuration.
//! - [`channel`] holds the combination and clamping rules consumers apply.
//!
//! # Quick Start
//!
//! ```
//! use perturb_core::prelude::*;
//! use perturb_noise::prelude::*;
//!
//! let mut registry = RandomRegistry::new(42);
//! let mut noise = NoiseInjector::new(registry.default_stream());
//! noise.init_gaussian(0.0, 0.01).unwrap();
//! let noisy = 1.0 + noise.inject_noise();
//! assert!(noisy.is_finite());
//! ```

pub mod channel;
pub mod factory;
pub mod injector;
pub mod model;
pub mod params;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::channel::{ChannelRange, Perturbation};
    pub use crate::factory::NoiseInjectorFactory;
    pub use crate::injector::NoiseInjector;
    pub use crate::model::{NoiseError, NoiseModel};
    pub use crate::params::NoiseParams;
}
