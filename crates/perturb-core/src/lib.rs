// perturb-core: errors, configuration tree, random streams, and seeds for perturb.

pub mod config;
pub mod error;
pub mod random;
pub mod seed;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::ConfigNode;
    pub use crate::error::{ConfigError, PreconditionError};
    pub use crate::random::{DEFAULT_STREAM, RandomHandle, RandomRegistry, RandomSource, RngStream};
    pub use crate::seed::derive_seed;
}
