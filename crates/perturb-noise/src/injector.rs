//! Per-channel noise injector.
//!
//! A [`NoiseInjector`] pairs one [`NoiseModel`] with a handle to a shared
//! random stream.  Consumers own one injector per noisy channel, configure it
//! once before the simulation loop, and call
//! [`inject_noise`](NoiseInjector::inject_noise) every tick.
//!
//! ```
//! use perturb_core::config::ConfigNode;
//! use perturb_core::random::RandomRegistry;
//! use perturb_noise::injector::NoiseInjector;
//!
//! let mut registry = RandomRegistry::new(42);
//! let mut injector = NoiseInjector::new(registry.default_stream());
//! let tag = ConfigNode::new("noise")
//!     .with_attribute("model", "uniform")
//!     .with_attribute("level", 0.1);
//! injector.init(&tag).unwrap();
//!
//! let noisy = 0.5 + injector.inject_noise();
//! assert!((0.4..=0.6).contains(&noisy));
//! ```

use perturb_core::config::ConfigNode;
use perturb_core::error::{ConfigError, PreconditionError};
use perturb_core::random::RandomHandle;

use crate::model::{NoiseError, NoiseModel};
use crate::params::NoiseParams;

/// Noise source for a single channel.
///
/// Starts disabled with [`NoiseModel::None`].  Initialization replaces the
/// model only on success; a failed `init*` call leaves the injector as it
/// was.
#[derive(Clone, Debug)]
pub struct NoiseInjector {
    model: NoiseModel,
    /// Model established by the last successful initialization.
    initial: NoiseModel,
    rng: RandomHandle,
}

impl NoiseInjector {
    /// Create a disabled injector drawing from `rng` once enabled.
    pub fn new(rng: RandomHandle) -> Self {
        Self {
            model: NoiseModel::None,
            initial: NoiseModel::None,
            rng,
        }
    }

    // -----------------------------------------------------------------------
    // Initialization
    // -----------------------------------------------------------------------

    /// Configure from a noise tag (`model`, plus `level` or `stddev`/`mean`).
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for a missing or unknown `model`, an unparsable
    /// parameter, or a negative `level`/`stddev`.
    pub fn init(&mut self, node: &ConfigNode) -> Result<(), ConfigError> {
        let model = NoiseParams::parse_model(node)?;
        self.set_initial(model);
        Ok(())
    }

    /// Configure from the child tag `tag` of `parent`; a missing tag leaves
    /// the injector disabled.
    ///
    /// # Errors
    ///
    /// Same as [`init`](Self::init).
    pub fn init_from_child(&mut self, parent: &ConfigNode, tag: &str) -> Result<(), ConfigError> {
        match parent.child(tag) {
            Some(node) => self.init(node),
            None => Ok(()),
        }
    }

    /// Configure from already-typed parameters.
    ///
    /// # Errors
    ///
    /// [`NoiseError`] when a parameter is out of range.
    pub fn init_from_params(&mut self, params: NoiseParams) -> Result<(), NoiseError> {
        let model = params.into_model()?;
        self.set_initial(model);
        Ok(())
    }

    /// Configure with an already-validated model.
    pub fn init_from_model(&mut self, model: NoiseModel) {
        self.set_initial(model);
    }

    /// Configure `Uniform(-level, level)`; `level == 0` leaves noise disabled.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidLevel`] if `level` is negative or not finite.
    pub fn init_uniform(&mut self, level: f64) -> Result<(), NoiseError> {
        self.init_from_params(NoiseParams::Uniform { level })
    }

    /// Configure uniform noise over an explicit `[low, high]` range.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidRange`] if `low > high` or a bound is not finite.
    pub fn init_uniform_range(&mut self, low: f64, high: f64) -> Result<(), NoiseError> {
        let model = NoiseModel::uniform_range(low, high)?;
        self.set_initial(model);
        Ok(())
    }

    /// Configure `Gaussian(mean, stddev)`.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidStdDev`] / [`NoiseError::InvalidMean`] for
    /// out-of-range parameters.
    pub fn init_gaussian(&mut self, mean: f64, stddev: f64) -> Result<(), NoiseError> {
        self.init_from_params(NoiseParams::Gaussian { mean, stddev })
    }

    fn set_initial(&mut self, model: NoiseModel) {
        tracing::debug!(%model, "noise injection configured");
        self.model = model;
        self.initial = model;
    }

    // -----------------------------------------------------------------------
    // Per-tick operations
    // -----------------------------------------------------------------------

    /// Whether this injector perturbs anything.
    pub const fn enabled(&self) -> bool {
        self.model.is_enabled()
    }

    /// The active model.
    pub const fn model(&self) -> &NoiseModel {
        &self.model
    }

    /// The stream this injector draws from.
    pub const fn rng(&self) -> &RandomHandle {
        &self.rng
    }

    /// One noise sample; `0.0` when disabled.
    ///
    /// This is the only operation that advances the shared stream on behalf
    /// of the model, and a disabled injector never touches it.
    pub fn inject_noise(&self) -> f64 {
        if !self.enabled() {
            return 0.0;
        }
        self.rng.with(|src| self.model.sample(src))
    }

    /// `N` independent samples, drawn in index order.
    pub fn inject_noise_n<const N: usize>(&self) -> [f64; N] {
        std::array::from_fn(|_| self.inject_noise())
    }

    /// Bernoulli trial whose success probability is one injected sample.
    ///
    /// The sample is used as a probability unchanged; configuring a model
    /// whose output stays inside `[0, 1]` is the caller's responsibility.
    /// A disabled injector yields probability `0.0` and therefore `false`,
    /// still consuming the Bernoulli draw.
    ///
    /// # Errors
    ///
    /// [`PreconditionError::ProbabilityOutOfRange`] when the sample falls
    /// outside `[0, 1]`.  The noise draw has already been consumed.
    pub fn bernoulli_event(&self) -> Result<bool, PreconditionError> {
        let p = self.inject_noise();
        self.rng.bernoulli(p)
    }

    /// Restore the model set by the last successful initialization.
    ///
    /// Consumes no draw and does not re-read configuration.
    pub fn reset(&mut self) {
        self.model = self.initial;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
