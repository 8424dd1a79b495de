//! Named random streams shared by noise injectors.
//!
//! [`RandomSource`] is the capability set the noise layer needs: uniform,
//! Gaussian, and Bernoulli draws.  [`RngStream`] implements it on top of a
//! seeded `ChaCha8Rng`; [`RandomHandle`] is the cloneable handle injectors
//! hold; [`RandomRegistry`] hands out one stream per name.
//!
//! Stepping is single-threaded, so handles share streams through
//! `Rc<RefCell<_>>`.  Every injector holding a handle to the same stream
//! advances that stream's position, which makes the order of draws across
//! consumers part of a run's reproducibility contract.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::error::PreconditionError;
use crate::seed::derive_seed;

/// Well-known name of the stream noise injectors draw from.
pub const DEFAULT_STREAM: &str = "default";

// ---------------------------------------------------------------------------
// RandomSource
// ---------------------------------------------------------------------------

/// A stateful generator of uniform, Gaussian, and Bernoulli draws.
///
/// How far a call advances the underlying generator must not depend on the
/// parameters passed, so that the draw sequence of a run depends only on the
/// order of calls and the seed.
pub trait RandomSource {
    /// Uniform draw from `[low, high]`.  Requires `low <= high`.
    fn uniform_real(&mut self, low: f64, high: f64) -> f64;

    /// Draw from `Normal(mean, stddev)`.  Returns `mean` when `stddev == 0`.
    fn gaussian_real(&mut self, stddev: f64, mean: f64) -> f64;

    /// Bernoulli trial with success probability `p`.
    ///
    /// # Errors
    ///
    /// [`PreconditionError::ProbabilityOutOfRange`] if `p` is outside
    /// `[0, 1]` or NaN.  No draw is consumed in that case.
    fn bernoulli(&mut self, p: f64) -> Result<bool, PreconditionError>;
}

// ---------------------------------------------------------------------------
// RngStream
// ---------------------------------------------------------------------------

/// A named, seeded stream backed by `ChaCha8Rng`.
///
/// Gaussian draws scale a `StandardNormal` sample by hand instead of building
/// a `rand_distr::Normal`, so every call consumes one normal draw whatever the
/// parameters.
#[derive(Clone, Debug)]
pub struct RngStream {
    name: String,
    seed: u64,
    rng: ChaCha8Rng,
}

impl RngStream {
    /// Create a stream positioned at the start of the sequence for `seed`.
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from the current seed.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    /// Restart the sequence from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }
}

impl RandomSource for RngStream {
    fn uniform_real(&mut self, low: f64, high: f64) -> f64 {
        debug_assert!(low <= high, "uniform_real requires low <= high");
        let t: f64 = self.rng.r#gen();
        // Interpolating each bound separately stays finite for any finite
        // bounds, where `high - low` can overflow.
        (low * (1.0 - t) + high * t).max(low).min(high)
    }

    fn gaussian_real(&mut self, stddev: f64, mean: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + stddev * z
    }

    fn bernoulli(&mut self, p: f64) -> Result<bool, PreconditionError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(PreconditionError::ProbabilityOutOfRange { p });
        }
        // `u` lies in [0, 1): p == 0 never succeeds, p == 1 always does.
        let u: f64 = self.rng.r#gen();
        Ok(u < p)
    }
}

// ---------------------------------------------------------------------------
// RandomHandle
// ---------------------------------------------------------------------------

/// Cloneable shared handle to a [`RandomSource`].
///
/// Clones refer to the same underlying stream.
#[derive(Clone)]
pub struct RandomHandle {
    inner: Rc<RefCell<dyn RandomSource>>,
}

impl RandomHandle {
    /// Wrap a source in a fresh handle.
    pub fn new<S: RandomSource + 'static>(source: S) -> Self {
        Self {
            inner: Rc::new(RefCell::new(source)),
        }
    }

    /// Share an already-shared source.
    pub fn from_shared<S: RandomSource + 'static>(source: Rc<RefCell<S>>) -> Self {
        Self { inner: source }
    }

    /// Run `f` with exclusive access to the underlying source.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from inside `f` on a handle to the same
    /// stream.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn RandomSource) -> R) -> R {
        f(&mut *self.inner.borrow_mut())
    }

    pub fn uniform_real(&self, low: f64, high: f64) -> f64 {
        self.with(|src| src.uniform_real(low, high))
    }

    pub fn gaussian_real(&self, stddev: f64, mean: f64) -> f64 {
        self.with(|src| src.gaussian_real(stddev, mean))
    }

    /// See [`RandomSource::bernoulli`].
    ///
    /// # Errors
    ///
    /// [`PreconditionError::ProbabilityOutOfRange`] if `p` is outside `[0, 1]`.
    pub fn bernoulli(&self, p: f64) -> Result<bool, PreconditionError> {
        self.with(|src| src.bernoulli(p))
    }

    /// Whether two handles refer to the same stream.
    pub fn same_stream(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for RandomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomHandle")
            .field("handles", &Rc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// RandomRegistry
// ---------------------------------------------------------------------------

/// Host-owned registry of named streams.
///
/// [`stream`](Self::stream) returns the same stream for the same name, seeded
/// with `derive_seed(root_seed, name)`.  The registry lives as long as the
/// host process; injectors receive handles from it at construction.
#[derive(Debug, Default)]
pub struct RandomRegistry {
    root_seed: u64,
    streams: HashMap<String, Rc<RefCell<RngStream>>>,
}

impl RandomRegistry {
    pub fn new(root_seed: u64) -> Self {
        Self {
            root_seed,
            streams: HashMap::new(),
        }
    }

    pub const fn root_seed(&self) -> u64 {
        self.root_seed
    }

    /// Handle to the stream called `name`, creating it on first request.
    pub fn stream(&mut self, name: &str) -> RandomHandle {
        let root = self.root_seed;
        let stream = self.streams.entry(name.to_owned()).or_insert_with(|| {
            let seed = derive_seed(root, name);
            tracing::debug!(stream = name, seed, "created random stream");
            Rc::new(RefCell::new(RngStream::new(name, seed)))
        });
        RandomHandle::from_shared(Rc::clone(stream))
    }

    /// Handle to [`DEFAULT_STREAM`].
    pub fn default_stream(&mut self) -> RandomHandle {
        self.stream(DEFAULT_STREAM)
    }

    /// Whether a stream called `name` has been created.
    pub fn contains(&self, name: &str) -> bool {
        self.streams.contains_key(name)
    }

    /// Rewind every stream to the start of its sequence.
    pub fn reset(&self) {
        for stream in self.streams.values() {
            stream.borrow_mut().reset();
        }
    }

    /// Change the root seed and reseed every existing stream from it.
    pub fn reseed(&mut self, root_seed: u64) {
        self.root_seed = root_seed;
        for (name, stream) in &self.streams {
            stream.borrow_mut().reseed(derive_seed(root_seed, name));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
