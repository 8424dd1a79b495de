//! Construct injectors straight from configuration.

use perturb_core::config::ConfigNode;
use perturb_core::error::ConfigError;
use perturb_core::random::RandomHandle;

use crate::injector::NoiseInjector;
use crate::params::NoiseParams;

/// Builds [`NoiseInjector`]s from noise tags.
///
/// Each call returns an independent injector; nothing is cached.  Injectors
/// built against the same handle share its stream but keep their own model.
pub struct NoiseInjectorFactory;

impl NoiseInjectorFactory {
    /// Build an injector from a noise tag.
    ///
    /// Returns `Ok(None)` for `model = "none"`.  Callers treat "no injector"
    /// and a disabled injector the same way, so a `uniform` tag with a zero
    /// `level` still yields `Some` disabled injector.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`NoiseInjector::init`].
    pub fn create(node: &ConfigNode, rng: &RandomHandle) -> Result<Option<NoiseInjector>, ConfigError> {
        let params = NoiseParams::from_node(node)?;
        if params == NoiseParams::None {
            return Ok(None);
        }
        let mut injector = NoiseInjector::new(rng.clone());
        injector.init_from_params(params)?;
        Ok(Some(injector))
    }

    /// Build an injector from the child tag `tag` of `parent`.  A missing tag
    /// behaves like `model = "none"`.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub fn create_from_child(
        parent: &ConfigNode,
        tag: &str,
        rng: &RandomHandle,
    ) -> Result<Option<NoiseInjector>, ConfigError> {
        parent
            .child(tag)
            .map_or(Ok(None), |node| Self::create(node, rng))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
