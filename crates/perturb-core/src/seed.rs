//! Deterministic seed derivation for named random streams.
//!
//! Every stream in a [`RandomRegistry`](crate::random::RandomRegistry) is
//! seeded from the run's root seed and the stream name, so a whole run is
//! reproducible from one number while distinct streams stay decorrelated.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Derive a child seed from a parent seed and a string key.
///
/// Uses `DefaultHasher` (SipHash-1-3) for fast, deterministic mixing.
///
/// # Example
///
/// ```
/// use perturb_core::seed::derive_seed;
///
/// let child = derive_seed(42, "default");
/// assert_ne!(child, 42); // derived, not identical
/// assert_eq!(child, derive_seed(42, "default")); // deterministic
/// ```
#[must_use]
pub fn derive_seed(parent: u64, key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
