//! Deterministic RNG utilities for reproducible tests.

use perturb_core::random::{RandomHandle, RngStream};

/// Create a fresh, unshared stream handle from a seed.
///
/// All test randomization that goes through injectors should use this to
/// ensure reproducibility.
pub fn seeded_stream(seed: u64) -> RandomHandle {
    RandomHandle::new(RngStream::new("test", seed))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
