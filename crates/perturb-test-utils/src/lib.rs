//! Shared test fixtures and utilities for perturb crates.
//!
//! Provides seeded random streams, a scripted [`RandomSource`] that replays
//! fixed values, and sample statistics for distribution checks.
//!
//! [`RandomSource`]: perturb_core::random::RandomSource

pub mod mocks;
pub mod rng;
pub mod stats;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use mocks::{Draw, ScriptedSource};
pub use rng::seeded_stream;
pub use stats::{SampleStats, sample_stats};
