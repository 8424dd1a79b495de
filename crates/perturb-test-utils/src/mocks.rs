//! Mock implementations of core traits for testing.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use perturb_core::error::PreconditionError;
use perturb_core::random::{RandomHandle, RandomSource};

// ---------------------------------------------------------------------------
// Draw
// ---------------------------------------------------------------------------

/// One recorded call on a [`ScriptedSource`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Draw {
    Uniform { low: f64, high: f64 },
    Gaussian { stddev: f64, mean: f64 },
    Bernoulli { p: f64 },
}

// ---------------------------------------------------------------------------
// ScriptedSource
// ---------------------------------------------------------------------------

/// A [`RandomSource`] that replays queued values and records every call.
///
/// Uniform and Gaussian draws pop the next queued value verbatim, ignoring
/// the distribution parameters; once the queue is empty they return `0.0`.
/// Bernoulli draws succeed when the popped value is below `p`.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    values: VecDeque<f64>,
    calls: Vec<Draw>,
}

impl ScriptedSource {
    /// Create a source that will replay `values` in order.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            calls: Vec::new(),
        }
    }

    /// Wrap into a shared handle, keeping a second reference for inspection.
    pub fn into_shared(self) -> (RandomHandle, Rc<RefCell<Self>>) {
        let shared = Rc::new(RefCell::new(self));
        (RandomHandle::from_shared(Rc::clone(&shared)), shared)
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[Draw] {
        &self.calls
    }

    /// Values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    fn next_value(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(0.0)
    }
}

impl RandomSource for ScriptedSource {
    fn uniform_real(&mut self, low: f64, high: f64) -> f64 {
        self.calls.push(Draw::Uniform { low, high });
        self.next_value()
    }

    fn gaussian_real(&mut self, stddev: f64, mean: f64) -> f64 {
        self.calls.push(Draw::Gaussian { stddev, mean });
        self.next_value()
    }

    fn bernoulli(&mut self, p: f64) -> Result<bool, PreconditionError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(PreconditionError::ProbabilityOutOfRange { p });
        }
        self.calls.push(Draw::Bernoulli { p });
        Ok(self.next_value() < p)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
