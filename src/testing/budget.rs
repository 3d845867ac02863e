//! Unit-counted deadlines and a scripted idle host.

use std::cell::Cell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::idle::{Deadline, IdleHost};

// ---------------------------------------------------------------------------
// UnitBudget
// ---------------------------------------------------------------------------

/// A deadline that allows a fixed number of units of work.
///
/// The work loop checks the deadline once after every unit that leaves work
/// behind, and each check consumes one unit. `UnitBudget::new(n)` therefore
/// yields after exactly `n` units (and after one unit when `n` is zero, since
/// the first unit of a slice always runs).
#[derive(Debug)]
pub struct UnitBudget {
    remaining: Cell<usize>,
}

impl UnitBudget {
    pub fn new(units: usize) -> Self {
        Self {
            remaining: Cell::new(units),
        }
    }

    /// Units not yet consumed.
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }
}

impl Deadline for UnitBudget {
    fn time_remaining(&self) -> Duration {
        let left = self.remaining.get().saturating_sub(1);
        self.remaining.set(left);
        if left > 0 {
            Duration::MAX
        } else {
            Duration::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedIdle
// ---------------------------------------------------------------------------

/// An idle host that grants a scripted sequence of unit budgets.
///
/// Once the script runs out every slice gets `fallback` units. Each slice
/// yields to the tokio runtime first, like [`TokioIdle`](crate::idle::TokioIdle).
/// The number of slices granted so far is available through
/// [`slices`](Self::slices).
#[derive(Debug, Clone)]
pub struct ScriptedIdle {
    script: VecDeque<usize>,
    fallback: usize,
    slices: usize,
}

impl ScriptedIdle {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: usize::MAX,
            slices: 0,
        }
    }

    /// Every slice allows exactly `units` units.
    pub fn uniform(units: usize) -> Self {
        Self::new([]).with_fallback(units)
    }

    /// Budget used once the script is exhausted (builder).
    pub fn with_fallback(mut self, units: usize) -> Self {
        self.fallback = units;
        self
    }

    pub fn slices(&self) -> usize {
        self.slices
    }
}

impl IdleHost for ScriptedIdle {
    type Deadline = UnitBudget;

    async fn next_slice(&mut self) -> UnitBudget {
        tokio::task::yield_now().await;
        self.slices += 1;
        UnitBudget::new(self.script.pop_front().unwrap_or(self.fallback))
    }
}
