//! Deterministic test doubles: budgets counted in units, scripted idle hosts,
//! and markup helpers.
//!
//! Use [`UnitBudget`] and [`ScriptedIdle`] to interrupt a render at exact
//! points without depending on wall-clock time. Use [`render_to_markup`] to
//! capture the finished tree as a string for snapshot-style assertions.

pub mod budget;
pub mod snapshot;

pub use budget::{ScriptedIdle, UnitBudget};
pub use snapshot::{render_to_markup, render_to_markup_in_slices};
