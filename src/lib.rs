//! # fiber-dom
//!
//! An incremental renderer that turns a declarative element tree into native
//! nodes without blocking its host for long.
//!
//! Rendering is split into units of work, one per element. A [`Scheduler`]
//! walks a lazily built fiber tree depth-first, performing units until the
//! host's time slice runs low, then yields and resumes exactly where it
//! stopped on the next slice.
//!
//! ## Core Systems
//!
//! - **[`element`]** — Immutable element descriptions, `create_element`, text wrapping
//! - **[`host`]** — The host document capability and a slotmap-backed in-memory document
//! - **[`materialize`]** — One element to one native node; recursive one-shot rendering
//! - **[`fiber`]** — Slotmap arena of fibers with parent/child/sibling links
//! - **[`scheduler`]** — The resumable unit-of-work loop and its async drivers
//! - **[`idle`]** — Deadlines and idle hosts granting time slices (tokio-backed)
//! - **[`config`]** — Scheduler configuration
//! - **[`error`]** — Structural and host-capability errors
//! - **[`testing`]** — Unit-counted budgets, scripted idle hosts, markup helpers
//!
//! [`Scheduler`]: scheduler::Scheduler

// Foundation
pub mod config;
pub mod element;
pub mod error;

// Host side
pub mod host;
pub mod idle;
pub mod materialize;

// Incremental rendering
pub mod fiber;
pub mod scheduler;

// Test support
pub mod testing;

pub use element::{create_element, create_text_element, Element, Props};
pub use error::RenderError;
pub use scheduler::{RenderState, Scheduler, TickReport};
