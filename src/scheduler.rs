//! Work scheduler: the cooperative, resumable render loop.
//!
//! A [`Scheduler`] owns the host document, the fiber tree of the current
//! render and the cursor naming the next unit of work. Each unit materializes
//! one fiber, attaches it to its parent's native node, expands its children
//! and moves the cursor one step along a depth-first pre-order walk. Units are
//! atomic; the loop may only stop between them, so a render can be spread over
//! any number of host time slices and always produces the same host operations
//! in the same order.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::config::SchedulerConfig;
use crate::element::Element;
use crate::error::{HostError, RenderError};
use crate::fiber::{FiberId, FiberTree};
use crate::host::HostDocument;
use crate::idle::{Deadline, IdleHost};
use crate::materialize::instantiate_with;

// ---------------------------------------------------------------------------
// RenderState / TickReport
// ---------------------------------------------------------------------------

/// Where the scheduler is in its render lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    /// Nothing to do: no render requested yet, or the last one completed.
    #[default]
    Idle,
    /// A render has units of work left.
    Working,
    /// The last render hit an error. Its partial tree is left as is.
    Failed,
}

/// Outcome of one [`Scheduler::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Units of work performed in this slice.
    pub units: usize,
    /// The slice ran out before the work did.
    pub yielded: bool,
    /// The render finished during this slice.
    pub complete: bool,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Incremental renderer over a host document.
///
/// # Examples
///
/// ```
/// use fiber_dom::element::{create_element, Props};
/// use fiber_dom::host::MemoryDocument;
/// use fiber_dom::idle::Unbounded;
/// use fiber_dom::scheduler::Scheduler;
///
/// let mut doc = MemoryDocument::new();
/// let container = doc.create_container("root");
/// let mut scheduler = Scheduler::new(doc);
///
/// let el = create_element("div", Some(Props::new().with("id", "foo")), ["hi"]);
/// scheduler.schedule_render(el, container).unwrap();
/// scheduler.tick(&Unbounded).unwrap();
///
/// assert_eq!(scheduler.document().inner_markup(container), r#"<div id="foo">hi</div>"#);
/// ```
#[derive(Debug)]
pub struct Scheduler<D: HostDocument> {
    document: D,
    config: SchedulerConfig,
    fibers: FiberTree<D::Node>,
    container: Option<D::Node>,
    next_unit_of_work: Option<FiberId>,
    state: RenderState,
    last_error: Option<RenderError>,
    units_performed: usize,
}

impl<D: HostDocument> Scheduler<D> {
    /// Create an idle scheduler with the default config.
    pub fn new(document: D) -> Self {
        Self::with_config(document, SchedulerConfig::default())
    }

    /// Create an idle scheduler with an explicit config.
    pub fn with_config(document: D, config: SchedulerConfig) -> Self {
        Self {
            document,
            config,
            fibers: FiberTree::new(),
            container: None,
            next_unit_of_work: None,
            state: RenderState::Idle,
            last_error: None,
            units_performed: 0,
        }
    }

    /// The host document being rendered into.
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access to the host document.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Consume the scheduler and hand back the host document.
    pub fn into_document(self) -> D {
        self.document
    }

    /// The active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Whether a render has units of work left.
    pub fn is_working(&self) -> bool {
        self.state == RenderState::Working
    }

    /// The fiber the next unit of work will process.
    pub fn next_unit_of_work(&self) -> Option<FiberId> {
        self.next_unit_of_work
    }

    /// Fibers of the current (or last) render.
    pub fn fibers(&self) -> &FiberTree<D::Node> {
        &self.fibers
    }

    /// The container of the current (or last) render.
    pub fn container(&self) -> Option<D::Node> {
        self.container
    }

    /// The error that stopped the last render, if it failed.
    pub fn last_error(&self) -> Option<&RenderError> {
        self.last_error.as_ref()
    }

    /// Units performed so far by the current (or last) render.
    pub fn units_performed(&self) -> usize {
        self.units_performed
    }

    /// Request a render of `root` into `container`.
    ///
    /// Creates the root fiber and points the cursor at it; no host work
    /// happens until the next tick. Fails with
    /// [`RenderError::RenderInProgress`] while another render is working,
    /// leaving that render untouched. The fiber tree of a finished or failed
    /// render is dropped.
    pub fn schedule_render(
        &mut self,
        root: Element,
        container: D::Node,
    ) -> Result<FiberId, RenderError> {
        if self.is_working() {
            return Err(RenderError::RenderInProgress);
        }
        debug!(kind = %root.kind(), container = ?container, "render scheduled");
        let fiber = self.fibers.insert_root(root);
        self.container = Some(container);
        self.next_unit_of_work = Some(fiber);
        self.state = RenderState::Working;
        self.last_error = None;
        self.units_performed = 0;
        Ok(fiber)
    }

    /// Perform exactly one unit of work at the cursor.
    ///
    /// Returns the new cursor. Does nothing and returns `None` when idle.
    pub fn step(&mut self) -> Result<Option<FiberId>, RenderError> {
        let Some(fiber) = self.next_unit_of_work.filter(|_| self.is_working()) else {
            return Ok(None);
        };
        self.advance(fiber)?;
        Ok(self.next_unit_of_work)
    }

    /// Run units of work until the deadline drops below the yield threshold,
    /// the per-tick cap is hit, or the render completes.
    ///
    /// The first unit always runs, so every slice makes progress. Ticking an
    /// idle or failed scheduler is a no-op pass. An error is returned once, by
    /// the tick that hit it; the scheduler is then [`RenderState::Failed`].
    pub fn tick(&mut self, deadline: &impl Deadline) -> Result<TickReport, RenderError> {
        let mut report = TickReport::default();
        if !self.is_working() {
            return Ok(report);
        }

        while let Some(fiber) = self.next_unit_of_work {
            self.advance(fiber)?;
            report.units += 1;
            if self.next_unit_of_work.is_none() {
                break;
            }
            let out_of_time = deadline.time_remaining() < self.config.yield_threshold;
            let at_cap = self
                .config
                .max_units_per_tick
                .is_some_and(|max| report.units >= max);
            if out_of_time || at_cap {
                report.yielded = true;
                debug!(units = report.units, "yielding to host");
                break;
            }
        }

        report.complete = !self.is_working();
        Ok(report)
    }

    /// Keep asking `host` for slices until the current render is done.
    ///
    /// Returns immediately when idle.
    pub async fn run_until_complete<H: IdleHost>(&mut self, host: &mut H) -> Result<(), RenderError> {
        while self.is_working() {
            let deadline = host.next_slice().await;
            self.tick(&deadline)?;
        }
        Ok(())
    }

    /// Perform the unit at `fiber` and move the cursor, recording failure.
    fn advance(&mut self, fiber: FiberId) -> Result<(), RenderError> {
        match self.perform_unit_of_work(fiber) {
            Ok(next) => {
                self.units_performed += 1;
                self.next_unit_of_work = next;
                if next.is_none() {
                    self.state = RenderState::Idle;
                    debug!(units = self.units_performed, "render complete");
                }
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, units = self.units_performed, "render failed");
                self.next_unit_of_work = None;
                self.state = RenderState::Failed;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Materialize `fiber`, attach it, expand its children and return the
    /// next fiber in depth-first pre-order.
    ///
    /// The node is attached before any child fiber exists, so a native node
    /// is never appended to a parent that has not been materialized.
    fn perform_unit_of_work(&mut self, fiber: FiberId) -> Result<Option<FiberId>, RenderError> {
        trace!(fiber = ?fiber, kind = %self.fibers.element(fiber).kind(), "unit of work");

        let node = match self.fibers.node(fiber) {
            Some(node) => node,
            None => {
                let element = self.fibers.element(fiber).clone();
                let node = instantiate_with(&mut self.document, &element, self.config.property_policy)?;
                self.fibers.set_node(fiber, node);
                node
            }
        };

        if !self.fibers.is_attached(fiber) {
            let parent_node = match self.fibers.parent(fiber) {
                Some(parent) => self.fibers.node(parent),
                None => self.container,
            }
            .ok_or(HostError::UnknownNode)?;
            self.document.append_child(parent_node, node)?;
            self.fibers.mark_attached(fiber);
        }

        self.fibers.expand(fiber);
        Ok(self.fibers.next_unit_after(fiber))
    }
}

// ---------------------------------------------------------------------------
// work_loop
// ---------------------------------------------------------------------------

/// The long-lived work loop: register with `host`, tick, register again.
///
/// Runs forever, including while idle, so a render scheduled at any time
/// through the shared handle is picked up on the next slice. Errors are
/// logged and leave the failed render inert; the loop keeps going.
pub async fn work_loop<D, H>(scheduler: Rc<RefCell<Scheduler<D>>>, mut host: H)
where
    D: HostDocument,
    H: IdleHost,
{
    loop {
        let deadline = host.next_slice().await;
        let result = scheduler.borrow_mut().tick(&deadline);
        if let Err(err) = result {
            warn!(error = %err, "work loop tick failed");
        }
    }
}
