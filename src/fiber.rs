//! Fiber tree: the resumable traversal structure laid over an element tree.
//!
//! Fibers live in a slotmap arena and link to each other by id: `child` points
//! at the first child, `sibling` at the next sibling, `parent` back up. The
//! parent link carries no ownership; the arena owns every fiber and drops the
//! whole tree at once. Children are created lazily by [`FiberTree::expand`],
//! one fiber at a time, which is what lets a traversal stop after any fiber
//! and pick up again later from a single stored id.

use slotmap::{new_key_type, SlotMap};

use crate::element::Element;

new_key_type! {
    /// Identifier of a fiber within its [`FiberTree`].
    pub struct FiberId;
}

// ---------------------------------------------------------------------------
// Fiber
// ---------------------------------------------------------------------------

/// Per-element traversal state.
#[derive(Debug, Clone)]
pub struct Fiber<N> {
    element: Element,
    node: Option<N>,
    parent: Option<FiberId>,
    child: Option<FiberId>,
    sibling: Option<FiberId>,
    expanded: bool,
    attached: bool,
}

impl<N: Copy> Fiber<N> {
    fn new(element: Element, parent: Option<FiberId>) -> Self {
        Self {
            element,
            node: None,
            parent,
            child: None,
            sibling: None,
            expanded: false,
            attached: false,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The native node, once materialized.
    pub fn node(&self) -> Option<N> {
        self.node
    }

    pub fn parent(&self) -> Option<FiberId> {
        self.parent
    }

    pub fn child(&self) -> Option<FiberId> {
        self.child
    }

    pub fn sibling(&self) -> Option<FiberId> {
        self.sibling
    }

    /// Whether child fibers have been created.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether the native node has been appended to its parent.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

// ---------------------------------------------------------------------------
// FiberTree
// ---------------------------------------------------------------------------

/// Arena of fibers for one render.
///
/// Methods taking a [`FiberId`] panic if the id does not belong to this tree;
/// ids are only ever handed out by the tree itself.
#[derive(Debug)]
pub struct FiberTree<N> {
    fibers: SlotMap<FiberId, Fiber<N>>,
    root: Option<FiberId>,
}

impl<N: Copy> FiberTree<N> {
    pub fn new() -> Self {
        Self {
            fibers: SlotMap::with_key(),
            root: None,
        }
    }

    /// Create the root fiber for `element`. Any previous fibers are dropped.
    pub fn insert_root(&mut self, element: Element) -> FiberId {
        self.fibers.clear();
        let id = self.fibers.insert(Fiber::new(element, None));
        self.root = Some(id);
        id
    }

    pub fn root(&self) -> Option<FiberId> {
        self.root
    }

    pub fn get(&self, id: FiberId) -> Option<&Fiber<N>> {
        self.fibers.get(id)
    }

    pub fn element(&self, id: FiberId) -> &Element {
        &self.fibers[id].element
    }

    pub fn node(&self, id: FiberId) -> Option<N> {
        self.fibers[id].node
    }

    pub fn parent(&self, id: FiberId) -> Option<FiberId> {
        self.fibers[id].parent
    }

    pub fn is_attached(&self, id: FiberId) -> bool {
        self.fibers[id].attached
    }

    /// Store the materialized native node of `id`.
    pub fn set_node(&mut self, id: FiberId, node: N) {
        self.fibers[id].node = Some(node);
    }

    pub fn mark_attached(&mut self, id: FiberId) {
        self.fibers[id].attached = true;
    }

    /// Create child fibers for every child element of `id` and link them into
    /// a sibling chain. Returns the first child. Expanding twice is a no-op.
    pub fn expand(&mut self, id: FiberId) -> Option<FiberId> {
        if self.fibers[id].expanded {
            return self.fibers[id].child;
        }
        let element = self.fibers[id].element.clone();

        // Build back to front so each new fiber can point at its next sibling.
        let mut next_sibling = None;
        for child in element.children().iter().rev() {
            let mut fiber = Fiber::new(child.clone(), Some(id));
            fiber.sibling = next_sibling;
            next_sibling = Some(self.fibers.insert(fiber));
        }

        let fiber = &mut self.fibers[id];
        fiber.child = next_sibling;
        fiber.expanded = true;
        next_sibling
    }

    /// The fiber that follows `id` in depth-first pre-order.
    ///
    /// Descends to the first child if there is one; otherwise climbs through
    /// `id` and its ancestors until one has a sibling. Returns `None` once the
    /// climb passes the root.
    pub fn next_unit_after(&self, id: FiberId) -> Option<FiberId> {
        if let Some(child) = self.fibers[id].child {
            return Some(child);
        }
        let mut current = Some(id);
        while let Some(fiber) = current {
            if let Some(sibling) = self.fibers[fiber].sibling {
                return Some(sibling);
            }
            current = self.fibers[fiber].parent;
        }
        None
    }

    /// Children of `id` that have been created so far, in order.
    pub fn children(&self, id: FiberId) -> Vec<FiberId> {
        let mut result = Vec::new();
        let mut current = self.fibers[id].child;
        while let Some(child) = current {
            result.push(child);
            current = self.fibers[child].sibling;
        }
        result
    }

    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }
}

impl<N: Copy> Default for FiberTree<N> {
    fn default() -> Self {
        Self::new()
    }
}
