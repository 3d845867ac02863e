//! Host document capability: the native-node API the renderer drives.
//!
//! The renderer never inspects native nodes. It only creates them, assigns
//! properties and appends children through [`HostDocument`].

pub mod memory;

pub use memory::{HostOp, MemoryDocument, NodeData, NodeId, NodeKind};

use crate::element::PropValue;
use crate::error::HostError;

/// The native-node operations a renderer needs from its host.
pub trait HostDocument {
    /// Handle to a native node. Handles are cheap to copy.
    type Node: Copy + Eq + std::fmt::Debug;

    /// Create an element node tagged `kind`.
    fn create_node(&mut self, kind: &str) -> Result<Self::Node, HostError>;

    /// Create an empty text node.
    fn create_text_node(&mut self) -> Result<Self::Node, HostError>;

    /// Assign `value` to property `name` of `node`, verbatim.
    fn set_property(&mut self, node: Self::Node, name: &str, value: &PropValue)
        -> Result<(), HostError>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), HostError>;
}
