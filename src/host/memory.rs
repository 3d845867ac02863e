//! In-memory host document: a slotmap-backed native-node arena.
//!
//! All nodes live in a single `SlotMap`. Parent/child relationships are stored
//! in secondary maps so lookup is O(1). Every mutating host operation is also
//! recorded in a journal, which is how tests observe creation and attachment
//! order.

use std::collections::HashMap;
use std::fmt::Write as _;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use super::HostDocument;
use crate::element::{PropValue, Props, NODE_VALUE};
use crate::error::HostError;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

new_key_type! {
    /// Unique identifier for a native node. Copy, lightweight (u64).
    pub struct NodeId;
}

// ---------------------------------------------------------------------------
// NodeData
// ---------------------------------------------------------------------------

/// What kind of native node this is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(String),
    Text,
}

/// Data associated with a single native node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Properties in assignment order.
    pub props: Props,
}

impl NodeData {
    fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element(tag.to_owned()),
            props: Props::new(),
        }
    }

    fn text() -> Self {
        Self {
            kind: NodeKind::Text,
            props: Props::new(),
        }
    }

    /// The element tag, or `None` for text nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text => None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn property(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    /// Text content of a text node (empty until `nodeValue` is assigned).
    pub fn node_value(&self) -> Option<&PropValue> {
        self.props.get(NODE_VALUE)
    }
}

// ---------------------------------------------------------------------------
// HostOp
// ---------------------------------------------------------------------------

/// One recorded host operation.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    Create { node: NodeId, tag: String },
    CreateText { node: NodeId },
    SetProperty { node: NodeId, name: String, value: PropValue },
    Append { parent: NodeId, child: NodeId },
}

// ---------------------------------------------------------------------------
// MemoryDocument
// ---------------------------------------------------------------------------

/// An in-memory native document.
///
/// Nodes are never freed individually; the whole arena is dropped with the
/// document. Hosts that need to simulate rejection can register refused tags
/// and property names with [`reject_tag`](Self::reject_tag) and
/// [`reject_property`](Self::reject_property).
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    journal: Vec<HostOp>,
    rejected_tags: HashMap<String, String>,
    rejected_props: HashMap<String, String>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to create nodes tagged `tag` (builder).
    pub fn reject_tag(mut self, tag: impl Into<String>, reason: impl Into<String>) -> Self {
        self.rejected_tags.insert(tag.into(), reason.into());
        self
    }

    /// Refuse assignments to property `name` (builder).
    pub fn reject_property(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.rejected_props.insert(name.into(), reason.into());
        self
    }

    /// Create a detached element node to render into. Not journaled.
    pub fn create_container(&mut self, tag: &str) -> NodeId {
        self.insert(NodeData::element(tag))
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the topmost ancestor, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Number of nodes, containers included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Every host operation performed so far, in order.
    pub fn journal(&self) -> &[HostOp] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Find the first node in the subtree under `start` whose `id` property is `id`.
    pub fn query_by_id(&self, start: NodeId, id: &str) -> Option<NodeId> {
        self.walk_depth_first(start).into_iter().find(|&node| {
            matches!(self.nodes[node].property("id"), Some(PropValue::Str(v)) if v == id)
        })
    }

    /// All nodes tagged `tag` under `start`, in document order.
    pub fn query_by_tag(&self, start: NodeId, tag: &str) -> Vec<NodeId> {
        self.walk_depth_first(start)
            .into_iter()
            .filter(|&node| self.nodes[node].tag() == Some(tag))
            .collect()
    }

    /// Concatenated text of every text node under `start`.
    pub fn text_content(&self, start: NodeId) -> String {
        let mut out = String::new();
        for node in self.walk_depth_first(start) {
            if let Some(value) = self.nodes[node].node_value() {
                // Writing into a String cannot fail.
                let _ = write!(out, "{value}");
            }
        }
        out
    }

    /// Serialize the children of `node` as markup.
    pub fn inner_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_markup(child, &mut out);
        }
        out
    }

    /// Serialize `node` and its subtree as markup.
    ///
    /// Elements render as `<tag name="value">...</tag>` with properties in
    /// assignment order; text nodes render their `nodeValue` verbatim.
    pub fn markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text => {
                if let Some(value) = data.node_value() {
                    let _ = write!(out, "{value}");
                }
            }
            NodeKind::Element(tag) => {
                let _ = write!(out, "<{tag}");
                for (name, value) in data.props.iter() {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                out.push('>');
                for &child in self.children(node) {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> bool {
        candidate == of || self.ancestors(of).contains(&candidate)
    }
}

impl HostDocument for MemoryDocument {
    type Node = NodeId;

    fn create_node(&mut self, kind: &str) -> Result<NodeId, HostError> {
        if let Some(reason) = self.rejected_tags.get(kind) {
            return Err(HostError::RejectedNode {
                kind: kind.to_owned(),
                reason: reason.clone(),
            });
        }
        let id = self.insert(NodeData::element(kind));
        self.journal.push(HostOp::Create {
            node: id,
            tag: kind.to_owned(),
        });
        Ok(id)
    }

    fn create_text_node(&mut self) -> Result<NodeId, HostError> {
        let id = self.insert(NodeData::text());
        self.journal.push(HostOp::CreateText { node: id });
        Ok(id)
    }

    fn set_property(&mut self, node: NodeId, name: &str, value: &PropValue) -> Result<(), HostError> {
        if let Some(reason) = self.rejected_props.get(name) {
            return Err(HostError::RejectedProperty {
                name: name.to_owned(),
                reason: reason.clone(),
            });
        }
        let data = self.nodes.get_mut(node).ok_or(HostError::UnknownNode)?;
        data.props.set(name, value.clone());
        self.journal.push(HostOp::SetProperty {
            node,
            name: name.to_owned(),
            value: value.clone(),
        });
        Ok(())
    }

    /// Appending a node that already has a parent moves it.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let parent_data = self.nodes.get(parent).ok_or(HostError::UnknownNode)?;
        if parent_data.is_text() {
            return Err(HostError::NotAContainer);
        }
        if !self.nodes.contains_key(child) {
            return Err(HostError::UnknownNode);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(HostError::CycleDetected);
        }

        if let Some(old_parent) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&c| c != child);
            }
        }
        self.parent.insert(child, parent);
        self.children
            .get_mut(parent)
            .ok_or(HostError::UnknownNode)?
            .push(child);
        self.journal.push(HostOp::Append { parent, child });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a small test tree:
    /// ```text
    ///      root
    ///     /    \
    ///   div     b
    ///   / \
    ///  a  "hi"
    /// ```
    fn build_tree() -> (MemoryDocument, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = MemoryDocument::new();
        let root = doc.create_container("root");
        let div = doc.create_node("div").unwrap();
        doc.set_property(div, "id", &"foo".into()).unwrap();
        let a = doc.create_node("a").unwrap();
        let text = doc.create_text_node().unwrap();
        doc.set_property(text, NODE_VALUE, &"hi".into()).unwrap();
        let b = doc.create_node("b").unwrap();
        doc.append_child(root, div).unwrap();
        doc.append_child(div, a).unwrap();
        doc.append_child(div, text).unwrap();
        doc.append_child(root, b).unwrap();
        (doc, root, div, a, text, b)
    }

    #[test]
    fn parent_and_children() {
        let (doc, root, div, a, text, b) = build_tree();
        assert_eq!(doc.children(root), &[div, b]);
        assert_eq!(doc.children(div), &[a, text]);
        assert_eq!(doc.parent(a), Some(div));
        assert_eq!(doc.parent(root), None);
        assert!(doc.children(text).is_empty());
    }

    #[test]
    fn ancestors() {
        let (doc, root, div, a, ..) = build_tree();
        assert_eq!(doc.ancestors(a), vec![div, root]);
        assert!(doc.ancestors(root).is_empty());
    }

    #[test]
    fn walk_depth_first() {
        let (doc, root, div, a, text, b) = build_tree();
        assert_eq!(doc.walk_depth_first(root), vec![root, div, a, text, b]);
    }

    #[test]
    fn markup_serialization() {
        let (doc, root, div, ..) = build_tree();
        assert_eq!(doc.inner_markup(root), r#"<div id="foo"><a></a>hi</div><b></b>"#);
        assert_eq!(doc.markup(div), r#"<div id="foo"><a></a>hi</div>"#);
    }

    #[test]
    fn queries() {
        let (doc, root, div, a, ..) = build_tree();
        assert_eq!(doc.query_by_id(root, "foo"), Some(div));
        assert_eq!(doc.query_by_id(root, "nope"), None);
        assert_eq!(doc.query_by_tag(root, "a"), vec![a]);
        assert_eq!(doc.text_content(root), "hi");
    }

    #[test]
    fn create_returns_distinct_nodes() {
        let mut doc = MemoryDocument::new();
        let one = doc.create_node("div").unwrap();
        let two = doc.create_node("div").unwrap();
        assert_ne!(one, two);
        assert_eq!(doc.get(one), doc.get(two));
    }

    #[test]
    fn journal_records_operations() {
        let mut doc = MemoryDocument::new();
        let root = doc.create_container("root");
        let div = doc.create_node("div").unwrap();
        doc.set_property(div, "id", &"x".into()).unwrap();
        doc.append_child(root, div).unwrap();
        assert_eq!(
            doc.journal(),
            &[
                HostOp::Create { node: div, tag: "div".into() },
                HostOp::SetProperty { node: div, name: "id".into(), value: "x".into() },
                HostOp::Append { parent: root, child: div },
            ]
        );
        doc.clear_journal();
        assert!(doc.journal().is_empty());
    }

    #[test]
    fn append_moves_existing_child() {
        let (mut doc, root, div, a, ..) = build_tree();
        doc.append_child(root, a).unwrap();
        assert_eq!(doc.parent(a), Some(root));
        assert!(!doc.children(div).contains(&a));
        assert_eq!(doc.children(root).last(), Some(&a));
    }

    #[test]
    fn append_rejects_cycles() {
        let (mut doc, root, div, a, ..) = build_tree();
        assert_eq!(doc.append_child(a, div), Err(HostError::CycleDetected));
        assert_eq!(doc.append_child(div, div), Err(HostError::CycleDetected));
        assert_eq!(doc.append_child(a, root), Err(HostError::CycleDetected));
    }

    #[test]
    fn append_into_text_fails() {
        let (mut doc, _root, _div, a, text, _b) = build_tree();
        assert_eq!(doc.append_child(text, a), Err(HostError::NotAContainer));
    }

    #[test]
    fn rejected_tag_and_property() {
        let mut doc = MemoryDocument::new()
            .reject_tag("script", "not allowed")
            .reject_property("onclick", "events unsupported");
        assert_eq!(
            doc.create_node("script"),
            Err(HostError::RejectedNode { kind: "script".into(), reason: "not allowed".into() })
        );
        let div = doc.create_node("div").unwrap();
        assert!(matches!(
            doc.set_property(div, "onclick", &"go()".into()),
            Err(HostError::RejectedProperty { .. })
        ));
        assert!(doc.get(div).unwrap().props.is_empty());
    }

    #[test]
    fn unknown_node_errors() {
        let mut doc = MemoryDocument::new();
        let root = doc.create_container("root");
        let null = NodeId::default();
        assert_eq!(doc.set_property(null, "id", &"x".into()), Err(HostError::UnknownNode));
        assert_eq!(doc.append_child(root, null), Err(HostError::UnknownNode));
        assert_eq!(doc.append_child(null, root), Err(HostError::UnknownNode));
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
