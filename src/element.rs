//! Element model: immutable descriptions of the native nodes a render should produce.
//!
//! An [`Element`] is a cheap-to-clone handle (reference counted) around a kind,
//! a property list and an ordered list of children. Children that are not
//! elements (strings, numbers, booleans) are wrapped into TEXT elements carrying
//! the value as their `nodeValue` property.

use std::fmt;
use std::rc::Rc;

use crate::error::StructuralError;

/// Tag reserved for text elements.
pub const TEXT_ELEMENT: &str = "TEXT_ELEMENT";
/// Property holding a text element's content.
pub const NODE_VALUE: &str = "nodeValue";
/// Reserved property name; children are always taken from the explicit list.
pub const CHILDREN: &str = "children";

// ---------------------------------------------------------------------------
// ElementKind
// ---------------------------------------------------------------------------

/// What an element materializes into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A native node created from a host tag, e.g. `div`.
    Host(String),
    /// A text node.
    Text,
}

impl ElementKind {
    /// The tag string, with [`TEXT_ELEMENT`] for text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Host(tag) => tag,
            Self::Text => TEXT_ELEMENT,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Check that a host tag can name a native node.
    ///
    /// Empty tags and tags containing whitespace, control characters or
    /// markup delimiters (`<`, `>`, `/`) are rejected.
    pub fn validate(&self) -> Result<(), StructuralError> {
        match self {
            Self::Text => Ok(()),
            Self::Host(tag) if tag.is_empty() => Err(StructuralError::EmptyKind),
            Self::Host(tag) => {
                let bad = tag
                    .chars()
                    .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '/'));
                if bad {
                    Err(StructuralError::InvalidKind { kind: tag.clone() })
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        if tag == TEXT_ELEMENT {
            Self::Text
        } else {
            Self::Host(tag.to_owned())
        }
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        if tag == TEXT_ELEMENT {
            Self::Text
        } else {
            Self::Host(tag)
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PropValue
// ---------------------------------------------------------------------------

/// A property value passed through to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<u32> for PropValue {
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<f64> for PropValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

/// Ordered property list with unique keys.
///
/// Setting an existing key replaces its value in place, so iteration order is
/// the order in which keys were first set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property (builder).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a property, replacing any previous value for `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove a property, returning its value if it was set.
    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.set(k, v);
        }
        props
    }
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct ElementData {
    kind: ElementKind,
    props: Props,
    children: Vec<Element>,
}

/// An immutable element description. Cloning shares the underlying data.
#[derive(Clone)]
pub struct Element(Rc<ElementData>);

impl Element {
    pub fn kind(&self) -> &ElementKind {
        &self.0.kind
    }

    /// Properties other than children.
    pub fn props(&self) -> &Props {
        &self.0.props
    }

    pub fn children(&self) -> &[Element] {
        &self.0.children
    }

    pub fn is_text(&self) -> bool {
        self.0.kind.is_text()
    }

    /// The `nodeValue` of a text element.
    pub fn node_value(&self) -> Option<&PropValue> {
        self.0.props.get(NODE_VALUE)
    }

    /// Whether two handles share the same underlying element.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.0.kind)
            .field("props", &self.0.props)
            .field("children", &self.0.children)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Child
// ---------------------------------------------------------------------------

/// A child argument to [`create_element`]: an element, or a value to wrap as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(Element),
    Text(PropValue),
}

impl Child {
    /// Resolve into an element, wrapping text values via [`create_text_element`].
    pub fn into_element(self) -> Element {
        match self {
            Self::Element(element) => element,
            Self::Text(value) => create_text_element(value),
        }
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&Element> for Child {
    fn from(element: &Element) -> Self {
        Self::Element(element.clone())
    }
}

macro_rules! text_child_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Child {
                fn from(value: $ty) -> Self {
                    Self::Text(value.into())
                }
            }
        )*
    };
}

text_child_from!(&str, String, i64, i32, u32, f64, bool, PropValue);

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// Build an element.
///
/// `props` may be `None`. Any `children` property it carries is dropped: the
/// children always come from the explicit list, in order, with non-element
/// values wrapped as text elements.
pub fn create_element<C>(
    kind: impl Into<ElementKind>,
    props: Option<Props>,
    children: impl IntoIterator<Item = C>,
) -> Element
where
    C: Into<Child>,
{
    let mut props = props.unwrap_or_default();
    props.remove(CHILDREN);
    Element(Rc::new(ElementData {
        kind: kind.into(),
        props,
        children: children
            .into_iter()
            .map(|child| child.into().into_element())
            .collect(),
    }))
}

/// Build a TEXT element whose `nodeValue` is `value`.
pub fn create_text_element(value: impl Into<PropValue>) -> Element {
    Element(Rc::new(ElementData {
        kind: ElementKind::Text,
        props: Props::new().with(NODE_VALUE, value),
        children: Vec::new(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_children() -> Vec<Child> {
        Vec::new()
    }

    #[test]
    fn element_children_keep_identity() {
        let a = create_element("a", None, ["bar"]);
        let b = create_element("b", None, no_children());
        let div = create_element("div", Some(Props::new().with("id", "foo")), [&a, &b]);
        assert!(div.children()[0].ptr_eq(&a));
        assert!(div.children()[1].ptr_eq(&b));
    }

    #[test]
    fn text_children_are_wrapped() {
        let a = create_element("a", None, ["bar"]);
        let text = &a.children()[0];
        assert!(text.is_text());
        assert_eq!(text.kind(), &ElementKind::Text);
        assert_eq!(text.node_value(), Some(&PropValue::Str("bar".into())));
        assert!(text.children().is_empty());
    }

    #[test]
    fn mixed_children_preserve_order() {
        let span = create_element("span", None, no_children());
        let p = create_element(
            "p",
            None,
            [Child::from("one"), Child::from(&span), Child::from(2), Child::from(true)],
        );
        let kinds: Vec<&str> = p.children().iter().map(|c| c.kind().as_str()).collect();
        assert_eq!(kinds, vec![TEXT_ELEMENT, "span", TEXT_ELEMENT, TEXT_ELEMENT]);
        assert_eq!(p.children()[2].node_value(), Some(&PropValue::Int(2)));
        assert_eq!(p.children()[3].node_value(), Some(&PropValue::Bool(true)));
    }

    #[test]
    fn children_property_is_overridden() {
        let props = Props::new().with("id", "x").with(CHILDREN, "ignored");
        let el = create_element("div", Some(props), no_children());
        assert!(!el.props().contains(CHILDREN));
        assert_eq!(el.props().len(), 1);
    }

    #[test]
    fn null_props_yield_empty_props() {
        let el = create_element("b", None, no_children());
        assert!(el.props().is_empty());
        assert!(el.children().is_empty());
    }

    #[test]
    fn create_text_element_shape() {
        let text = create_text_element("hello");
        assert_eq!(text.kind().as_str(), TEXT_ELEMENT);
        assert_eq!(text.props().len(), 1);
        assert_eq!(text.node_value().map(ToString::to_string), Some("hello".into()));
    }

    #[test]
    fn text_element_tag_string_maps_to_text_kind() {
        assert_eq!(ElementKind::from(TEXT_ELEMENT), ElementKind::Text);
        assert_eq!(ElementKind::from("div"), ElementKind::Host("div".into()));
    }

    #[test]
    fn props_set_replaces_in_place() {
        let mut props = Props::new().with("a", 1).with("b", 2);
        props.set("a", 3);
        let pairs: Vec<(&str, &PropValue)> = props.iter().collect();
        assert_eq!(pairs, vec![("a", &PropValue::Int(3)), ("b", &PropValue::Int(2))]);
    }

    #[test]
    fn props_from_iter() {
        let props: Props = [("id", "foo"), ("className", "x")].into_iter().collect();
        assert_eq!(props.get("className"), Some(&PropValue::Str("x".into())));
    }

    #[test]
    fn structural_equality_across_instances() {
        let one = create_element("div", Some(Props::new().with("id", "a")), ["t"]);
        let two = create_element("div", Some(Props::new().with("id", "a")), ["t"]);
        assert_eq!(one, two);
        assert!(!one.ptr_eq(&two));
    }

    #[test]
    fn validate_kinds() {
        assert!(ElementKind::Text.validate().is_ok());
        assert!(ElementKind::from("div").validate().is_ok());
        assert!(ElementKind::from("my-widget").validate().is_ok());
        assert_eq!(ElementKind::from("").validate(), Err(StructuralError::EmptyKind));
        assert_eq!(
            ElementKind::from("a b").validate(),
            Err(StructuralError::InvalidKind { kind: "a b".into() })
        );
        assert!(ElementKind::from("<div>").validate().is_err());
    }

    #[test]
    fn prop_value_display() {
        assert_eq!(PropValue::from("x").to_string(), "x");
        assert_eq!(PropValue::from(42).to_string(), "42");
        assert_eq!(PropValue::from(1.5).to_string(), "1.5");
        assert_eq!(PropValue::from(false).to_string(), "false");
    }
}
