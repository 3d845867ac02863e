//! Host materializer: turn one element into one native node.

use tracing::trace;

use crate::config::PropertyPolicy;
use crate::element::Element;
use crate::error::{RenderError, StructuralError};
use crate::host::HostDocument;

/// Create the native node for `element` and copy its properties onto it.
///
/// Properties are forwarded verbatim; the host decides what they mean.
/// The node is not attached anywhere.
pub fn instantiate<D: HostDocument>(
    document: &mut D,
    element: &Element,
) -> Result<D::Node, RenderError> {
    instantiate_with(document, element, PropertyPolicy::Passthrough)
}

/// [`instantiate`] with an explicit property policy.
///
/// The element is fully validated before the host is touched, so a
/// structural error never leaves a half-built node behind.
pub fn instantiate_with<D: HostDocument>(
    document: &mut D,
    element: &Element,
    policy: PropertyPolicy,
) -> Result<D::Node, RenderError> {
    let kind = element.kind();
    kind.validate()?;
    if kind.is_text() && !element.children().is_empty() {
        return Err(StructuralError::TextWithChildren {
            count: element.children().len(),
        }
        .into());
    }
    if let Some((name, _)) = element.props().iter().find(|(name, _)| !policy.accepts(name)) {
        return Err(StructuralError::InvalidPropertyName {
            kind: kind.to_string(),
            name: name.to_owned(),
        }
        .into());
    }

    let node = if kind.is_text() {
        document.create_text_node()?
    } else {
        document.create_node(kind.as_str())?
    };
    for (name, value) in element.props().iter() {
        document.set_property(node, name, value)?;
    }
    trace!(kind = %kind, node = ?node, "materialized");
    Ok(node)
}

/// Materialize a whole subtree in one call and append it to `container`.
///
/// Children are built and attached before their parent is appended, and the
/// call cannot be interrupted. The resulting tree matches what the scheduler
/// produces incrementally.
pub fn render_sync<D: HostDocument>(
    document: &mut D,
    element: &Element,
    container: D::Node,
) -> Result<D::Node, RenderError> {
    let node = instantiate(document, element)?;
    for child in element.children() {
        render_sync(document, child, node)?;
    }
    document.append_child(container, node)?;
    Ok(node)
}
