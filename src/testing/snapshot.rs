//! Render-to-string helpers.

use crate::element::Element;
use crate::error::RenderError;
use crate::host::MemoryDocument;
use crate::idle::Unbounded;
use crate::scheduler::Scheduler;
use crate::testing::UnitBudget;

/// Render `element` into a fresh in-memory document and return the markup
/// of the container's contents.
///
/// # Examples
///
/// ```
/// use fiber_dom::element::create_element;
/// use fiber_dom::testing::render_to_markup;
///
/// let el = create_element("p", None, ["hello"]);
/// assert_eq!(render_to_markup(&el).unwrap(), "<p>hello</p>");
/// ```
pub fn render_to_markup(element: &Element) -> Result<String, RenderError> {
    let mut doc = MemoryDocument::new();
    let container = doc.create_container("root");
    let mut scheduler = Scheduler::new(doc);
    scheduler.schedule_render(element.clone(), container)?;
    scheduler.tick(&Unbounded)?;
    Ok(scheduler.document().inner_markup(container))
}

/// Like [`render_to_markup`], but spread over slices of `units` units each.
///
/// Returns the markup and the number of slices the render took.
pub fn render_to_markup_in_slices(
    element: &Element,
    units: usize,
) -> Result<(String, usize), RenderError> {
    let mut doc = MemoryDocument::new();
    let container = doc.create_container("root");
    let mut scheduler = Scheduler::new(doc);
    scheduler.schedule_render(element.clone(), container)?;
    let mut slices = 0;
    while scheduler.is_working() {
        scheduler.tick(&UnitBudget::new(units))?;
        slices += 1;
    }
    Ok((scheduler.document().inner_markup(container), slices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{create_element, Child};

    #[test]
    fn markup_of_nested_tree() {
        let el = create_element(
            "ul",
            None,
            [create_element("li", None, ["one"]), create_element("li", None, ["two"])],
        );
        assert_eq!(render_to_markup(&el).unwrap(), "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn sliced_render_counts_slices() {
        let el = create_element("ul", None, [create_element("li", None, Vec::<Child>::new())]);
        let (markup, slices) = render_to_markup_in_slices(&el, 1).unwrap();
        assert_eq!(markup, "<ul><li></li></ul>");
        assert_eq!(slices, 2);
    }

    #[test]
    fn errors_propagate() {
        let el = create_element("", None, Vec::<Child>::new());
        assert!(render_to_markup(&el).unwrap_err().is_structural());
    }
}
