//! Turning a range into a highlight element in the tree, and back.

use crate::style::{DEFAULT_HIGHLIGHT_STYLE, HighlightStyle};
use dom::{Document, DomError, NodeKey, Range};

/// Create a detached `tag` element styled for highlighting.
///
/// With a style set, its class and properties are applied and `display`
/// defaults to `inline` unless the style names it. Without one, the built-in
/// look is used.
pub fn create_highlight_element(
    doc: &mut Document,
    tag: &str,
    style: Option<&HighlightStyle>,
) -> Result<NodeKey, DomError> {
    let element = doc.create_element(tag);
    match style.filter(|s| !s.is_unset()) {
        Some(style) => {
            if let Some(class_name) = style.class() {
                doc.set_attribute(element, "class", class_name)?;
            }
            for (property, value) in style.style.iter().flatten() {
                doc.set_style_property(element, property, value)?;
            }
            if doc.style_property(element, "display").is_none() {
                doc.set_style_property(element, "display", "inline")?;
            }
        }
        None => {
            for (property, value) in DEFAULT_HIGHLIGHT_STYLE {
                doc.set_style_property(element, property, value)?;
            }
        }
    }
    Ok(element)
}

/// Wrap the content of `range` in a new highlight element and return it.
pub fn wrap_range_as_highlight(
    doc: &mut Document,
    range: &Range,
    tag: &str,
    style: Option<&HighlightStyle>,
) -> Result<NodeKey, DomError> {
    let element = create_highlight_element(doc, tag, style)?;
    wrap_range_in(doc, range, element)?;
    Ok(element)
}

/// Move the content of `range` into the detached, empty `element` and put
/// `element` where the content was.
///
/// Tries `surround_contents` first. When that is refused because the range
/// cuts through an element, falls back to extracting the content into
/// `element` and inserting it at the range start, which splits the partially
/// selected elements. Any other failure is returned untouched.
pub fn wrap_range_in(doc: &mut Document, range: &Range, element: NodeKey) -> Result<(), DomError> {
    let mut working = *range;
    match doc.surround_contents(&mut working, element) {
        Ok(()) => Ok(()),
        Err(DomError::InvalidState(partial)) => {
            log::debug!(
                target: "highlight.materialize",
                "range cuts through {partial:?}; wrapping by extraction"
            );
            let mut working = *range;
            let fragment = doc.extract_contents(&mut working)?;
            doc.append_child(element, fragment)?;
            doc.insert_node(&mut working, element)
        }
        Err(err) => Err(err),
    }
}

/// Replace a highlight element by its children and merge the text nodes left
/// adjacent in the parent. Detached elements are left as they are.
///
/// The wrapper is only removed once every child has moved out, so a failed
/// move never drops content from the document.
pub fn unwrap_highlight(doc: &mut Document, element: NodeKey) -> Result<(), DomError> {
    let Some(parent) = doc.parent(element) else {
        return Ok(());
    };
    while let Some(child) = doc.first_child(element) {
        doc.insert_before(parent, child, Some(element))?;
    }
    doc.detach(element);
    doc.normalize(parent);
    log::trace!(target: "highlight.materialize", "unwrapped {element:?} in {parent:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::HIGHLIGHT_ID_ATTR;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_look_without_style() {
        let mut doc = Document::new();
        let el = create_highlight_element(&mut doc, "mark", None).unwrap();
        assert_eq!(doc.tag_name(el), Some("mark"));
        assert_eq!(doc.style_property(el, "background-color"), Some("#f5f5f4"));
        assert_eq!(doc.style_property(el, "display"), Some("inline"));
        assert_eq!(doc.parent(el), None);
    }

    #[test]
    fn custom_style_keeps_explicit_display() {
        let mut doc = Document::new();
        let style = HighlightStyle::default()
            .with_class_name("hl")
            .with_property("display", "inline-block");
        let el = create_highlight_element(&mut doc, "span", Some(&style)).unwrap();
        assert_eq!(doc.attribute(el, "class"), Some("hl"));
        assert_eq!(doc.style_property(el, "display"), Some("inline-block"));
        assert_eq!(doc.style_property(el, "background-color"), None);
    }

    #[test]
    fn class_only_gets_inline_display() {
        let mut doc = Document::new();
        let style = HighlightStyle::default().with_class_name("hl");
        let el = create_highlight_element(&mut doc, "span", Some(&style)).unwrap();
        assert_eq!(doc.style_property(el, "display"), Some("inline"));
    }

    #[test]
    fn blank_class_name_keeps_default_look() {
        let mut doc = Document::new();
        for blank in ["", "   "] {
            let style = HighlightStyle::default().with_class_name(blank);
            let el = create_highlight_element(&mut doc, "span", Some(&style)).unwrap();
            assert_eq!(doc.style_property(el, "background-color"), Some("#f5f5f4"));
            assert!(!doc.has_attribute(el, "class"));
        }
    }

    #[test]
    fn blank_class_name_with_style_uses_style_only() {
        let mut doc = Document::new();
        let style = HighlightStyle::default()
            .with_class_name("")
            .with_property("color", "red");
        let el = create_highlight_element(&mut doc, "span", Some(&style)).unwrap();
        assert!(!doc.has_attribute(el, "class"));
        assert_eq!(doc.style_property(el, "color"), Some("red"));
        assert_eq!(doc.style_property(el, "background-color"), None);
    }

    #[test]
    fn unwrap_detached_element_is_noop() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p").unwrap();
        let t = doc.append_text(p, "hello").unwrap();
        let range = doc.range(t, 0, t, 5).unwrap();
        let el = wrap_range_as_highlight(&mut doc, &range, "span", None).unwrap();
        doc.detach(el);
        let children = doc.children(el).to_vec();
        let nodes = doc.subtree_size(root);

        assert_eq!(unwrap_highlight(&mut doc, el), Ok(()));
        assert_eq!(doc.children(el), children.as_slice());
        assert_eq!(doc.text_content(el), "hello");
        assert_eq!(doc.subtree_size(root), nodes);
        assert_eq!(doc.parent(el), None);

        let loose = create_highlight_element(&mut doc, "span", None).unwrap();
        assert_eq!(unwrap_highlight(&mut doc, loose), Ok(()));
    }

    #[test]
    fn wrap_then_unwrap_restores_text() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p").unwrap();
        let t = doc.append_text(p, "hello brave world").unwrap();
        let range = doc.range(t, 6, t, 11).unwrap();

        let el = wrap_range_as_highlight(&mut doc, &range, "span", None).unwrap();
        doc.set_attribute(el, HIGHLIGHT_ID_ATTR, "h-1").unwrap();
        assert_eq!(doc.parent(el), Some(p));
        assert_eq!(doc.text_content(el), "brave");
        assert_eq!(doc.children(p).len(), 3);

        unwrap_highlight(&mut doc, el).unwrap();
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "hello brave world");
        assert_eq!(doc.parent(el), None);
    }

    #[test]
    fn wrap_across_partial_element_falls_back() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p").unwrap();
        let a = doc.append_text(p, "plain ").unwrap();
        let b = doc.append_element(p, "b").unwrap();
        let bold = doc.append_text(b, "bold text").unwrap();
        let range = doc.range(a, 2, bold, 4).unwrap();

        let el = wrap_range_as_highlight(&mut doc, &range, "span", None).unwrap();
        assert_eq!(doc.text_content(el), "ain bold");
        assert_eq!(doc.text_content(p), "plain bold text");
    }
}
