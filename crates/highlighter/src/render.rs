//! Custom highlight rendering.
//!
//! A host that wants its own highlight appearance installs a
//! [`HighlightRenderer`]. The highlighter still owns the wrapper element; the
//! renderer only describes what to put on it, and
//! [`apply_rendered_highlight`] copies that description over.

use dom::{Document, DomError, NodeKey};
use highlight_core::TextSelection;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("renderer declined selection: {0}")]
    Declined(String),
}

/// Appearance of one custom highlight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedHighlight {
    pub class_name: Option<String>,
    pub style: Vec<(String, String)>,
    pub title: Option<String>,
    /// Only `data-*` entries are copied onto the element.
    pub attributes: Vec<(String, String)>,
    /// Adds `cursor: pointer`.
    pub clickable: bool,
    /// Replaces the element's content when it differs from the current text.
    pub text: Option<String>,
}

pub trait HighlightRenderer {
    fn render(&mut self, selection: &TextSelection) -> Result<RenderedHighlight, RenderError>;
}

impl<F> HighlightRenderer for F
where
    F: FnMut(&TextSelection) -> Result<RenderedHighlight, RenderError>,
{
    fn render(&mut self, selection: &TextSelection) -> Result<RenderedHighlight, RenderError> {
        self(selection)
    }
}

pub fn apply_rendered_highlight(
    doc: &mut Document,
    element: NodeKey,
    rendered: &RenderedHighlight,
) -> Result<(), DomError> {
    if let Some(class_name) = &rendered.class_name {
        doc.set_attribute(element, "class", class_name)?;
    }
    for (property, value) in &rendered.style {
        doc.set_style_property(element, property, value)?;
    }
    if let Some(title) = &rendered.title {
        doc.set_attribute(element, "title", title)?;
    }
    for (name, value) in &rendered.attributes {
        if name.starts_with("data-") {
            doc.set_attribute(element, name, value)?;
        } else {
            log::trace!(target: "highlighter.render", "skipping non-data attribute {name:?}");
        }
    }
    if rendered.clickable {
        doc.set_style_property(element, "cursor", "pointer")?;
    }
    if let Some(text) = &rendered.text {
        if doc.text_content(element) != *text {
            doc.set_text_content(element, text)?;
        }
    }
    Ok(())
}
