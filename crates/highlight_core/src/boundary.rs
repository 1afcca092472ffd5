use crate::text::{word_end, word_start};
use dom::{Document, Range};
use serde::{Deserialize, Serialize};

/// How a captured selection is snapped before highlighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionBoundary {
    /// Keep the boundaries exactly where the user released them.
    Cursor,
    /// Widen both ends to the enclosing space-delimited words.
    #[default]
    Word,
}

/// Widen `range` outward to word boundaries. A collapsed range is returned
/// as is.
///
/// Each end is only moved when its container is a text node; the start scans
/// back to just past the previous space, the end scans forward to the next
/// space. Element boundaries are left alone.
pub fn adjust_to_word_boundary(doc: &Document, range: &Range) -> Range {
    let mut adjusted = *range;
    if range.is_collapsed() {
        return adjusted;
    }
    if let Some(text) = text_of(doc, range.start.node) {
        adjusted.start.offset = word_start(text, range.start.offset);
    }
    if let Some(text) = text_of(doc, range.end.node) {
        adjusted.end.offset = word_end(text, range.end.offset);
    }
    adjusted
}

fn text_of(doc: &Document, node: dom::NodeKey) -> Option<&str> {
    doc.text(node).filter(|_| doc.is_text(node))
}
