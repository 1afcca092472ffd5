//! Snapshotting the document selection.

use crate::boundary::{SelectionBoundary, adjust_to_word_boundary};
use crate::viewport::Viewport;
use core_types::{Point, Rect};
use dom::{Document, Range};

/// Immutable snapshot of a user selection (or of a located match).
///
/// `range` is a value, not a live range: after the tree is mutated it may no
/// longer describe the same content.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSelection {
    /// Selected text, trimmed of surrounding whitespace.
    pub text: String,
    pub range: Range,
    /// Top-left of the bounding rect in document coordinates.
    pub position: Point,
    /// Viewport-relative bounding rect at capture time.
    pub bounding_rect: Rect,
}

impl TextSelection {
    /// Snapshot `range` with caller-supplied `text`, measuring it through `viewport`.
    pub fn measure(
        doc: &Document,
        viewport: &dyn Viewport,
        range: Range,
        text: impl Into<String>,
    ) -> Self {
        let bounding_rect = viewport.bounding_client_rect(doc, &range);
        let position = bounding_rect.origin().offset(viewport.scroll_offset());
        Self {
            text: text.into(),
            range,
            position,
            bounding_rect,
        }
    }

    /// Snapshot `range` using its own text. `None` when the text is only
    /// whitespace or the range cannot be read.
    pub fn from_range(doc: &Document, viewport: &dyn Viewport, range: Range) -> Option<Self> {
        let text = match doc.range_text(&range) {
            Ok(text) => text,
            Err(err) => {
                log::debug!(target: "highlight.selection", "unreadable range {range:?}: {err}");
                return None;
            }
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::measure(doc, viewport, range, trimmed))
    }

    /// Same text at the same document position.
    pub fn same_place(&self, other: &TextSelection) -> bool {
        self.text == other.text && self.position == other.position
    }
}

/// Snapshot the document's current selection.
///
/// `None` when nothing is selected, the selection is a caret, or the selected
/// text is empty after trimming.
pub fn capture_selection(doc: &Document, viewport: &dyn Viewport) -> Option<TextSelection> {
    let selection = doc.selection();
    if selection.range_count() == 0 || selection.is_collapsed() {
        return None;
    }
    let range = *selection.range_at(0)?;
    TextSelection::from_range(doc, viewport, range)
}

/// [`capture_selection`], then snap to word boundaries when `boundary` is
/// [`SelectionBoundary::Word`]. Text and geometry are re-derived from the
/// adjusted range.
pub fn adjusted_selection(
    doc: &Document,
    viewport: &dyn Viewport,
    boundary: SelectionBoundary,
) -> Option<TextSelection> {
    let captured = capture_selection(doc, viewport)?;
    match boundary {
        SelectionBoundary::Cursor => Some(captured),
        SelectionBoundary::Word => {
            let adjusted = adjust_to_word_boundary(doc, &captured.range);
            TextSelection::from_range(doc, viewport, adjusted)
        }
    }
}
