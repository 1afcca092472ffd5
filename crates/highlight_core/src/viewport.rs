//! Geometry seam between the engine and whatever renders the document.

use core_types::{Point, Rect};
use dom::{Document, Position, Range};

/// Layout queries the engine needs from its host.
///
/// Rects are viewport-relative, like `getBoundingClientRect`; adding
/// [`scroll_offset`](Viewport::scroll_offset) yields document coordinates.
pub trait Viewport {
    fn bounding_client_rect(&self, doc: &Document, range: &Range) -> Rect;

    fn scroll_offset(&self) -> Point;
}

/// Lays the whole document out as one line of fixed-width glyphs.
///
/// Good enough for headless hosts and tests: a range's `x` is the number of
/// characters before it times `char_width`, its width the number of characters
/// inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceViewport {
    pub char_width: f32,
    pub line_height: f32,
    pub scroll: Point,
}

impl Default for MonospaceViewport {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
            scroll: Point::ZERO,
        }
    }
}

impl MonospaceViewport {
    pub fn with_scroll(mut self, scroll: Point) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Viewport for MonospaceViewport {
    fn bounding_client_rect(&self, doc: &Document, range: &Range) -> Rect {
        let root = doc.root_of(range.start.node);
        let before = Range::new(Position::new(root, 0), range.start);
        let leading = doc
            .range_text(&before)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        let inside = doc
            .range_text(range)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        Rect::new(
            leading as f32 * self.char_width - self.scroll.x,
            -self.scroll.y,
            inside as f32 * self.char_width,
            self.line_height,
        )
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }
}
