//! Text selection highlighting over an in-process document tree.
//!
//! This crate only re-exports the workspace members:
//!
//! - [`dom`]: the document arena, ranges and selection
//! - [`highlight_core`]: capture, overlap checks, wrapping and search
//! - [`highlighter`]: the event-driven [`Highlighter`]
//!
//! ```
//! use text_highlighter::{Document, Highlighter, HighlighterConfig, MonospaceViewport};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let container = doc.append_element(root, "article").unwrap();
//! let p = doc.append_element(container, "p").unwrap();
//! doc.append_text(p, "a quick brown fox").unwrap();
//!
//! let mut hl = Highlighter::new(container, HighlighterConfig::default(), ()).unwrap();
//! let ids = hl.highlight_text(&mut doc, &MonospaceViewport::default(), "brown", None);
//! assert_eq!(ids.len(), 1);
//! assert_eq!(doc.text_content(container), "a quick brown fox");
//! ```

pub use core_types::{Point, Rect};
pub use dom::{self, Document, DomError, NodeKey, Position, Range, Selection};
pub use highlight_core::{
    self, HighlightId, HighlightRecord, HighlightStore, HighlightStyle, MonospaceViewport,
    SelectionBoundary, TextSelection, Viewport,
};
pub use highlighter::{
    self, ConfigError, HighlightError, HighlightEvents, HighlightRenderer, Highlighter,
    HighlighterConfig, PreselectedContent, RenderError, RenderedHighlight, SelectionOutcome,
};
