//! # highlight_core
//!
//! Stateless building blocks of the highlighting pipeline, all operating on a
//! [`dom::Document`]:
//!
//! - capture: [`capture_selection`], [`adjusted_selection`]
//! - acceptance: [`is_valid_selection`], [`is_already_highlighted`],
//!   [`is_within_existing_highlight`]
//! - materialization: [`wrap_range_as_highlight`], [`unwrap_highlight`]
//! - lookup: [`find_text_in_element`], [`HighlightStore`], [`ContainmentCache`]
//!
//! Layout is out of scope; geometry comes from a host [`Viewport`].

mod boundary;
mod cache;
mod id;
mod materialize;
mod overlap;
mod search;
mod selection;
mod store;
mod style;
mod text;
mod viewport;

pub use boundary::{SelectionBoundary, adjust_to_word_boundary};
pub use cache::ContainmentCache;
pub use id::HighlightId;
pub use materialize::{
    create_highlight_element, unwrap_highlight, wrap_range_as_highlight, wrap_range_in,
};
pub use overlap::{
    is_already_highlighted, is_range_contained_in_element, is_selection_cross_element,
    is_valid_selection, is_within_existing_highlight, ranges_intersect,
};
pub use search::find_text_in_element;
pub use selection::{TextSelection, adjusted_selection, capture_selection};
pub use store::{HighlightRecord, HighlightStore};
pub use style::{CUSTOM_HIGHLIGHT_ATTR, DEFAULT_HIGHLIGHT_STYLE, HIGHLIGHT_ID_ATTR, HighlightStyle};
pub use text::{clamp_to_char_boundary, word_end, word_start};
pub use viewport::{MonospaceViewport, Viewport};
