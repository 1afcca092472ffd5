//! # dom
//!
//! In-process document tree used by the highlighting engine.
//!
//! - [`Document`]: arena of nodes with parent/child links, attributes and
//!   inline style, plus the document [`Selection`]
//! - [`Range`] / [`Position`]: boundary points and the DOM range algorithms
//!   (`compare_points`, `extract_contents`, `insert_node`, `surround_contents`,
//!   `range_text`)
//! - [`traverse`]: tree-order iteration helpers
//!
//! The crate has no notion of layout or rendering; geometry is supplied by the
//! host through the highlighting crates.

mod document;
mod error;
mod range;
mod selection;
pub mod traverse;
mod types;

pub use document::Document;
pub use error::DomError;
pub use range::{Position, Range};
pub use selection::Selection;
pub use types::{NodeKey, NodeKind, NodeType};
