//! # highlighter
//!
//! Stateful front of the highlighting engine. A [`Highlighter`] is bound to a
//! container element and driven by host events:
//!
//! ```text
//! pointer up ──▶ debounce ──▶ poll ──▶ capture ▶ validate ▶ wrap ▶ store
//!                                                          │
//!                                         confirm_highlights?
//!                                           ├─ no:  on_text_highlighted
//!                                           └─ yes: pending ▶ frame ▶ confirm / cancel
//! ```
//!
//! Programmatic entry points ([`Highlighter::highlight_text`],
//! [`Highlighter::apply_preselected`]) bypass the debounce and the
//! confirmation flow.

mod config;
mod debounce;
mod error;
mod events;
mod orchestrator;
mod render;

pub use config::{ConfigError, HighlighterConfig};
pub use debounce::Debouncer;
pub use error::HighlightError;
pub use events::HighlightEvents;
pub use orchestrator::{
    Highlighter, PendingConfirmation, PreselectedContent, ProcessingGuard, Rejection,
    SelectionOutcome,
};
pub use render::{HighlightRenderer, RenderError, RenderedHighlight, apply_rendered_highlight};
