use crate::render::RenderError;
use dom::DomError;
use highlight_core::HighlightId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("document operation failed: {0}")]
    Dom(#[from] DomError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("no highlight with id {0}")]
    UnknownHighlight(HighlightId),
    #[error("no highlight is awaiting confirmation")]
    NothingPending,
}
