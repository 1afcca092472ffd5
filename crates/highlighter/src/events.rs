use highlight_core::TextSelection;

/// Lifecycle notifications. Every method defaults to a no-op.
pub trait HighlightEvents {
    /// A selection passed validation and is about to be highlighted.
    fn on_text_selected(&mut self, _selection: &TextSelection) {}

    /// A highlight became permanent.
    fn on_text_highlighted(&mut self, _selection: &TextSelection) {}

    fn on_highlight_removed(&mut self, _selection: &TextSelection) {}
}

impl HighlightEvents for () {}
