//! Document selection state (`window.getSelection()`).

use crate::range::Range;

/// The user's current selection. Hosts update it from pointer input; the
/// highlighting pipeline only reads it and clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<Range>,
}

impl Selection {
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn range_at(&self, index: usize) -> Option<&Range> {
        self.ranges.get(index)
    }

    /// `true` when there is nothing selected or the primary range is a caret.
    pub fn is_collapsed(&self) -> bool {
        self.ranges.first().is_none_or(Range::is_collapsed)
    }

    pub fn add_range(&mut self, range: Range) {
        self.ranges.push(range);
    }

    /// Replace the whole selection with `range`.
    pub fn select(&mut self, range: Range) {
        self.ranges.clear();
        self.ranges.push(range);
    }

    pub fn remove_all_ranges(&mut self) {
        self.ranges.clear();
    }
}
