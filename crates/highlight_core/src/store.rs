use crate::id::HighlightId;
use crate::selection::TextSelection;
use dom::{Document, NodeKey, Range};
use std::collections::HashMap;

/// One materialized highlight.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightRecord {
    pub id: HighlightId,
    /// Wrapper element in the tree, carrying `data-highlight-id`.
    pub element: NodeKey,
    /// Selection the highlight was created from.
    pub selection: TextSelection,
    /// Awaiting user confirmation; not yet a committed highlight.
    pub transient: bool,
    /// Produced by a host renderer.
    pub custom: bool,
}

impl HighlightRecord {
    pub fn new(id: HighlightId, element: NodeKey, selection: TextSelection) -> Self {
        Self {
            id,
            element,
            selection,
            transient: false,
            custom: false,
        }
    }

    /// Current extent of the highlight: the range selecting its element while
    /// that is attached, otherwise the range captured at creation.
    pub fn extent(&self, doc: &Document) -> Range {
        doc.range_around(self.element).unwrap_or(self.selection.range)
    }
}

/// Highlight records by id.
///
/// Insertion order is not kept; callers needing document order sort by
/// position.
#[derive(Clone, Debug, Default)]
pub struct HighlightStore {
    records: HashMap<HighlightId, HighlightRecord>,
}

impl HighlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert or replace the record with the same id.
    pub fn insert(&mut self, record: HighlightRecord) -> Option<HighlightRecord> {
        self.records.insert(record.id.clone(), record)
    }

    pub fn remove(&mut self, id: &str) -> Option<HighlightRecord> {
        self.records.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&HighlightRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut HighlightRecord> {
        self.records.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Clear the transient flag. Returns `false` for unknown ids.
    pub fn promote(&mut self, id: &str) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                record.transient = false;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &HighlightRecord> {
        self.records.values()
    }

    /// Records that count as existing highlights for overlap checks.
    pub fn committed(&self) -> impl Iterator<Item = &HighlightRecord> {
        self.records.values().filter(|r| !r.transient)
    }

    pub fn find_by_element(&self, element: NodeKey) -> Option<&HighlightRecord> {
        self.records.values().find(|r| r.element == element)
    }

    /// First record whose selection has the same text at the same position.
    pub fn find_matching(&self, selection: &TextSelection) -> Option<&HighlightRecord> {
        self.records.values().find(|r| r.selection.same_place(selection))
    }

    /// Remove and return every record.
    pub fn drain(&mut self) -> Vec<HighlightRecord> {
        self.records.drain().map(|(_, r)| r).collect()
    }
}
