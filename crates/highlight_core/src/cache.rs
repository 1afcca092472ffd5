use dom::{Document, NodeKey};
use std::collections::{HashMap, HashSet};

/// Remembers, per container element, which highlight elements were found
/// enclosing selections inside it.
///
/// Consulted before walking ancestors in
/// [`is_within_existing_highlight`](crate::is_within_existing_highlight).
/// Entries must be dropped with [`forget`](Self::forget) when a highlight is
/// removed, otherwise a stale element could still claim containment.
#[derive(Clone, Debug, Default)]
pub struct ContainmentCache {
    entries: HashMap<NodeKey, HashSet<NodeKey>>,
}

impl ContainmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known(&self, container: NodeKey) -> Option<&HashSet<NodeKey>> {
        self.entries.get(&container)
    }

    pub fn extend(&mut self, container: NodeKey, highlights: impl IntoIterator<Item = NodeKey>) {
        self.entries.entry(container).or_default().extend(highlights);
    }

    /// Drop `element` from every container.
    pub fn forget(&mut self, element: NodeKey) {
        self.entries.retain(|_, set| {
            set.remove(&element);
            !set.is_empty()
        });
    }

    /// Drop entries whose container or highlight left the document.
    pub fn prune_detached(&mut self, doc: &Document) {
        self.entries.retain(|container, set| {
            set.retain(|el| doc.is_connected(*el));
            doc.is_connected(*container) && !set.is_empty()
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of containers with at least one cached highlight.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
