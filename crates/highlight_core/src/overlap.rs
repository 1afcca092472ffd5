//! Acceptance checks run before a selection is turned into a highlight.
//!
//! None of these fail: a boundary that cannot be compared (wrong tree, stale
//! offset) counts as "no overlap" and is logged at trace level.

use crate::cache::ContainmentCache;
use crate::selection::TextSelection;
use crate::store::HighlightStore;
use crate::style::HIGHLIGHT_ID_ATTR;
use dom::{Document, DomError, NodeKey, Range, traverse};
use std::cmp::Ordering;

/// Start and end live in different container nodes.
pub fn is_selection_cross_element(range: &Range) -> bool {
    range.start.node != range.end.node
}

/// A selection is acceptable when it exists, has non-blank text, and either
/// stays in one container or cross-element selections are allowed.
pub fn is_valid_selection(selection: Option<&TextSelection>, allow_cross_element: bool) -> bool {
    let Some(selection) = selection else {
        return false;
    };
    if selection.text.trim().is_empty() {
        return false;
    }
    allow_cross_element || !is_selection_cross_element(&selection.range)
}

/// Ranges intersect when neither lies entirely after the other. Ranges that
/// only touch at a boundary point intersect.
pub fn ranges_intersect(doc: &Document, a: &Range, b: &Range) -> bool {
    match try_intersect(doc, a, b) {
        Ok(intersect) => intersect,
        Err(err) => {
            log::trace!(target: "highlight.overlap", "incomparable ranges {a:?} / {b:?}: {err}");
            false
        }
    }
}

fn try_intersect(doc: &Document, a: &Range, b: &Range) -> Result<bool, DomError> {
    let a_after_b = doc.compare_points(a.start, b.end)? == Ordering::Greater;
    let b_after_a = doc.compare_points(b.start, a.end)? == Ordering::Greater;
    Ok(!a_after_b && !b_after_a)
}

/// `range` intersects the current extent of any committed highlight.
pub fn is_already_highlighted(doc: &Document, range: &Range, store: &HighlightStore) -> bool {
    store
        .committed()
        .any(|record| ranges_intersect(doc, range, &record.extent(doc)))
}

/// Both boundaries of `range` lie inside the contents of `element`.
pub fn is_range_contained_in_element(doc: &Document, range: &Range, element: NodeKey) -> bool {
    if !doc.is_inclusive_ancestor(element, range.start.node)
        || !doc.is_inclusive_ancestor(element, range.end.node)
    {
        return false;
    }
    let Ok(contents) = doc.range_over_contents(element) else {
        return false;
    };
    let inside = |point| doc.compare_point(&contents, point) == Ok(Ordering::Equal);
    inside(range.start) && inside(range.end)
}

/// `range` is fully inside some highlight element below `container`.
///
/// Highlights remembered in `cache` for `container` are checked first. Then
/// the ancestors of the range start are walked up to `container`; any
/// highlight elements met on the way are added to the cache.
pub fn is_within_existing_highlight(
    doc: &Document,
    range: &Range,
    container: NodeKey,
    cache: &mut ContainmentCache,
) -> bool {
    if let Some(known) = cache.known(container) {
        if known
            .iter()
            .any(|el| is_range_contained_in_element(doc, range, *el))
        {
            return true;
        }
    }

    let found: Vec<NodeKey> = traverse::inclusive_ancestors(doc, range.start.node)
        .take_while(|node| *node != container)
        .filter(|node| doc.is_element(*node) && doc.has_attribute(*node, HIGHLIGHT_ID_ATTR))
        .collect();
    let contained = found
        .iter()
        .any(|el| is_range_contained_in_element(doc, range, *el));
    if !found.is_empty() {
        cache.extend(container, found);
    }
    contained
}
