use dom::{Document, NodeKey, Position, Range, traverse};
use memchr::memmem::Finder;

/// Every occurrence of `needle` inside a single text node under `root`, in
/// document order.
///
/// Matching is case-sensitive and non-overlapping within a node; text split
/// across nodes is not matched. An empty needle matches nothing.
pub fn find_text_in_element(doc: &Document, root: NodeKey, needle: &str) -> Vec<Range> {
    if needle.is_empty() {
        return Vec::new();
    }
    let finder = Finder::new(needle.as_bytes());
    let mut matches = Vec::new();
    for node in traverse::text_nodes(doc, root) {
        let Some(data) = doc.text(node) else {
            continue;
        };
        matches.extend(finder.find_iter(data.as_bytes()).map(|start| {
            Range::new(
                Position::new(node, start),
                Position::new(node, start + needle.len()),
            )
        }));
    }
    log::trace!(target: "highlight.search", "{} match(es) for {needle:?}", matches.len());
    matches
}
