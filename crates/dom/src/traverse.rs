use crate::{Document, NodeKey};

/// Pre-order iterator over the exclusive descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeKey>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let node = self.stack.pop()?;
        self.stack.extend(self.doc.children(node).iter().rev().copied());
        Some(node)
    }
}

pub fn descendants(doc: &Document, root: NodeKey) -> Descendants<'_> {
    Descendants {
        doc,
        stack: doc.children(root).iter().rev().copied().collect(),
    }
}

/// Text nodes under `root` in document order (the `SHOW_TEXT` tree walker).
pub fn text_nodes(doc: &Document, root: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
    descendants(doc, root).filter(move |n| doc.is_text(*n))
}

/// `node`, then each of its ancestors up to the root of its tree.
pub fn inclusive_ancestors(doc: &Document, node: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
    std::iter::successors(Some(node), move |n| doc.parent(*n))
}

/// First element under `root` (inclusive) whose `name` attribute equals `value`.
pub fn find_by_attribute(
    doc: &Document,
    root: NodeKey,
    name: &str,
    value: &str,
) -> Option<NodeKey> {
    std::iter::once(root)
        .chain(descendants(doc, root))
        .find(|n| doc.attribute(*n, name) == Some(value))
}

/// Nearest inclusive ancestor of `node` that carries the attribute `name`.
pub fn closest_with_attribute(doc: &Document, node: NodeKey, name: &str) -> Option<NodeKey> {
    inclusive_ancestors(doc, node).find(|n| doc.has_attribute(*n, name))
}
