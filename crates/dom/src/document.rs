//! Live document tree.
//!
//! Nodes live in a flat arena indexed by [`NodeKey`]. Parent and child links are
//! stored as keys, so detaching a subtree never frees it: detached nodes keep
//! their key and can be re-inserted, which is what range extraction relies on.
//!
//! Invariants:
//! - A node has at most one parent, and appears exactly once in that parent's
//!   child list.
//! - Only document, fragment and element nodes have children.
//! - Text offsets are UTF-8 byte offsets and must fall on char boundaries.
//! - Mutations never create cycles.

use crate::error::DomError;
use crate::selection::Selection;
use crate::traverse;
use crate::types::{NodeKey, NodeKind, NodeRecord, NodeType};

pub struct Document {
    nodes: Vec<NodeRecord>,
    root: NodeKey,
    selection: Selection,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord::new(NodeKind::Document)],
            root: NodeKey(0),
            selection: Selection::default(),
        }
    }

    /// The document node every connected node descends from.
    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn contains_key(&self, key: NodeKey) -> bool {
        key.index() < self.nodes.len()
    }

    pub(crate) fn record(&self, key: NodeKey) -> Result<&NodeRecord, DomError> {
        self.nodes.get(key.index()).ok_or(DomError::NotFound(key))
    }

    fn record_mut(&mut self, key: NodeKey) -> Result<&mut NodeRecord, DomError> {
        self.nodes.get_mut(key.index()).ok_or(DomError::NotFound(key))
    }

    // ---------------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------------

    fn insert_record(&mut self, kind: NodeKind) -> NodeKey {
        let key = NodeKey(self.nodes.len() as u32);
        self.nodes.push(NodeRecord::new(kind));
        key
    }

    pub fn create_element(&mut self, name: &str) -> NodeKey {
        self.insert_record(NodeKind::Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
            style: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeKey {
        self.insert_record(NodeKind::Text {
            text: text.to_string(),
        })
    }

    pub fn create_comment(&mut self, text: &str) -> NodeKey {
        self.insert_record(NodeKind::Comment {
            text: text.to_string(),
        })
    }

    pub fn create_fragment(&mut self) -> NodeKey {
        self.insert_record(NodeKind::Fragment)
    }

    /// Shallow copy: same kind, attributes and data, no children, no parent.
    pub fn clone_node(&mut self, key: NodeKey) -> Result<NodeKey, DomError> {
        let kind = self.record(key)?.kind.shallow_clone();
        if matches!(kind, NodeKind::Document) {
            return Err(DomError::InvalidNodeType(key));
        }
        Ok(self.insert_record(kind))
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeKey, name: &str) -> Result<NodeKey, DomError> {
        let element = self.create_element(name);
        self.append_child(parent, element)?;
        Ok(element)
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeKey, text: &str) -> Result<NodeKey, DomError> {
        let node = self.create_text(text);
        self.append_child(parent, node)?;
        Ok(node)
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    pub fn kind(&self, key: NodeKey) -> Option<&NodeKind> {
        self.nodes.get(key.index()).map(|r| &r.kind)
    }

    pub fn node_type(&self, key: NodeKey) -> Option<NodeType> {
        self.kind(key).map(NodeKind::node_type)
    }

    pub fn is_text(&self, key: NodeKey) -> bool {
        matches!(self.kind(key), Some(NodeKind::Text { .. }))
    }

    pub fn is_element(&self, key: NodeKey) -> bool {
        matches!(self.kind(key), Some(NodeKind::Element { .. }))
    }

    pub fn is_character_data(&self, key: NodeKey) -> bool {
        self.kind(key).is_some_and(|k| k.character_data().is_some())
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key.index()).and_then(|r| r.parent)
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key.index())
            .map(|r| r.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_child(&self, key: NodeKey) -> Option<NodeKey> {
        self.children(key).first().copied()
    }

    pub fn child_at(&self, key: NodeKey, index: usize) -> Option<NodeKey> {
        self.children(key).get(index).copied()
    }

    /// Position of `key` within its parent's child list.
    pub fn index_of(&self, key: NodeKey) -> Option<usize> {
        let parent = self.parent(key)?;
        self.children(parent).iter().position(|c| *c == key)
    }

    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(key)?;
        let index = self.index_of(key)?;
        self.child_at(parent, index + 1)
    }

    pub fn previous_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(key)?;
        let index = self.index_of(key)?;
        index.checked_sub(1).and_then(|i| self.child_at(parent, i))
    }

    /// DOM node length: byte length for character data, child count otherwise.
    pub fn node_length(&self, key: NodeKey) -> usize {
        match self.nodes.get(key.index()) {
            Some(record) => match record.kind.character_data() {
                Some(data) => data.len(),
                None => record.children.len(),
            },
            None => 0,
        }
    }

    /// Character data of a text or comment node.
    pub fn text(&self, key: NodeKey) -> Option<&str> {
        self.kind(key).and_then(NodeKind::character_data)
    }

    pub fn tag_name(&self, key: NodeKey) -> Option<&str> {
        match self.kind(key) {
            Some(NodeKind::Element { name, .. }) => Some(name),
            _ => None,
        }
    }

    pub fn attribute(&self, key: NodeKey, name: &str) -> Option<&str> {
        match self.kind(key) {
            Some(NodeKind::Element { attributes, .. }) => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn has_attribute(&self, key: NodeKey, name: &str) -> bool {
        self.attribute(key, name).is_some()
    }

    pub fn attributes(&self, key: NodeKey) -> &[(String, String)] {
        match self.kind(key) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    /// Inline style declarations in insertion order.
    pub fn style(&self, key: NodeKey) -> &[(String, String)] {
        match self.kind(key) {
            Some(NodeKind::Element { style, .. }) => style,
            _ => &[],
        }
    }

    pub fn style_property(&self, key: NodeKey, property: &str) -> Option<&str> {
        self.style(key)
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Flattened text of every descendant text node, in tree order.
    pub fn text_content(&self, key: NodeKey) -> String {
        if let Some(data) = self.text(key) {
            return data.to_string();
        }
        let mut out = String::new();
        for node in traverse::text_nodes(self, key) {
            if let Some(data) = self.text(node) {
                out.push_str(data);
            }
        }
        out
    }

    /// Number of nodes in the subtree rooted at `key`, including `key`.
    pub fn subtree_size(&self, key: NodeKey) -> usize {
        1 + traverse::descendants(self, key).count()
    }

    // ---------------------------------------------------------------------
    // Attribute / style mutation
    // ---------------------------------------------------------------------

    fn element_parts_mut(
        &mut self,
        key: NodeKey,
    ) -> Result<(&mut Vec<(String, String)>, &mut Vec<(String, String)>), DomError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Element {
                attributes, style, ..
            } => Ok((attributes, style)),
            _ => Err(DomError::InvalidNodeType(key)),
        }
    }

    pub fn set_attribute(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError> {
        let (attributes, _) = self.element_parts_mut(key)?;
        match attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => attributes.push((name.to_ascii_lowercase(), value.to_string())),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, key: NodeKey, name: &str) -> Result<(), DomError> {
        let (attributes, _) = self.element_parts_mut(key)?;
        attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(())
    }

    pub fn set_style_property(
        &mut self,
        key: NodeKey,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let (_, style) = self.element_parts_mut(key)?;
        match style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => style.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Tree relations
    // ---------------------------------------------------------------------

    /// Topmost inclusive ancestor. Detached subtrees have their own root.
    pub fn root_of(&self, key: NodeKey) -> NodeKey {
        let mut current = key;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn is_connected(&self, key: NodeKey) -> bool {
        self.contains_key(key) && self.root_of(key) == self.root
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        traverse::inclusive_ancestors(self, node).any(|n| n == ancestor)
    }

    /// Child indices from the root down to `key`; tree order is the
    /// lexicographic order of these paths.
    pub(crate) fn tree_path(&self, key: NodeKey) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = key;
        while let Some(parent) = self.parent(current) {
            path.push(self.index_of(current).unwrap_or(0));
            current = parent;
        }
        path.reverse();
        path
    }

    pub fn common_ancestor(&self, a: NodeKey, b: NodeKey) -> Option<NodeKey> {
        let chain: Vec<NodeKey> = traverse::inclusive_ancestors(self, a).collect();
        traverse::inclusive_ancestors(self, b).find(|n| chain.contains(n))
    }

    // ---------------------------------------------------------------------
    // Tree mutation
    // ---------------------------------------------------------------------

    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `before` (or at the end).
    ///
    /// A fragment child is emptied into `parent`, preserving order. A child that
    /// already has a parent is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: Option<NodeKey>,
    ) -> Result<(), DomError> {
        self.ensure_insertable(parent, child)?;
        if let Some(before) = before {
            if self.parent(before) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: before,
                });
            }
        }
        let before = if before == Some(child) {
            self.next_sibling(child)
        } else {
            before
        };

        if self.record(child)?.kind == NodeKind::Fragment {
            let moved = std::mem::take(&mut self.record_mut(child)?.children);
            for node in moved {
                self.record_mut(node)?.parent = None;
                self.link_before(parent, node, before)?;
            }
            return Ok(());
        }

        self.detach(child);
        self.link_before(parent, child, before)
    }

    fn ensure_insertable(&self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        let parent_record = self.record(parent)?;
        let child_record = self.record(child)?;
        if !parent_record.allows_children()
            || matches!(child_record.kind, NodeKind::Document)
            || self.is_inclusive_ancestor(child, parent)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn link_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: Option<NodeKey>,
    ) -> Result<(), DomError> {
        let position = match before {
            Some(before) => self
                .children(parent)
                .iter()
                .position(|c| *c == before)
                .ok_or(DomError::NotAChild {
                    parent,
                    child: before,
                })?,
            None => self.children(parent).len(),
        };
        self.record_mut(parent)?.children.insert(position, child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    /// Unlink `key` from its parent, if any. The subtree stays intact.
    pub fn detach(&mut self, key: NodeKey) {
        let Some(parent) = self.parent(key) else {
            return;
        };
        if let Some(record) = self.nodes.get_mut(parent.index()) {
            record.children.retain(|c| *c != key);
        }
        if let Some(record) = self.nodes.get_mut(key.index()) {
            record.parent = None;
        }
    }

    /// Detach every child of `key`.
    pub fn remove_children(&mut self, key: NodeKey) -> Result<(), DomError> {
        let children = std::mem::take(&mut self.record_mut(key)?.children);
        for child in children {
            self.record_mut(child)?.parent = None;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Character data
    // ---------------------------------------------------------------------

    fn check_char_offset(&self, key: NodeKey, data: &str, offset: usize) -> Result<(), DomError> {
        if offset > data.len() || !data.is_char_boundary(offset) {
            return Err(DomError::IndexSize { node: key, offset });
        }
        Ok(())
    }

    /// Replace the character data of a text or comment node.
    pub fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        let data = self
            .record_mut(key)?
            .kind
            .character_data_mut()
            .ok_or(DomError::InvalidNodeType(key))?;
        data.clear();
        data.push_str(text);
        Ok(())
    }

    /// DOM `replaceData(offset, count, data)`; `count` is clamped to the end.
    pub fn replace_data(
        &mut self,
        key: NodeKey,
        offset: usize,
        count: usize,
        data: &str,
    ) -> Result<(), DomError> {
        let current = self.text(key).ok_or(DomError::InvalidNodeType(key))?;
        self.check_char_offset(key, current, offset)?;
        let end = offset.saturating_add(count).min(current.len());
        self.check_char_offset(key, current, end)?;
        if let Some(text) = self.record_mut(key)?.kind.character_data_mut() {
            text.replace_range(offset..end, data);
        }
        Ok(())
    }

    /// DOM `splitText(offset)`: the tail moves into a new text node inserted
    /// right after `key`. Returns the new node.
    pub fn split_text(&mut self, key: NodeKey, offset: usize) -> Result<NodeKey, DomError> {
        let data = match self.kind(key) {
            Some(NodeKind::Text { text }) => text,
            Some(_) => return Err(DomError::InvalidNodeType(key)),
            None => return Err(DomError::NotFound(key)),
        };
        self.check_char_offset(key, data, offset)?;
        let tail = data[offset..].to_string();
        let count = tail.len();
        let new_node = self.create_text(&tail);
        if let Some(parent) = self.parent(key) {
            let next = self.next_sibling(key);
            self.link_before(parent, new_node, next)?;
        }
        self.replace_data(key, offset, count, "")?;
        log::trace!(target: "dom.tree", "split text {key:?} at {offset} -> {new_node:?}");
        Ok(new_node)
    }

    /// Replace all children of an element with a single text node, or replace
    /// the data of a character-data node.
    pub fn set_text_content(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        if self.is_character_data(key) {
            return self.set_text(key, text);
        }
        if !self.record(key)?.allows_children() {
            return Err(DomError::InvalidNodeType(key));
        }
        self.remove_children(key)?;
        if !text.is_empty() {
            self.append_text(key, text)?;
        }
        Ok(())
    }

    /// DOM `normalize()`: drop empty text nodes and merge runs of adjacent text
    /// nodes into the first one, throughout the subtree.
    pub fn normalize(&mut self, key: NodeKey) {
        let mut index = 0;
        while let Some(child) = self.child_at(key, index) {
            if !self.is_text(child) {
                self.normalize(child);
                index += 1;
                continue;
            }
            if self.node_length(child) == 0 {
                self.detach(child);
                continue;
            }
            let mut merged = String::new();
            while let Some(next) = self.next_sibling(child) {
                let Some(data) = self.text(next).filter(|_| self.is_text(next)) else {
                    break;
                };
                merged.push_str(data);
                self.detach(next);
            }
            if !merged.is_empty() {
                if let Some(text) = self
                    .nodes
                    .get_mut(child.index())
                    .and_then(|r| r.kind.character_data_mut())
                {
                    text.push_str(&merged);
                }
            }
            index += 1;
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
