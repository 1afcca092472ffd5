//! Boundary points and ranges.
//!
//! [`Range`] is a plain value: it does not track later tree mutations the way a
//! browser's live ranges do. The algorithms here that mutate the tree
//! (`extract_contents`, `insert_node`, `surround_contents`) update the range they
//! are handed exactly as the DOM Standard updates the live range, so callers can
//! keep using it afterwards. Any other range held across a mutation is a
//! snapshot and must be re-derived.

use crate::error::DomError;
use crate::traverse;
use crate::{Document, NodeKey};
use std::cmp::Ordering;

/// A point inside the tree: a byte offset inside character data, or a child
/// index inside a container node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: NodeKey,
    pub offset: usize,
}

impl Position {
    #[inline]
    pub const fn new(node: NodeKey, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn collapsed_at(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// A caret, not a selection.
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn start_container(&self) -> NodeKey {
        self.start.node
    }

    #[inline]
    pub fn end_container(&self) -> NodeKey {
        self.end.node
    }

    fn boundaries_mut(&mut self) -> [&mut Position; 2] {
        [&mut self.start, &mut self.end]
    }

    /// Live-range bookkeeping for `count` nodes inserted into `parent` at `index`.
    fn shift_for_insert(&mut self, parent: NodeKey, index: usize, count: usize) {
        for boundary in self.boundaries_mut() {
            if boundary.node == parent && boundary.offset > index {
                boundary.offset += count;
            }
        }
    }

    /// Live-range bookkeeping for `node` split at `offset` into `node` + `tail`.
    /// `parent` carries the parent and the index of `node` within it; the tail
    /// lands at that index plus one.
    fn shift_for_split(
        &mut self,
        node: NodeKey,
        tail: NodeKey,
        offset: usize,
        parent: Option<(NodeKey, usize)>,
    ) {
        for boundary in self.boundaries_mut() {
            if boundary.node == node && boundary.offset > offset {
                boundary.node = tail;
                boundary.offset -= offset;
            } else if let Some((parent, index)) = parent {
                if boundary.node == parent && boundary.offset > index {
                    boundary.offset += 1;
                }
            }
        }
    }
}

impl Document {
    /// Build a range, validating offsets. Boundaries given in reverse document
    /// order are swapped so the result always satisfies `start <= end`.
    pub fn range(
        &self,
        start_node: NodeKey,
        start_offset: usize,
        end_node: NodeKey,
        end_offset: usize,
    ) -> Result<Range, DomError> {
        let start = self.checked_position(start_node, start_offset)?;
        let end = self.checked_position(end_node, end_offset)?;
        match self.compare_points(start, end)? {
            Ordering::Greater => Ok(Range::new(end, start)),
            _ => Ok(Range::new(start, end)),
        }
    }

    fn checked_position(&self, node: NodeKey, offset: usize) -> Result<Position, DomError> {
        self.record(node)?;
        if offset > self.node_length(node) {
            return Err(DomError::IndexSize { node, offset });
        }
        if let Some(data) = self.text(node) {
            if !data.is_char_boundary(offset) {
                return Err(DomError::IndexSize { node, offset });
            }
        }
        Ok(Position::new(node, offset))
    }

    /// `selectNode`: the range whose only content is `node`.
    pub fn range_around(&self, node: NodeKey) -> Result<Range, DomError> {
        let parent = self.parent(node).ok_or(DomError::InvalidNodeType(node))?;
        let index = self.index_of(node).ok_or(DomError::NotFound(node))?;
        Ok(Range::new(
            Position::new(parent, index),
            Position::new(parent, index + 1),
        ))
    }

    /// `selectNodeContents`: from before the first child to after the last.
    pub fn range_over_contents(&self, node: NodeKey) -> Result<Range, DomError> {
        self.record(node)?;
        Ok(Range::new(
            Position::new(node, 0),
            Position::new(node, self.node_length(node)),
        ))
    }

    /// Position of boundary point `a` relative to `b`.
    ///
    /// Fails with [`DomError::WrongDocument`] when the points live in different
    /// trees, e.g. one of them sits in a detached subtree.
    pub fn compare_points(&self, a: Position, b: Position) -> Result<Ordering, DomError> {
        self.record(a.node)?;
        self.record(b.node)?;
        if self.root_of(a.node) != self.root_of(b.node) {
            return Err(DomError::WrongDocument);
        }
        if a.node == b.node {
            return Ok(a.offset.cmp(&b.offset));
        }
        if self.tree_path(a.node) > self.tree_path(b.node) {
            return self.compare_points(b, a).map(Ordering::reverse);
        }
        if self.is_inclusive_ancestor(a.node, b.node) {
            let mut child = b.node;
            while let Some(parent) = self.parent(child) {
                if parent == a.node {
                    break;
                }
                child = parent;
            }
            if self.index_of(child).unwrap_or(0) < a.offset {
                return Ok(Ordering::Greater);
            }
        }
        Ok(Ordering::Less)
    }

    /// `comparePoint`: `Less` before the range, `Equal` inside it (inclusive),
    /// `Greater` after it.
    pub fn compare_point(&self, range: &Range, point: Position) -> Result<Ordering, DomError> {
        let point = self.checked_position(point.node, point.offset)?;
        if self.compare_points(point, range.start)? == Ordering::Less {
            return Ok(Ordering::Less);
        }
        if self.compare_points(point, range.end)? == Ordering::Greater {
            return Ok(Ordering::Greater);
        }
        Ok(Ordering::Equal)
    }

    pub fn common_ancestor_of(&self, range: &Range) -> Option<NodeKey> {
        self.common_ancestor(range.start.node, range.end.node)
    }

    /// DOM "contained": `(node, 0)` strictly after start and `(node, length)`
    /// strictly before end.
    pub fn is_contained(&self, range: &Range, node: NodeKey) -> Result<bool, DomError> {
        let after_start =
            self.compare_points(Position::new(node, 0), range.start)? == Ordering::Greater;
        if !after_start {
            return Ok(false);
        }
        let length = self.node_length(node);
        Ok(self.compare_points(Position::new(node, length), range.end)? == Ordering::Less)
    }

    /// `Range.toString()`: concatenated text of the text nodes in the range,
    /// trimmed to the boundary offsets.
    pub fn range_text(&self, range: &Range) -> Result<String, DomError> {
        let Range { start, end } = *range;
        if start.node == end.node {
            if let Some(data) = self.text(start.node).filter(|_| self.is_text(start.node)) {
                return data
                    .get(start.offset..end.offset)
                    .map(str::to_string)
                    .ok_or(DomError::IndexSize {
                        node: end.node,
                        offset: end.offset,
                    });
            }
        }
        let ancestor = self
            .common_ancestor_of(range)
            .ok_or(DomError::WrongDocument)?;

        let mut out = String::new();
        if self.is_text(start.node) {
            if let Some(tail) = self.text(start.node).and_then(|d| d.get(start.offset..)) {
                out.push_str(tail);
            }
        }
        for node in traverse::text_nodes(self, ancestor) {
            if self.is_contained(range, node)? {
                out.push_str(self.text(node).unwrap_or(""));
            }
        }
        if self.is_text(end.node) {
            if let Some(head) = self.text(end.node).and_then(|d| d.get(..end.offset)) {
                out.push_str(head);
            }
        }
        Ok(out)
    }

    /// `extractContents`: move the range's content into a new fragment,
    /// splitting partially contained nodes. The range collapses to the point
    /// where the content used to start.
    pub fn extract_contents(&mut self, range: &mut Range) -> Result<NodeKey, DomError> {
        let fragment = self.create_fragment();
        if range.is_collapsed() {
            return Ok(fragment);
        }
        let Range { start, end } = *range;
        self.checked_position(start.node, start.offset)?;
        self.checked_position(end.node, end.offset)?;

        if start.node == end.node && self.is_character_data(start.node) {
            let count = end
                .offset
                .checked_sub(start.offset)
                .ok_or(DomError::IndexSize {
                    node: end.node,
                    offset: end.offset,
                })?;
            let clone = self.clone_node(start.node)?;
            let data = self
                .text(start.node)
                .and_then(|d| d.get(start.offset..end.offset))
                .unwrap_or("")
                .to_string();
            self.set_text(clone, &data)?;
            self.append_child(fragment, clone)?;
            self.replace_data(start.node, start.offset, count, "")?;
            *range = Range::collapsed_at(start);
            return Ok(fragment);
        }

        let ancestor = self
            .common_ancestor(start.node, end.node)
            .ok_or(DomError::WrongDocument)?;
        let first_partial = if self.is_inclusive_ancestor(start.node, end.node) {
            None
        } else {
            self.children(ancestor)
                .iter()
                .copied()
                .find(|c| self.is_inclusive_ancestor(*c, start.node))
        };
        let last_partial = if self.is_inclusive_ancestor(end.node, start.node) {
            None
        } else {
            self.children(ancestor)
                .iter()
                .copied()
                .find(|c| self.is_inclusive_ancestor(*c, end.node))
        };
        let mut contained = Vec::new();
        for child in self.children(ancestor).to_vec() {
            if self.is_contained(range, child)? {
                contained.push(child);
            }
        }

        let collapse_to = if self.is_inclusive_ancestor(start.node, end.node) {
            start
        } else {
            let mut reference = start.node;
            while let Some(parent) = self.parent(reference) {
                if self.is_inclusive_ancestor(parent, end.node) {
                    break;
                }
                reference = parent;
            }
            let parent = self.parent(reference).ok_or(DomError::WrongDocument)?;
            let index = self.index_of(reference).ok_or(DomError::NotFound(reference))?;
            Position::new(parent, index + 1)
        };

        if let Some(first) = first_partial {
            if self.is_character_data(first) {
                let count = self
                    .node_length(start.node)
                    .checked_sub(start.offset)
                    .ok_or(DomError::IndexSize {
                        node: start.node,
                        offset: start.offset,
                    })?;
                let clone = self.clone_node(start.node)?;
                let data = self
                    .text(start.node)
                    .and_then(|d| d.get(start.offset..))
                    .unwrap_or("")
                    .to_string();
                self.set_text(clone, &data)?;
                self.append_child(fragment, clone)?;
                self.replace_data(start.node, start.offset, count, "")?;
            } else {
                let clone = self.clone_node(first)?;
                self.append_child(fragment, clone)?;
                let mut sub = Range::new(start, Position::new(first, self.node_length(first)));
                let sub_fragment = self.extract_contents(&mut sub)?;
                self.append_child(clone, sub_fragment)?;
            }
        }

        for child in contained {
            self.append_child(fragment, child)?;
        }

        if let Some(last) = last_partial {
            if self.is_character_data(last) {
                let clone = self.clone_node(end.node)?;
                let data = self
                    .text(end.node)
                    .and_then(|d| d.get(..end.offset))
                    .unwrap_or("")
                    .to_string();
                self.set_text(clone, &data)?;
                self.append_child(fragment, clone)?;
                self.replace_data(end.node, 0, end.offset, "")?;
            } else {
                let clone = self.clone_node(last)?;
                self.append_child(fragment, clone)?;
                let mut sub = Range::new(Position::new(last, 0), end);
                let sub_fragment = self.extract_contents(&mut sub)?;
                self.append_child(clone, sub_fragment)?;
            }
        }

        log::trace!(target: "dom.range", "extracted {range:?} into {fragment:?}");
        *range = Range::collapsed_at(collapse_to);
        Ok(fragment)
    }

    /// `insertNode`: insert `node` at the range's start, splitting a text node
    /// if the start lies inside one.
    pub fn insert_node(&mut self, range: &mut Range, node: NodeKey) -> Result<(), DomError> {
        let start = range.start;
        let start_is_text = self.is_text(start.node);
        if matches!(self.node_type(start.node), Some(crate::NodeType::Comment))
            || (start_is_text && self.parent(start.node).is_none())
            || start.node == node
        {
            return Err(DomError::HierarchyRequest {
                parent: start.node,
                child: node,
            });
        }

        let mut reference = if start_is_text {
            Some(start.node)
        } else {
            self.child_at(start.node, start.offset)
        };
        let parent = match reference {
            Some(r) => self.parent(r).ok_or(DomError::NotFound(r))?,
            None => start.node,
        };
        if !self.record(parent)?.allows_children() || self.is_inclusive_ancestor(node, parent) {
            return Err(DomError::HierarchyRequest {
                parent,
                child: node,
            });
        }

        if start_is_text {
            let index = self.index_of(start.node);
            let tail = self.split_text(start.node, start.offset)?;
            range.shift_for_split(start.node, tail, start.offset, index.map(|i| (parent, i)));
            reference = Some(tail);
        }
        if reference == Some(node) {
            reference = self.next_sibling(node);
        }
        if let Some(old_parent) = self.parent(node) {
            let old_index = self.index_of(node).unwrap_or(0);
            self.detach(node);
            for boundary in range.boundaries_mut() {
                if boundary.node == old_parent && boundary.offset > old_index {
                    boundary.offset -= 1;
                }
            }
        }

        let insert_at = match reference {
            Some(r) => self.index_of(r).ok_or(DomError::NotFound(r))?,
            None => self.node_length(parent),
        };
        let count = if self.node_type(node) == Some(crate::NodeType::Fragment) {
            self.node_length(node)
        } else {
            1
        };
        let was_collapsed = range.is_collapsed();
        self.insert_before(parent, node, reference)?;
        range.shift_for_insert(parent, insert_at, count);
        if was_collapsed {
            range.end = Position::new(parent, insert_at + count);
        }
        Ok(())
    }

    /// `surroundContents`: move the range's content into `new_parent` and put
    /// `new_parent` where the content was. Afterwards the range selects
    /// `new_parent`.
    ///
    /// Fails with [`DomError::InvalidState`] before touching the tree when a
    /// non-text node is only partially inside the range.
    pub fn surround_contents(
        &mut self,
        range: &mut Range,
        new_parent: NodeKey,
    ) -> Result<(), DomError> {
        if let Some(node) = self.partially_contained_non_text(range)? {
            return Err(DomError::InvalidState(node));
        }
        if !self.is_element(new_parent) {
            return Err(DomError::InvalidNodeType(new_parent));
        }

        let fragment = self.extract_contents(range)?;
        if !self.children(new_parent).is_empty() {
            self.remove_children(new_parent)?;
        }
        self.insert_node(range, new_parent)?;
        self.append_child(new_parent, fragment)?;
        *range = self.range_around(new_parent)?;
        Ok(())
    }

    fn partially_contained_non_text(&self, range: &Range) -> Result<Option<NodeKey>, DomError> {
        let Range { start, end } = *range;
        let ancestor = self
            .common_ancestor(start.node, end.node)
            .ok_or(DomError::WrongDocument)?;
        for (from, other) in [(start.node, end.node), (end.node, start.node)] {
            let offender = traverse::inclusive_ancestors(self, from)
                .take_while(|n| *n != ancestor)
                .find(|n| !self.is_inclusive_ancestor(*n, other) && !self.is_text(*n));
            if offender.is_some() {
                return Ok(offender);
            }
        }
        Ok(None)
    }
}
