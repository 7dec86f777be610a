//! Structural mutations at boundary points
//!
//! These are the primitives the edit engine is built from. Each returns the
//! caret position the mutation leaves behind. Non-void elements emptied by a
//! deletion are pruned (never the root).

use std::cmp::Ordering;
use std::collections::HashSet;

use super::node::{Container, Element, NodeId, NodeKind};
use super::range::{DomPoint, LiveRange};

impl Container {
    /// Parent and child index where new nodes go for a point
    fn insertion_slot(&mut self, point: DomPoint) -> (NodeId, usize) {
        let point = if self.is_valid_point(point) { point } else { self.end_point() };
        let node = point.node;

        if self.is_text(node) {
            let len = self.node_len(node);
            let parent = self.parent(node).unwrap_or(self.root());
            let index = self.index_in_parent(node).unwrap_or(0);
            if point.offset == 0 {
                (parent, index)
            } else if point.offset >= len {
                (parent, index + 1)
            } else {
                self.split_text(node, point.offset);
                (parent, index + 1)
            }
        } else if self.is_void(node) {
            match self.point_after(node) {
                Some(after) => (after.node, after.offset),
                None => (self.root(), self.children(self.root()).len()),
            }
        } else {
            (node, point.offset.min(self.node_len(node)))
        }
    }

    /// Insert text at a point, merging into an adjacent text node.
    /// Returns the caret right after the inserted text.
    pub fn insert_text_at(&mut self, point: DomPoint, text: &str) -> DomPoint {
        let inserted = text.chars().count();
        let point = if self.is_valid_point(point) { point } else { self.end_point() };

        if let Some(current) = self.text(point.node) {
            let byte = super::node::char_to_byte(current, point.offset);
            let mut updated = current.to_string();
            updated.insert_str(byte, text);
            self.set_text(point.node, updated);
            return DomPoint::new(point.node, point.offset + inserted);
        }

        let (parent, index) = self.insertion_slot(point);
        if index > 0 {
            if let Some(prev) = self.child(parent, index - 1) {
                if let Some(prev_text) = self.text(prev) {
                    let updated = format!("{}{}", prev_text, text);
                    let len = updated.chars().count();
                    self.set_text(prev, updated);
                    return DomPoint::new(prev, len);
                }
            }
        }
        if let Some(next) = self.child(parent, index) {
            if let Some(next_text) = self.text(next) {
                let updated = format!("{}{}", text, next_text);
                self.set_text(next, updated);
                return DomPoint::new(next, inserted);
            }
        }
        let id = self.insert_child(parent, index, NodeKind::text(text));
        DomPoint::new(id, inserted)
    }

    /// Insert a node at a point (splitting text if needed).
    /// Returns the node and the caret right after it.
    pub fn insert_node_at(&mut self, point: DomPoint, kind: NodeKind) -> (NodeId, DomPoint) {
        let (parent, index) = self.insertion_slot(point);
        let id = self.insert_child(parent, index, kind);
        (id, DomPoint::new(parent, index + 1))
    }

    /// Parse a fragment and insert its nodes at a point.
    /// Returns the caret right after the inserted nodes.
    pub fn insert_html_at(&mut self, point: DomPoint, html: &str) -> DomPoint {
        let fragment = Container::from_html(html);
        let (parent, index) = self.insertion_slot(point);
        let top_level = fragment.children(fragment.root()).to_vec();
        for (i, node) in top_level.iter().enumerate() {
            self.import_subtree(&fragment, *node, parent, index + i);
        }
        DomPoint::new(parent, index + top_level.len())
    }

    /// Detach a node and every ancestor it leaves empty (below the root)
    pub fn detach_and_prune(&mut self, id: NodeId) {
        let mut parent = self.parent(id);
        self.detach(id);
        while let Some(p) = parent {
            if p == self.root() || self.is_void(p) || !self.children(p).is_empty() {
                break;
            }
            parent = self.parent(p);
            self.detach(p);
        }
    }

    /// Last leaf ending at or before a point, excluding `skip`
    fn last_leaf_before(&self, point: DomPoint, skip: &HashSet<NodeId>) -> Option<NodeId> {
        self.leaves()
            .into_iter()
            .filter(|leaf| !skip.contains(leaf))
            .filter(|leaf| {
                self.leaf_end(*leaf)
                    .map(|end| self.compare_points(end, point) != Ordering::Greater)
                    .unwrap_or(false)
            })
            .last()
    }

    /// Pick `preferred` if still valid, else the end of `fallback_leaf`, else the start
    fn settle_caret(&self, preferred: Option<DomPoint>, fallback_leaf: Option<NodeId>) -> DomPoint {
        if let Some(point) = preferred {
            if self.is_valid_point(point) {
                return point;
            }
        }
        fallback_leaf
            .filter(|leaf| self.is_attached(*leaf))
            .and_then(|leaf| self.leaf_end(leaf))
            .unwrap_or_else(|| DomPoint::new(self.root(), 0))
    }

    /// Split text nodes so both points sit on leaf boundaries.
    /// Returns the adjusted `(start, end)`.
    pub fn split_at_boundaries(&mut self, range: LiveRange) -> (DomPoint, DomPoint) {
        let mut start = range.start;
        let mut end = range.end;

        if self.is_text(end.node) {
            self.split_text(end.node, end.offset);
        }
        if self.is_text(start.node) {
            let split_parent = self.parent(start.node);
            let split_index = self.index_in_parent(start.node);
            if let Some(tail) = self.split_text(start.node, start.offset) {
                if end.node == start.node {
                    end = DomPoint::new(tail, end.offset - start.offset);
                } else if Some(end.node) == split_parent {
                    if let Some(index) = split_index {
                        if end.offset > index {
                            end.offset += 1;
                        }
                    }
                }
                start = DomPoint::new(tail, 0);
            }
        }
        (start, end)
    }

    /// Delete everything inside a range. Returns the collapsed caret.
    pub fn delete_range(&mut self, range: LiveRange) -> DomPoint {
        if range.is_collapsed() {
            return range.start;
        }
        let (start, end) = self.split_at_boundaries(range);
        let inside: HashSet<NodeId> = self.leaves_within(start, end).into_iter().collect();
        let prev = self.last_leaf_before(start, &inside);

        for leaf in self.leaves_within(start, end) {
            self.detach_and_prune(leaf);
        }

        let preferred = if inside.contains(&start.node) { None } else { Some(start) };
        self.settle_caret(preferred, prev)
    }

    /// Delete one unit (character or void element) before a caret.
    /// Returns `None` when the caret is at the start of the content.
    pub fn delete_before(&mut self, point: DomPoint) -> Option<DomPoint> {
        let point = if self.is_valid_point(point) { point } else { self.end_point() };

        let (target, char_index) = if self.is_text(point.node) && point.offset > 0 {
            (point.node, Some(point.offset - 1))
        } else {
            let leaf = self.last_leaf_before(point, &HashSet::new())?;
            if self.is_text(leaf) {
                (leaf, Some(self.node_len(leaf) - 1))
            } else {
                (leaf, None)
            }
        };

        match char_index {
            Some(index) => {
                let text = self.text(target).unwrap_or("").to_string();
                let remaining: String = text
                    .chars()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, c)| c)
                    .collect();
                if remaining.is_empty() {
                    Some(self.remove_leaf(target))
                } else {
                    self.set_text(target, remaining);
                    Some(DomPoint::new(target, index))
                }
            }
            None => Some(self.remove_leaf(target)),
        }
    }

    /// Remove a leaf and return the caret where it was
    fn remove_leaf(&mut self, leaf: NodeId) -> DomPoint {
        let before = self.point_before(leaf);
        let mut skip = HashSet::new();
        skip.insert(leaf);
        let prev = before.and_then(|b| self.last_leaf_before(b, &skip));
        self.detach_and_prune(leaf);
        self.settle_caret(before, prev)
    }

    fn has_matching_ancestor(&self, node: NodeId, element: &Element) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == self.root() {
                return false;
            }
            if self.element(id) == Some(element) {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Wrap leaves in copies of `element`, one wrapper per run of adjacent
    /// siblings. Leaves already inside an identical element are skipped and
    /// wrappers merge into identical neighbours.
    pub fn wrap_leaves(&mut self, leaves: &[NodeId], element: &Element) {
        let targets: Vec<NodeId> = leaves
            .iter()
            .copied()
            .filter(|leaf| !self.has_matching_ancestor(*leaf, element))
            .collect();

        let mut runs: Vec<Vec<NodeId>> = Vec::new();
        for leaf in targets {
            let extends = runs.last().and_then(|run| run.last()).map(|last| {
                self.parent(*last) == self.parent(leaf)
                    && self.index_in_parent(*last).map(|i| i + 1) == self.index_in_parent(leaf)
            });
            match (extends, runs.last_mut()) {
                (Some(true), Some(run)) => run.push(leaf),
                _ => runs.push(vec![leaf]),
            }
        }

        for run in runs {
            let (Some(parent), Some(index)) = (self.parent(run[0]), self.index_in_parent(run[0])) else {
                continue;
            };
            let wrapper = self.insert_child(parent, index, NodeKind::Element(element.clone()));
            for (i, leaf) in run.iter().enumerate() {
                self.attach(wrapper, i, *leaf);
            }
            self.merge_with_neighbours(wrapper);
        }
    }

    fn merge_with_neighbours(&mut self, wrapper: NodeId) {
        let Some(parent) = self.parent(wrapper) else { return };

        if let Some(index) = self.index_in_parent(wrapper) {
            if let Some(next) = self.child(parent, index + 1) {
                if self.element(next).is_some() && self.element(next) == self.element(wrapper) {
                    for child in self.children(next).to_vec() {
                        let at = self.children(wrapper).len();
                        self.attach(wrapper, at, child);
                    }
                    self.detach(next);
                }
            }
        }

        if let Some(index) = self.index_in_parent(wrapper) {
            if index > 0 {
                if let Some(prev) = self.child(parent, index - 1) {
                    if self.element(prev).is_some() && self.element(prev) == self.element(wrapper) {
                        for child in self.children(wrapper).to_vec() {
                            let at = self.children(prev).len();
                            self.attach(prev, at, child);
                        }
                        self.detach(wrapper);
                    }
                }
            }
        }
    }

    /// Serialize a copy of the leaves inside `[start, end]` with the
    /// elements enclosing them (boundaries must already be split).
    pub fn fragment_html(&self, start: DomPoint, end: DomPoint) -> String {
        let inside: HashSet<NodeId> = self.leaves_within(start, end).into_iter().collect();
        let mut fragment = Container::new();
        let target = fragment.root();
        self.copy_filtered(self.root(), &inside, &mut fragment, target);
        fragment.to_html()
    }

    fn copy_filtered(&self, node: NodeId, inside: &HashSet<NodeId>, target: &mut Container, target_parent: NodeId) {
        for child in self.children(node) {
            if inside.contains(child) {
                let at = target.children(target_parent).len();
                target.import_subtree(self, *child, target_parent, at);
            } else if self.element(*child).is_some() && inside.iter().any(|leaf| self.contains(*child, *leaf)) {
                let copy = target.append_child(target_parent, self.kind(*child).clone());
                self.copy_filtered(*child, inside, target, copy);
            }
        }
    }
}
