//! Boundary points and ranges inside a container
//!
//! Points follow DOM semantics: inside a text node the offset counts
//! characters, inside an element it counts children. Two points compare in
//! document order through the key `path(node) ++ [offset]`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::node::{Container, NodeId};

/// A boundary point (node + offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl DomPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A live selection range; `start` is never after `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveRange {
    pub start: DomPoint,
    pub end: DomPoint,
}

impl LiveRange {
    /// Create a collapsed range (caret)
    pub fn caret(point: DomPoint) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    /// Create a range, ordering the endpoints in document order
    pub fn new(container: &Container, a: DomPoint, b: DomPoint) -> Self {
        if container.compare_points(a, b) == Ordering::Greater {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

impl Container {
    fn point_key(&self, point: DomPoint) -> Vec<usize> {
        let mut key = self.path_of(point.node);
        key.push(point.offset);
        key
    }

    /// Compare two boundary points in document order
    pub fn compare_points(&self, a: DomPoint, b: DomPoint) -> Ordering {
        self.point_key(a).cmp(&self.point_key(b))
    }

    /// Check that a point refers to an attached node with an in-bounds offset
    pub fn is_valid_point(&self, point: DomPoint) -> bool {
        self.is_attached(point.node) && point.offset <= self.node_len(point.node)
    }

    /// Point immediately before a node, in its parent
    pub fn point_before(&self, node: NodeId) -> Option<DomPoint> {
        Some(DomPoint::new(self.parent(node)?, self.index_in_parent(node)?))
    }

    /// Point immediately after a node, in its parent
    pub fn point_after(&self, node: NodeId) -> Option<DomPoint> {
        Some(DomPoint::new(self.parent(node)?, self.index_in_parent(node)? + 1))
    }

    /// Start of a leaf: offset 0 for text, before the node for elements
    pub fn leaf_start(&self, leaf: NodeId) -> Option<DomPoint> {
        if self.is_text(leaf) {
            Some(DomPoint::new(leaf, 0))
        } else {
            self.point_before(leaf)
        }
    }

    /// End of a leaf: text length for text, after the node for elements
    pub fn leaf_end(&self, leaf: NodeId) -> Option<DomPoint> {
        if self.is_text(leaf) {
            Some(DomPoint::new(leaf, self.node_len(leaf)))
        } else {
            self.point_after(leaf)
        }
    }

    /// Fallback caret position at the end of `node`'s content.
    ///
    /// A text node: end of its text. Last child is text: end of that text.
    /// Last child is an element: right after it. No children: `(node, 0)`.
    pub fn end_point_of(&self, node: NodeId) -> DomPoint {
        if self.is_text(node) {
            return DomPoint::new(node, self.node_len(node));
        }
        match self.last_child(node) {
            Some(last) if self.is_text(last) => DomPoint::new(last, self.node_len(last)),
            Some(_) => DomPoint::new(node, self.children(node).len()),
            None => DomPoint::new(node, 0),
        }
    }

    /// End-of-content caret for the whole container
    pub fn end_point(&self) -> DomPoint {
        self.end_point_of(self.root())
    }

    /// Number of text characters before a point
    pub fn text_offset_of(&self, point: DomPoint) -> usize {
        let mut total = 0;
        for text in self.text_nodes() {
            if text == point.node {
                return total + point.offset.min(self.node_len(text));
            }
            if self.compare_points(DomPoint::new(text, 0), point) == Ordering::Less {
                total += self.node_len(text);
            } else {
                break;
            }
        }
        total
    }

    /// Total number of text characters
    pub fn text_len(&self) -> usize {
        self.text_content(self.root()).chars().count()
    }

    /// Point at a character offset of the text content.
    ///
    /// Offsets on a boundary between two text nodes resolve to the end of
    /// the earlier node; offsets past the end resolve to `end_point()`.
    pub fn point_at_text_offset(&self, offset: usize) -> DomPoint {
        let mut acc = 0;
        for text in self.text_nodes() {
            let len = self.node_len(text);
            if len == 0 {
                continue;
            }
            if acc + len >= offset {
                return DomPoint::new(text, offset - acc);
            }
            acc += len;
        }
        self.end_point()
    }

    /// Number of void elements (`<br>`, `<img>`) wholly before a point
    pub fn voids_before(&self, point: DomPoint) -> usize {
        self.leaves()
            .into_iter()
            .filter(|leaf| !self.is_text(*leaf))
            .filter_map(|leaf| self.point_after(leaf))
            .take_while(|after| self.compare_points(*after, point) != Ordering::Greater)
            .count()
    }

    /// Caret position of a point: text characters plus void elements
    /// before it. Unlike a text offset it tells the two sides of a `<br>`
    /// or an image apart.
    pub fn caret_position_of(&self, point: DomPoint) -> usize {
        self.text_offset_of(point) + self.voids_before(point)
    }

    /// Point at a caret position. A position right after a void element
    /// resolves after it; past the end resolves to `end_point()`.
    pub fn point_at_caret_position(&self, position: usize) -> DomPoint {
        let mut acc = 0;
        for leaf in self.leaves() {
            if self.is_text(leaf) {
                let len = self.node_len(leaf);
                if acc + len >= position {
                    return DomPoint::new(leaf, position - acc);
                }
                acc += len;
            } else {
                if acc == position {
                    if let Some(before) = self.point_before(leaf) {
                        return before;
                    }
                }
                acc += 1;
            }
        }
        self.end_point()
    }

    /// Leaves lying entirely inside `[start, end]`
    pub fn leaves_within(&self, start: DomPoint, end: DomPoint) -> Vec<NodeId> {
        self.leaves()
            .into_iter()
            .filter(|leaf| {
                match (self.leaf_start(*leaf), self.leaf_end(*leaf)) {
                    (Some(s), Some(e)) => {
                        self.compare_points(s, start) != Ordering::Less
                            && self.compare_points(e, end) != Ordering::Greater
                    }
                    _ => false,
                }
            })
            .collect()
    }
}
