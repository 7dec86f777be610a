//! Structure-independent selection addresses
//!
//! A `SelectionAddress` records where the caret was as a child-index path
//! from the container root plus an offset, tagged with the serialized
//! content it was captured against. It only means something against that
//! exact content; the restorer treats any other content as stale.

use serde::{Deserialize, Serialize};

use crate::content::{Container, DomPoint, LiveRange};

/// Serializable caret position within one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionAddress {
    /// Child indices from the container root to the target node (root-exclusive)
    #[serde(rename = "path")]
    pub child_path: Vec<usize>,

    /// Offset within the target node (characters for text, children for elements)
    pub offset: usize,

    /// Serialized container content at capture time
    #[serde(rename = "html")]
    pub content_fingerprint: String,
}

impl SelectionAddress {
    pub fn new(child_path: Vec<usize>, offset: usize, content_fingerprint: impl Into<String>) -> Self {
        Self {
            child_path,
            offset,
            content_fingerprint: content_fingerprint.into(),
        }
    }

    /// Check whether the address was captured against `content`
    pub fn matches(&self, content: &str) -> bool {
        self.content_fingerprint == content
    }
}

/// One boundary point given as a child path and offset against the live
/// content. This is what a host reads off the DOM selection; unlike text
/// offsets it can name either side of a `<br>` or an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPoint {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl PathPoint {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Resolve against the live content. The offset is clamped and a path
    /// that runs off the tree ends at the last node reached.
    pub fn resolve(&self, container: &Container) -> DomPoint {
        let address = SelectionAddress::new(self.path.clone(), self.offset, container.to_html());
        super::restore::restore(container, Some(&address))
            .map(|restored| restored.range.start)
            .unwrap_or_else(|| container.end_point())
    }
}

/// Capture the start point of a live selection.
///
/// Ranges collapse to their start. Returns `None` when there is no
/// selection or its start node is no longer attached to the container.
pub fn capture(container: &Container, live: Option<&LiveRange>) -> Option<SelectionAddress> {
    let start = live?.start;
    if !container.is_attached(start.node) {
        log::debug!("capture skipped: selection start is detached");
        return None;
    }

    // Walk up from the start node, recording each index among its siblings
    let mut child_path = Vec::new();
    let mut node = start.node;
    while node != container.root() {
        let parent = container.parent(node)?;
        let index = container.index_in_parent(node)?;
        child_path.push(index);
        node = parent;
    }
    child_path.reverse();

    Some(SelectionAddress {
        child_path,
        offset: start.offset,
        content_fingerprint: container.to_html(),
    })
}
