//! Arena-backed content tree
//!
//! The container mirrors the editable surface of one window. Nodes live in
//! an arena addressed by `NodeId`; the root is the surface itself and is
//! never serialized (only its children are, like `innerHTML`).
//!
//! Detached nodes stay in the arena until the content is replaced wholesale
//! via `set_html`, which rebuilds the arena.

use serde::{Deserialize, Serialize};

/// Tags that never take children
pub const VOID_TAGS: &[&str] = &["br", "img", "hr", "input", "meta", "link", "wbr"];

/// Check if a tag is a void (childless) element
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Handle to a node in a `Container`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

/// An element node's tag and attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_void(&self) -> bool {
        is_void_tag(&self.tag)
    }
}

/// Kind of a content node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Text(String),
    Element(Element),
}

impl NodeKind {
    pub fn text(s: impl Into<String>) -> Self {
        NodeKind::Text(s.into())
    }

    pub fn element(tag: impl Into<String>) -> Self {
        NodeKind::Element(Element::new(tag))
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The editable surface of one window
#[derive(Debug, Clone)]
pub struct Container {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::element("div"),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    /// Build a container from serialized content
    pub fn from_html(html: &str) -> Self {
        let mut container = Self::new();
        container.set_html(html);
        container
    }

    /// Replace the whole content (rebuilds the arena)
    pub fn set_html(&mut self, html: &str) {
        *self = Self::new();
        let root = self.root;
        super::html::parse_into(self, root, html);
    }

    /// Serialize the content (children of the root)
    pub fn to_html(&self) -> String {
        super::html::serialize_children(self, self.root)
    }

    /// Remove all content
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Check that an id refers to a node of this arena
    pub fn is_valid(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Check that a node is the root or still hangs below it
    pub fn is_attached(&self, id: NodeId) -> bool {
        if !self.is_valid(id) {
            return false;
        }
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.children.get(index).copied())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.child(id, 0)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.children.last().copied())
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Text(_))
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text(s) => Some(s.as_str()),
            NodeKind::Element(_) => None,
        }
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    /// Check if a node is a void element (`br`, `img`, ...)
    pub fn is_void(&self, id: NodeId) -> bool {
        self.element(id).map(|el| el.is_void()).unwrap_or(false)
    }

    /// DOM-style length: characters for text, child count for elements
    pub fn node_len(&self, id: NodeId) -> usize {
        match self.kind(id) {
            NodeKind::Text(s) => s.chars().count(),
            NodeKind::Element(_) => self.children(id).len(),
        }
    }

    /// Position of a node among its parent's children
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Child-index path from the root (root-exclusive, root-to-node order)
    pub fn path_of(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;
        while current != self.root {
            match (self.parent(current), self.index_in_parent(current)) {
                (Some(parent), Some(index)) => {
                    path.push(index);
                    current = parent;
                }
                _ => break,
            }
        }
        path.reverse();
        path
    }

    /// Check if `ancestor` is `node` or one of its ancestors
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Allocate a detached node
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a node and insert it under `parent` at `index` (clamped)
    pub fn insert_child(&mut self, parent: NodeId, index: usize, kind: NodeKind) -> NodeId {
        let id = self.create(kind);
        self.attach(parent, index, id);
        id
    }

    /// Append a new node as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let index = self.children(parent).len();
        self.insert_child(parent, index, kind)
    }

    /// Attach a detached node under `parent` at `index` (clamped)
    pub fn attach(&mut self, parent: NodeId, index: usize, id: NodeId) {
        self.detach(id);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, id);
        self.nodes[id.0].parent = Some(parent);
    }

    /// Unlink a node from its parent; the subtree stays intact
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Replace a text node's content
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let NodeKind::Text(s) = &mut self.nodes[id.0].kind {
            *s = text.into();
        }
    }

    /// Split a text node at a character offset.
    ///
    /// The original node keeps `[..offset]`; the returned new sibling holds
    /// the rest. Returns `None` for non-text nodes or offsets at either end.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        let text = self.text(id)?.to_string();
        let len = text.chars().count();
        if offset == 0 || offset >= len {
            return None;
        }
        let byte = char_to_byte(&text, offset);
        let (head, tail) = text.split_at(byte);
        let tail = tail.to_string();
        self.set_text(id, head.to_string());
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        Some(self.insert_child(parent, index + 1, NodeKind::Text(tail)))
    }

    /// Concatenated text of every text node below `id`
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text(s) => out.push_str(s),
            NodeKind::Element(_) => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Nodes below the root in document (pre-)order
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(self.root, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(id) {
            out.push(*child);
            self.collect_descendants(*child, out);
        }
    }

    /// Text nodes in document order
    pub fn text_nodes(&self) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|id| self.is_text(*id))
            .collect()
    }

    /// Editable units in document order: non-empty text nodes and void elements
    pub fn leaves(&self) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|id| match self.kind(*id) {
                NodeKind::Text(s) => !s.is_empty(),
                NodeKind::Element(el) => el.is_void(),
            })
            .collect()
    }

    /// Deep-copy a subtree from another container under `parent` here
    pub fn import_subtree(&mut self, source: &Container, node: NodeId, parent: NodeId, index: usize) -> NodeId {
        let copy = self.insert_child(parent, index, source.kind(node).clone());
        for (i, child) in source.children(node).iter().enumerate() {
            self.import_subtree(source, *child, copy, i);
        }
        copy
    }
}

/// Byte index of the `n`th character (clamped to the string length)
pub fn char_to_byte(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(b, _)| b).unwrap_or(s.len())
}
