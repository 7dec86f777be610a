//! Content model for an editable surface
//!
//! The container is the Rust-side mirror of one window's `contenteditable`
//! element: a tree of text and element nodes, serialized as an HTML fragment.
//!
//! ## Modules
//!
//! - `node`: arena tree and node kinds
//! - `html`: lenient fragment parser and deterministic serializer
//! - `range`: boundary points, ranges, document order, text offsets
//! - `mutate`: structural primitives used by the edit engine

pub mod node;
pub mod html;
pub mod range;
pub mod mutate;

pub use node::{Container, Element, NodeId, NodeKind};
pub use range::{DomPoint, LiveRange};
