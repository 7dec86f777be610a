//! Caret persistence: capture a live selection as a `SelectionAddress` and
//! restore it later, degrading to end-of-content when the tree moved on.

pub mod address;
pub mod restore;

pub use address::{capture, PathPoint, SelectionAddress};
pub use restore::{restore, Fidelity, Restoration};
