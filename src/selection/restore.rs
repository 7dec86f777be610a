//! Selection restoration with graceful degradation
//!
//! `restore` maps a stored address back onto the live tree. It never fails:
//! stale content, a path the tree no longer has, or any inconsistency all
//! degrade to a caret at the end of the content. The result is always a
//! collapsed range at a valid point.

use serde::{Deserialize, Serialize};

use super::address::SelectionAddress;
use crate::content::{Container, DomPoint, LiveRange, NodeId};

/// How closely a restored caret matches the stored address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fidelity {
    /// Path and offset applied (offset possibly clamped)
    Exact,
    /// Content changed since capture; caret placed at end of content
    Stale,
    /// Path ran off the tree; caret placed at end of the last node reached
    Truncated,
}

/// A restored caret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restoration {
    pub range: LiveRange,
    pub fidelity: Fidelity,
}

/// Restore a caret from an address. `None` address is a no-op.
pub fn restore(container: &Container, address: Option<&SelectionAddress>) -> Option<Restoration> {
    let address = address?;

    let restoration = if !address.matches(&container.to_html()) {
        Restoration {
            range: LiveRange::caret(container.end_point()),
            fidelity: Fidelity::Stale,
        }
    } else {
        walk(container, address)
    };

    // Whatever came out must be a usable point; otherwise fall back
    if container.is_valid_point(restoration.range.start) {
        Some(restoration)
    } else {
        log::debug!("restore produced an invalid point; falling back to end of content");
        Some(Restoration {
            range: LiveRange::caret(container.end_point()),
            fidelity: Fidelity::Stale,
        })
    }
}

fn walk(container: &Container, address: &SelectionAddress) -> Restoration {
    let mut node: NodeId = container.root();

    for index in &address.child_path {
        match container.child(node, *index) {
            Some(child) => node = child,
            None => {
                return Restoration {
                    range: LiveRange::caret(container.end_point_of(node)),
                    fidelity: Fidelity::Truncated,
                };
            }
        }
    }

    let offset = address.offset.min(container.node_len(node));
    Restoration {
        range: LiveRange::caret(DomPoint::new(node, offset)),
        fidelity: Fidelity::Exact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::address::capture;

    #[test]
    fn test_none_address_is_noop() {
        let c = Container::from_html("abc");
        assert!(restore(&c, None).is_none());
    }

    #[test]
    fn test_round_trip_nested() {
        let c = Container::from_html("a<b>bc<i>de</i></b>f");
        let b = c.child(c.root(), 1).unwrap();
        let i = c.child(b, 1).unwrap();
        let de = c.child(i, 0).unwrap();
        let caret = LiveRange::caret(DomPoint::new(de, 1));

        let address = capture(&c, Some(&caret)).unwrap();
        let restored = restore(&c, Some(&address)).unwrap();

        assert_eq!(restored.fidelity, Fidelity::Exact);
        assert_eq!(restored.range, caret);
    }

    #[test]
    fn test_stale_content_falls_back_to_end() {
        let before = Container::from_html("<b>abc</b>");
        let address = SelectionAddress::new(vec![0, 0], 3, before.to_html());
        let after = Container::from_html("<b>abcdef</b>");

        let restored = restore(&after, Some(&address)).unwrap();
        assert_eq!(restored.fidelity, Fidelity::Stale);
        // last child of the container is an element: caret goes after it
        assert_eq!(restored.range.start, DomPoint::new(after.root(), 1));
    }

    #[test]
    fn test_path_off_the_tree_is_truncated() {
        let c = Container::from_html("<b>abc</b>xyz");
        let address = SelectionAddress::new(vec![0, 5, 2], 1, c.to_html());

        let restored = restore(&c, Some(&address)).unwrap();
        let b = c.child(c.root(), 0).unwrap();
        let abc = c.child(b, 0).unwrap();
        assert_eq!(restored.fidelity, Fidelity::Truncated);
        assert_eq!(restored.range.start, DomPoint::new(abc, 3));
    }

    #[test]
    fn test_path_past_a_text_node_ends_in_that_text() {
        let c = Container::from_html("<b>abc</b>");
        let address = SelectionAddress::new(vec![0, 0, 1], 0, c.to_html());

        let restored = restore(&c, Some(&address)).unwrap();
        let b = c.child(c.root(), 0).unwrap();
        let abc = c.child(b, 0).unwrap();
        assert_eq!(restored.fidelity, Fidelity::Truncated);
        assert_eq!(restored.range.start, DomPoint::new(abc, 3));
    }

    #[test]
    fn test_offset_is_clamped() {
        let c = Container::from_html("abc");
        let address = SelectionAddress::new(vec![0], 42, c.to_html());

        let restored = restore(&c, Some(&address)).unwrap();
        assert_eq!(restored.fidelity, Fidelity::Exact);
        assert_eq!(restored.range.start.offset, 3);
    }

    #[test]
    fn test_restore_is_idempotent() {
        let c = Container::from_html("abc<br>");
        let address = SelectionAddress::new(vec![0], 1, "different");

        let first = restore(&c, Some(&address));
        let second = restore(&c, Some(&address));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_container_fallback() {
        let c = Container::new();
        let address = SelectionAddress::new(vec![3], 7, "<b>gone</b>");

        let restored = restore(&c, Some(&address)).unwrap();
        assert_eq!(restored.range.start, DomPoint::new(c.root(), 0));
    }
}
