//! Regex find/replace
//!
//! Matching runs over the concatenated text content, so a match may span
//! several text nodes (e.g. across a formatting boundary). The replacement
//! text goes into the node where the match starts; the rest of the match is
//! removed from the following nodes. Markup is never matched or replaced.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{live_range, snapshot};
use crate::content::node::char_to_byte;
use crate::content::{DomPoint, LiveRange};
use crate::errors::{EditorError, EditorResult};
use crate::models::EditableWindow;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplaceScope {
    /// Only text inside the current selection
    Selection,
    /// The whole content
    #[default]
    Document,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced(usize),
    NoMatches,
}

/// One match, in character offsets of the text content
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

impl Edit {
    fn delta(&self) -> isize {
        self.replacement.chars().count() as isize - (self.end - self.start) as isize
    }
}

/// Compile a find/replace pattern (case-sensitive)
pub fn compile(pattern: &str) -> EditorResult<Regex> {
    Regex::new(pattern).map_err(|e| EditorError::InvalidPattern(e.to_string()))
}

/// Replace every match of `pattern` in scope as a single undo step.
///
/// `$1`/`${name}` in `replacement` expand to capture groups. Zero-length
/// matches are ignored. An invalid pattern fails before anything changes;
/// no matches is an outcome, not an error.
pub fn find_replace(
    window: &mut EditableWindow,
    pattern: &str,
    replacement: &str,
    scope: ReplaceScope,
) -> EditorResult<ReplaceOutcome> {
    let regex = compile(pattern)?;

    let container = &window.container;
    let (scope_start, scope_end) = match scope {
        ReplaceScope::Document => (0, container.text_len()),
        ReplaceScope::Selection => {
            let range = live_range(window)?;
            (container.text_offset_of(range.start), container.text_offset_of(range.end))
        }
    };

    let full = container.text_content(container.root());
    let edits = collect_edits(&regex, &full, scope_start, scope_end, replacement);
    if edits.is_empty() {
        return Ok(ReplaceOutcome::NoMatches);
    }

    // Selection as (text offset, voids before), so a caret next to a `<br>`
    // or image keeps its side; only the text offset moves with the edits
    let anchor = |point: DomPoint| (container.text_offset_of(point), container.voids_before(point));
    let selection_anchors = window.selection.map(|range| (anchor(range.start), anchor(range.end)));

    snapshot(window);
    apply_edits(window, &edits);

    let container = &window.container;
    let resolve = |(offset, voids): (usize, usize)| container.point_at_caret_position(remap(offset, &edits) + voids);
    window.selection = selection_anchors.map(|(start, end)| LiveRange::new(container, resolve(start), resolve(end)));

    log::debug!("find_replace: {} replacement(s) for /{}/", edits.len(), pattern);
    Ok(ReplaceOutcome::Replaced(edits.len()))
}

fn collect_edits(regex: &Regex, full: &str, scope_start: usize, scope_end: usize, replacement: &str) -> Vec<Edit> {
    let byte_start = char_to_byte(full, scope_start);
    let byte_end = char_to_byte(full, scope_end);
    let haystack = &full[byte_start..byte_end];

    let mut edits = Vec::new();
    for caps in regex.captures_iter(haystack) {
        let Some(m) = caps.get(0) else { continue };
        if m.as_str().is_empty() {
            continue;
        }
        let mut expanded = String::new();
        caps.expand(replacement, &mut expanded);

        let start = scope_start + haystack[..m.start()].chars().count();
        edits.push(Edit {
            start,
            end: start + m.as_str().chars().count(),
            replacement: expanded,
        });
    }
    edits
}

/// Apply non-overlapping edits (in ascending order) to the text nodes
fn apply_edits(window: &mut EditableWindow, edits: &[Edit]) {
    let container = &mut window.container;
    let nodes = container.text_nodes();

    let mut texts: Vec<Vec<char>> = nodes
        .iter()
        .map(|id| container.text(*id).unwrap_or("").chars().collect())
        .collect();
    let mut starts = Vec::with_capacity(texts.len());
    let mut acc = 0;
    for text in &texts {
        starts.push(acc);
        acc += text.len();
    }
    let lengths: Vec<usize> = texts.iter().map(Vec::len).collect();

    // Back to front, so text before each edit is still at its original offset
    for edit in edits.iter().rev() {
        let mut target: Option<(usize, usize)> = None;
        for (i, text) in texts.iter_mut().enumerate() {
            let node_start = starts[i];
            let node_end = node_start + lengths[i];
            let from = edit.start.max(node_start);
            let to = edit.end.min(node_end);
            if from >= to {
                continue;
            }
            text.drain(from - node_start..to - node_start);
            if target.is_none() {
                target = Some((i, from - node_start));
            }
        }
        if let Some((i, at)) = target {
            let replacement: Vec<char> = edit.replacement.chars().collect();
            texts[i].splice(at..at, replacement);
        }
    }

    for (id, text) in nodes.iter().zip(texts) {
        if text.is_empty() {
            container.detach_and_prune(*id);
        } else {
            container.set_text(*id, text.into_iter().collect::<String>());
        }
    }
}

/// Map a text offset through the edits. Offsets inside a replaced match
/// move to the end of its replacement.
fn remap(offset: usize, edits: &[Edit]) -> usize {
    let mut shift: isize = 0;
    for edit in edits {
        if offset >= edit.end {
            shift += edit.delta();
        } else if offset > edit.start {
            let start = edit.start as isize + shift;
            return (start + edit.replacement.chars().count() as isize).max(0) as usize;
        } else {
            break;
        }
    }
    (offset as isize + shift).max(0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_with(html: &str) -> EditableWindow {
        let mut window = EditableWindow::with_file("textWindow1", "doc", html, None);
        window.caret_to_end();
        window
    }

    fn select(window: &mut EditableWindow, from: usize, to: usize) {
        let c = &window.container;
        let range = LiveRange::new(c, c.point_at_text_offset(from), c.point_at_text_offset(to));
        window.set_selection(Some(range));
    }

    #[test]
    fn test_replace_whole_document() {
        let mut window = window_with("hello world");
        let outcome = find_replace(&mut window, "o", "0", ReplaceScope::Document).unwrap();

        assert_eq!(outcome, ReplaceOutcome::Replaced(2));
        assert_eq!(window.content(), "hell0 w0rld");
        assert_eq!(window.undo.undo_count(), 1);
    }

    #[test]
    fn test_no_matches_changes_nothing() {
        let mut window = window_with("hello");
        let outcome = find_replace(&mut window, "z+", "y", ReplaceScope::Document).unwrap();

        assert_eq!(outcome, ReplaceOutcome::NoMatches);
        assert_eq!(window.content(), "hello");
        assert!(!window.undo.can_undo());
    }

    #[test]
    fn test_invalid_pattern_changes_nothing() {
        let mut window = window_with("hello");
        let err = find_replace(&mut window, "(unclosed", "x", ReplaceScope::Document).unwrap_err();

        assert!(matches!(err, EditorError::InvalidPattern(_)));
        assert_eq!(window.content(), "hello");
        assert!(!window.undo.can_undo());
    }

    #[test]
    fn test_case_sensitive() {
        let mut window = window_with("Aa");
        find_replace(&mut window, "a", "b", ReplaceScope::Document).unwrap();
        assert_eq!(window.content(), "Ab");
    }

    #[test]
    fn test_capture_groups() {
        let mut window = window_with("John Smith");
        find_replace(&mut window, r"(\w+) (\w+)", "$2, $1", ReplaceScope::Document).unwrap();
        assert_eq!(window.content(), "Smith, John");
    }

    #[test]
    fn test_match_across_formatting() {
        let mut window = window_with("ab<b>cd</b>ef");
        let outcome = find_replace(&mut window, "bcd", "X", ReplaceScope::Document).unwrap();

        assert_eq!(outcome, ReplaceOutcome::Replaced(1));
        // emptied <b> is pruned
        assert_eq!(window.content(), "aXef");
    }

    #[test]
    fn test_selection_scope() {
        let mut window = window_with("aaa|aaa");
        select(&mut window, 4, 6);

        let outcome = find_replace(&mut window, "a", "b", ReplaceScope::Selection).unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced(2));
        assert_eq!(window.content(), "aaa|bba");
    }

    #[test]
    fn test_selection_scope_requires_range() {
        let mut window = window_with("abc");
        let err = find_replace(&mut window, "a", "b", ReplaceScope::Selection).unwrap_err();
        assert_eq!(err, EditorError::EmptySelection("textWindow1".to_string()));
    }

    #[test]
    fn test_zero_length_matches_ignored() {
        let mut window = window_with("abc");
        let outcome = find_replace(&mut window, "x*", "-", ReplaceScope::Document).unwrap();
        assert_eq!(outcome, ReplaceOutcome::NoMatches);
    }

    #[test]
    fn test_caret_is_remapped() {
        let mut window = window_with("one two");
        find_replace(&mut window, "one", "1", ReplaceScope::Document).unwrap();

        let caret = window.selection().unwrap().start;
        assert_eq!(window.content(), "1 two");
        assert_eq!(window.container.text_offset_of(caret), 5);
    }

    #[test]
    fn test_caret_stays_after_trailing_line_break() {
        let mut window = window_with("a<br>");
        assert_eq!(window.selection().unwrap().start, DomPoint::new(window.container.root(), 2));

        find_replace(&mut window, "a", "z", ReplaceScope::Document).unwrap();
        crate::editing::insert_text(&mut window, "q").unwrap();
        assert_eq!(window.content(), "z<br>q");
    }

    #[test]
    fn test_caret_after_emoji_keeps_its_side() {
        let mut window = window_with("ab<img src=\"e.png\">cd");
        let cd = window.container.child(window.container.root(), 2).unwrap();
        window.set_selection(Some(LiveRange::caret(DomPoint::new(cd, 0))));

        find_replace(&mut window, "b", "BB", ReplaceScope::Document).unwrap();
        crate::editing::insert_text(&mut window, "x").unwrap();
        assert_eq!(window.content(), "aBB<img src=\"e.png\">xcd");
    }

    #[test]
    fn test_replacement_is_text_not_markup() {
        let mut window = window_with("x");
        find_replace(&mut window, "x", "<b>", ReplaceScope::Document).unwrap();
        assert_eq!(window.content(), "&lt;b&gt;");
    }

    #[test]
    fn test_single_undo_step() {
        let mut window = window_with("a a a");
        find_replace(&mut window, "a", "b", ReplaceScope::Document).unwrap();
        assert!(crate::editing::undo(&mut window));
        assert_eq!(window.content(), "a a a");
    }

    #[test]
    fn test_remap() {
        let edits = vec![
            Edit { start: 2, end: 5, replacement: "X".to_string() },
            Edit { start: 8, end: 9, replacement: "YYY".to_string() },
        ];
        assert_eq!(remap(1, &edits), 1);
        assert_eq!(remap(3, &edits), 3);
        assert_eq!(remap(6, &edits), 4);
        assert_eq!(remap(10, &edits), 10);
    }
}
