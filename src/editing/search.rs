//! Case-insensitive search with result navigation

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::content::{Container, LiveRange};
use crate::errors::{EditorError, EditorResult};
use crate::models::EditableWindow;

/// A search hit, in character offsets of the text content
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub len: usize,
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchState {
    pub pattern: String,
    pub matches: Vec<SearchMatch>,
    /// Index of the selected match
    pub current: Option<usize>,
}

impl SearchState {
    pub fn new(pattern: impl Into<String>, matches: Vec<SearchMatch>) -> Self {
        let current = if matches.is_empty() { None } else { Some(0) };
        Self {
            pattern: pattern.into(),
            matches,
            current,
        }
    }

    pub fn current_match(&self) -> Option<&SearchMatch> {
        self.current.and_then(|i| self.matches.get(i))
    }

    /// Advance to the next match, wrapping to the first
    pub fn next(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) => (i + 1) % self.matches.len(),
            None => 0,
        };
        self.current = Some(next);
        self.current
    }

    /// Step back to the previous match, wrapping to the last
    pub fn previous(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let len = self.matches.len();
        let previous = match self.current {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.current = Some(previous);
        self.current
    }
}

/// Find all case-insensitive matches of `pattern` in the text content
pub fn find_matches(container: &Container, pattern: &str) -> EditorResult<Vec<SearchMatch>> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| EditorError::InvalidPattern(e.to_string()))?;

    let text = container.text_content(container.root());
    Ok(regex
        .find_iter(&text)
        .filter(|m| !m.as_str().is_empty())
        .map(|m| SearchMatch {
            start: text[..m.start()].chars().count(),
            len: m.as_str().chars().count(),
            text: m.as_str().to_string(),
        })
        .collect())
}

fn select_match(window: &mut EditableWindow) {
    let Some(found) = window.search.as_ref().and_then(|s| s.current_match()).cloned() else {
        return;
    };
    let container = &window.container;
    let start = container.point_at_text_offset(found.start);
    let end = container.point_at_text_offset(found.start + found.len);
    window.selection = Some(LiveRange::new(container, start, end));
}

/// Run a search, select the first match and return the match count.
/// Does not touch content or the undo log.
pub fn search(window: &mut EditableWindow, pattern: &str) -> EditorResult<usize> {
    let matches = find_matches(&window.container, pattern)?;
    let count = matches.len();
    window.search = Some(SearchState::new(pattern, matches));
    select_match(window);
    Ok(count)
}

pub fn search_next(window: &mut EditableWindow) -> Option<usize> {
    let index = window.search.as_mut()?.next()?;
    select_match(window);
    Some(index)
}

pub fn search_previous(window: &mut EditableWindow) -> Option<usize> {
    let index = window.search.as_mut()?.previous()?;
    select_match(window);
    Some(index)
}
