use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Content snapshot taken before a logical edit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Serialized container content
    pub content: String,
}

impl Snapshot {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }
}

/// Per-window stack of content snapshots
///
/// Every logical edit pushes the content as it was before the edit; undo
/// pops the most recent one. There is no redo. The log is unbounded unless
/// a limit is set, in which case the oldest snapshots are dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UndoLog {
    /// Snapshots, oldest first
    pub snapshots: VecDeque<Snapshot>,
    /// Maximum number of snapshots to keep (`None` = unbounded)
    max_size: Option<usize>,
}

impl UndoLog {
    /// Create an unbounded undo log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an undo log that keeps at most `max_size` snapshots
    pub fn with_limit(max_size: Option<usize>) -> Self {
        Self {
            snapshots: VecDeque::new(),
            max_size,
        }
    }

    /// Record the content before an edit
    pub fn push(&mut self, content: impl Into<String>) {
        self.snapshots.push_back(Snapshot::new(content));

        // Enforce max size
        if let Some(max) = self.max_size {
            while self.snapshots.len() > max {
                self.snapshots.pop_front();
            }
        }
    }

    /// Take the most recent snapshot
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }

    /// Get the number of available undo steps
    pub fn undo_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Clear all undo history
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop_in_reverse_order() {
        let mut log = UndoLog::new();
        log.push("");
        log.push("a");
        log.push("ab");

        assert_eq!(log.undo_count(), 3);
        assert_eq!(log.pop().unwrap().content, "ab");
        assert_eq!(log.pop().unwrap().content, "a");
        assert_eq!(log.pop().unwrap().content, "");
        assert!(log.pop().is_none());
    }

    #[test]
    fn test_empty_log() {
        let mut log = UndoLog::new();
        assert!(!log.can_undo());
        assert!(log.pop().is_none());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut log = UndoLog::new();
        for i in 0..500 {
            log.push(i.to_string());
        }
        assert_eq!(log.undo_count(), 500);
        assert_eq!(log.max_size(), None);
    }

    #[test]
    fn test_max_size_enforcement() {
        let mut log = UndoLog::with_limit(Some(3));
        for i in 0..5 {
            log.push(i.to_string());
        }

        assert_eq!(log.undo_count(), 3);
        // oldest two were dropped
        assert_eq!(log.snapshots.front().unwrap().content, "2");
        assert_eq!(log.pop().unwrap().content, "4");
    }

    #[test]
    fn test_clear() {
        let mut log = UndoLog::new();
        log.push("x");
        log.clear();
        assert!(!log.can_undo());
    }
}
