//! Linear undo/redo over tree snapshots.
//!
//! Every snapshot is an owned deep copy, so nothing recorded here can be
//! changed by later edits. Committing after an undo discards the redo tail.

use crate::model::BookmarkTree;

/// Snapshot history with a cursor on the current state.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<BookmarkTree>,
    /// Index of the current snapshot; `None` while empty
    cursor: Option<usize>,
    /// Maximum snapshots kept (0 = unlimited)
    limit: usize,
}

impl History {
    /// Create an unlimited, empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history that keeps at most `limit` snapshots (0 = unlimited).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record a new current state.
    pub fn commit(&mut self, tree: &BookmarkTree) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(tree.clone());

        if self.limit > 0 && self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// Step back; returns a copy of the now-current snapshot.
    pub fn undo(&mut self) -> Option<BookmarkTree> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                Some(self.snapshots[c - 1].clone())
            },
            _ => None,
        }
    }

    /// Step forward; returns a copy of the now-current snapshot.
    pub fn redo(&mut self) -> Option<BookmarkTree> {
        match self.cursor {
            Some(c) if c + 1 < self.snapshots.len() => {
                self.cursor = Some(c + 1);
                Some(self.snapshots[c + 1].clone())
            },
            _ => None,
        }
    }

    /// Drop everything and start over from `tree`.
    pub fn reset(&mut self, tree: &BookmarkTree) {
        self.snapshots.clear();
        self.cursor = None;
        self.commit(tree);
    }

    /// The current snapshot.
    pub fn current(&self) -> Option<&BookmarkTree> {
        self.cursor.map(|c| &self.snapshots[c])
    }

    /// Cursor position, `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Whether [`undo`](Self::undo) would do anything.
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether [`redo`](Self::redo) would do anything.
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.snapshots.len())
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookmarkNode;

    fn tree(title: &str) -> BookmarkTree {
        BookmarkTree::from_roots(vec![BookmarkNode::new(title, title, 1)])
    }

    fn title(t: &BookmarkTree) -> &str {
        &t.roots[0].title
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_after_undo_discards_redo_tail() {
        let mut history = History::new();
        history.commit(&tree("A"));
        history.commit(&tree("B"));
        history.commit(&tree("C"));

        assert_eq!(title(&history.undo().unwrap()), "B");
        assert_eq!(title(&history.undo().unwrap()), "A");
        assert_eq!(title(&history.redo().unwrap()), "B");

        history.commit(&tree("D"));
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(title(history.current().unwrap()), "D");
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_undo_stops_at_first_snapshot() {
        let mut history = History::new();
        history.commit(&tree("A"));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_snapshots_are_independent_copies() {
        let mut history = History::new();
        let mut working = tree("A");
        history.commit(&working);

        working.roots[0].title = "mutated".to_string();
        history.commit(&working);

        let mut restored = history.undo().unwrap();
        assert_eq!(title(&restored), "A");
        restored.roots[0].title = "mutated again".to_string();
        assert_eq!(title(history.current().unwrap()), "A");
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut history = History::new();
        history.commit(&tree("A"));
        history.commit(&tree("B"));
        history.reset(&tree("Imported"));
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(title(history.current().unwrap()), "Imported");
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::with_limit(2);
        history.commit(&tree("A"));
        history.commit(&tree("B"));
        history.commit(&tree("C"));
        assert_eq!(history.len(), 2);
        assert_eq!(title(&history.undo().unwrap()), "B");
        assert!(history.undo().is_none());
    }
}
