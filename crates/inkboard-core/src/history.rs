//! Snapshot-based undo/redo.
//!
//! Every entry is a full copy of the element sequence at one committed
//! instant. `index` always points at a valid entry, and right after a
//! commit `entries[index]` equals the live elements.

use crate::shapes::Element;

/// Ordered element-set snapshots plus a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Vec<Element>>,
    index: usize,
    /// Maximum number of entries kept, if any.
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// A history holding a single empty snapshot.
    pub fn new() -> Self {
        Self {
            entries: vec![Vec::new()],
            index: 0,
            limit: None,
        }
    }

    /// A history that keeps at most `limit` entries (minimum 1).
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.max(1)),
            ..Self::new()
        }
    }

    /// Record `elements` as the newest entry.
    ///
    /// Entries after the cursor are discarded first, so a commit made after
    /// an undo drops the undone branch.
    pub fn commit(&mut self, elements: &[Element]) {
        self.entries.truncate(self.index + 1);
        self.entries.push(elements.to_vec());
        self.index = self.entries.len() - 1;

        if let Some(limit) = self.limit {
            let excess = self.entries.len().saturating_sub(limit);
            if excess > 0 {
                self.entries.drain(..excess);
                self.index -= excess;
            }
        }
        log::debug!(
            "history commit: {} elements, entry {}/{}",
            elements.len(),
            self.index + 1,
            self.entries.len()
        );
    }

    /// Step the cursor back. Returns the snapshot to restore, or `None`
    /// when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&[Element]> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Step the cursor forward. Returns the snapshot to restore, or `None`
    /// when already at the newest entry.
    pub fn redo(&mut self) -> Option<&[Element]> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &[Element] {
        &self.entries[self.index]
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the initial empty snapshot is never dropped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Vec<Element>] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ElementStyle, Rectangle};
    use kurbo::Point;

    fn rect(x: f64) -> Element {
        Element::Rectangle(Rectangle::new(
            Point::new(x, 0.0),
            Point::new(x + 10.0, 10.0),
            ElementStyle::default(),
        ))
    }

    #[test]
    fn test_starts_with_one_empty_entry() {
        let history = History::new();
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert!(history.current().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_at_bounds_are_noops() {
        let mut history = History::new();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_undo_then_redo_restores_snapshot() {
        let mut history = History::new();
        let a = vec![rect(0.0)];
        let b = vec![rect(0.0), rect(20.0)];
        history.commit(&a);
        history.commit(&b);

        assert_eq!(history.undo().unwrap(), a.as_slice());
        assert_eq!(history.redo().unwrap(), b.as_slice());
        assert_eq!(history.current(), b.as_slice());
    }

    #[test]
    fn test_commit_after_undo_truncates() {
        let mut history = History::new();
        let a = vec![rect(0.0)];
        let b = vec![rect(0.0), rect(20.0)];
        let c = vec![rect(0.0), rect(40.0)];
        history.commit(&a);
        history.commit(&b);
        history.undo();
        history.commit(&c);

        assert!(history.redo().is_none());
        assert_eq!(history.len(), 3);
        assert!(!history.entries().contains(&b));
        assert_eq!(history.current(), c.as_slice());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(Some(3));
        for i in 0..5 {
            history.commit(&vec![rect(i as f64); i + 1]);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current().len(), 5);

        history.undo();
        history.undo();
        assert!(!history.can_undo());
        assert_eq!(history.current().len(), 3);
    }
}
