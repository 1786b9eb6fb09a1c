use crate::element::Element;

/// Maximum number of undo steps retained; the oldest entry is dropped
/// beyond this.
pub const MAX_HISTORY: usize = 50;

/// Undo/redo history over full element-collection snapshots.
///
/// Each entry is a structurally independent copy of the whole element
/// list, not a diff. Committing a mutating gesture records the
/// pre-gesture snapshot and clears the redo stack.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Vec<Element>>,
    redo_stack: Vec<Vec<Element>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-mutation snapshot after a gesture committed.
    pub fn record(&mut self, snapshot: Vec<Element>) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Pops the most recent undo entry, storing `current` for redo.
    /// Returns the snapshot to restore, or `None` when there is nothing
    /// to undo.
    pub fn undo(&mut self, current: Vec<Element>) -> Option<Vec<Element>> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Mirror of [`History::undo`].
    pub fn redo(&mut self, current: Vec<Element>) -> Option<Vec<Element>> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
