//! Bounded undo/redo history over cell edits.

use std::collections::VecDeque;

use tracing::trace;

use crate::types::CellChange;

/// Default number of undo entries retained.
pub const DEFAULT_UNDO_DEPTH: usize = 100;

/// Two-stack command history.
///
/// `undo` hands back the inverse of the recorded change for the caller to
/// apply; `redo` hands back the change as recorded.
#[derive(Debug, Clone)]
pub struct UndoRedoManager {
    undo_stack: VecDeque<CellChange>,
    redo_stack: Vec<CellChange>,
    max_depth: usize,
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_DEPTH)
    }
}

impl UndoRedoManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a change. Clears the redo history and evicts the oldest
    /// entries beyond `max_depth`.
    pub fn push(&mut self, change: CellChange) {
        self.undo_stack.push_back(change);
        self.redo_stack.clear();
        self.trim();
    }

    pub fn undo(&mut self) -> Option<CellChange> {
        let change = self.undo_stack.pop_back()?;
        let inverted = change.inverted();
        trace!(row = change.row_index, field = %change.field, "undo");
        self.redo_stack.push(change);
        Some(inverted)
    }

    pub fn redo(&mut self) -> Option<CellChange> {
        let change = self.redo_stack.pop()?;
        trace!(row = change.row_index, field = %change.field, "redo");
        self.undo_stack.push_back(change.clone());
        self.trim();
        Some(change)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_size(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_size(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// At least 1. Shrinking trims the undo history immediately.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        self.trim();
    }

    fn trim(&mut self) {
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }
}
