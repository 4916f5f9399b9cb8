//! Bounded undo/redo history of cell edits.

use std::collections::VecDeque;

use crate::types::CellValue;

/// Default number of actions kept.
pub const DEFAULT_UNDO_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    Cell,
    Paste,
}

/// One cell's before/after values.
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub row: u32,
    pub col: u32,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoAction {
    pub kind: UndoKind,
    pub changes: Vec<CellChange>,
}

impl UndoAction {
    /// A single-cell edit.
    pub fn cell(row: u32, col: u32, old_value: CellValue, new_value: CellValue) -> Self {
        Self {
            kind: UndoKind::Cell,
            changes: vec![CellChange {
                row,
                col,
                old_value,
                new_value,
            }],
        }
    }
}

/// Undo and redo stacks. Pushing a new action drops the oldest one past
/// capacity and clears the redo stack.
#[derive(Debug, Clone)]
pub struct UndoManager {
    undo: VecDeque<UndoAction>,
    redo: Vec<UndoAction>,
    capacity: usize,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

impl UndoManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, action: UndoAction) {
        self.undo.push_back(action);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Pop the most recent action and move it to the redo stack.
    pub fn undo(&mut self) -> Option<&UndoAction> {
        let action = self.undo.pop_back()?;
        self.redo.push(action);
        self.redo.last()
    }

    /// Pop the most recently undone action and move it back.
    pub fn redo(&mut self) -> Option<&UndoAction> {
        let action = self.redo.pop()?;
        self.undo.push_back(action);
        self.undo.back()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
