//! Linear undo/redo history of edit actions.

use std::collections::VecDeque;

use crate::voxel::grid::VoxelGrid;
use super::action::EditAction;

/// Undo and redo stacks of applied edits.
///
/// Recording a new edit discards everything on the redo stack. Undo and redo
/// apply actions straight to the grid and never re-enter `record`.
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    /// Oldest at the front so a capacity limit can drop from there
    undo: VecDeque<EditAction>,
    redo: Vec<EditAction>,
    /// Maximum undo depth (None = unbounded)
    capacity: Option<usize>,
}

impl HistoryLog {
    /// Create an unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that forgets its oldest entries beyond `capacity`
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Push an already-applied action; clears redo.
    pub fn record(&mut self, action: EditAction) {
        self.redo.clear();
        if self.capacity == Some(0) {
            return;
        }
        self.undo.push_back(action);
        if let Some(cap) = self.capacity {
            while self.undo.len() > cap {
                self.undo.pop_front();
            }
        }
    }

    /// Revert the most recent action. Returns the reverted action, if any.
    pub fn undo(&mut self, grid: &mut VoxelGrid) -> Option<EditAction> {
        let action = self.undo.pop_back()?;
        action.inverse().apply(grid);
        self.redo.push(action);
        log::debug!("Undo {:?} {} at {}", action.kind, action.block, action.cell);
        Some(action)
    }

    /// Re-apply the most recently undone action. Returns it, if any.
    pub fn redo(&mut self, grid: &mut VoxelGrid) -> Option<EditAction> {
        let action = self.redo.pop()?;
        action.apply(grid);
        self.undo.push_back(action);
        log::debug!("Redo {:?} {} at {}", action.kind, action.block, action.cell);
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Most recent undoable action
    pub fn last(&self) -> Option<&EditAction> {
        self.undo.back()
    }

    /// Forget both stacks
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
