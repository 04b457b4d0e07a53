//! Edit action representation.

use serde::{Deserialize, Serialize};

use crate::voxel::block::BlockType;
use crate::voxel::coords::Cell;
use crate::voxel::grid::VoxelGrid;

/// Type of edit operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// Put a block into an empty cell
    Place,
    /// Clear an occupied cell
    Remove,
}

/// A single-cell edit.
///
/// For `Remove`, `block` is the type that was removed, which is what makes
/// the action invertible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditAction {
    pub kind: EditKind,
    pub block: BlockType,
    pub cell: Cell,
}

impl EditAction {
    pub fn place(block: BlockType, cell: Cell) -> Self {
        Self { kind: EditKind::Place, block, cell }
    }

    pub fn remove(block: BlockType, cell: Cell) -> Self {
        Self { kind: EditKind::Remove, block, cell }
    }

    /// `Place(b, c)` and `Remove(b, c)` are each other's inverse.
    pub fn inverse(&self) -> Self {
        let kind = match self.kind {
            EditKind::Place => EditKind::Remove,
            EditKind::Remove => EditKind::Place,
        };
        Self { kind, ..*self }
    }

    /// Block the cell holds once this action has been applied
    pub fn resulting_block(&self) -> BlockType {
        match self.kind {
            EditKind::Place => self.block,
            EditKind::Remove => BlockType::Empty,
        }
    }

    /// Write the action's result into the grid.
    pub fn apply(&self, grid: &mut VoxelGrid) {
        grid.set_cell(self.cell, self.resulting_block());
    }
}
