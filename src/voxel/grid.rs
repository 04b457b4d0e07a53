//! Dense voxel grid.
//!
//! One byte per cell, laid out with y outermost, then z, then x:
//! `index = y * width * depth + z * width + x`. Traversal follows the same
//! order, and render-instance indices are derived from it, so the order is
//! part of the contract.
//!
//! Reads outside the grid return [`BlockType::Empty`] and writes outside the
//! grid are ignored, so neighbor lookups near the boundary need no checks.

use crate::core::config::GridDimensions;
use crate::core::error::Error;
use crate::core::types::Result;
use super::block::BlockType;
use super::coords::Cell;

/// Fixed-size block grid
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    dims: GridDimensions,
    cells: Vec<u8>,
}

impl VoxelGrid {
    /// Create an all-empty grid
    pub fn new(dims: GridDimensions) -> Self {
        Self {
            dims,
            cells: vec![BlockType::Empty.id(); dims.cell_count()],
        }
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    pub fn width(&self) -> u32 {
        self.dims.width
    }

    pub fn height(&self) -> u32 {
        self.dims.height
    }

    pub fn depth(&self) -> u32 {
        self.dims.depth
    }

    /// Number of cells (and bytes of raw storage)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && y >= 0 && z >= 0
            && (x as u32) < self.dims.width
            && (y as u32) < self.dims.height
            && (z as u32) < self.dims.depth
    }

    /// Linear index of an in-bounds coordinate
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.contains(x, y, z) {
            return None;
        }
        let (w, d) = (self.dims.width as usize, self.dims.depth as usize);
        Some(y as usize * w * d + z as usize * w + x as usize)
    }

    /// Inverse of [`index`](Self::index)
    pub fn cell_at_index(&self, index: usize) -> Option<Cell> {
        if index >= self.cells.len() {
            return None;
        }
        let (w, d) = (self.dims.width as usize, self.dims.depth as usize);
        let y = index / (w * d);
        let rem = index % (w * d);
        Some(Cell::new((rem % w) as i32, y as i32, (rem / w) as i32))
    }

    /// Block at a coordinate; Empty outside the grid
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.index(x, y, z)
            .and_then(|i| BlockType::from_id(self.cells[i]))
            .unwrap_or(BlockType::Empty)
    }

    /// Overwrite a cell; ignored outside the grid
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if let Some(i) = self.index(x, y, z) {
            self.cells[i] = block.id();
        }
    }

    pub fn get_cell(&self, cell: Cell) -> BlockType {
        self.get(cell.x, cell.y, cell.z)
    }

    pub fn set_cell(&mut self, cell: Cell, block: BlockType) {
        self.set(cell.x, cell.y, cell.z, block)
    }

    pub fn contains_cell(&self, cell: Cell) -> bool {
        self.contains(cell.x, cell.y, cell.z)
    }

    /// Reset every cell to one value
    pub fn fill(&mut self, block: BlockType) {
        self.cells.fill(block.id());
    }

    /// Visit every cell once in storage order (y, then z, then x).
    ///
    /// The iterator is lazy and borrows the grid; call again to restart.
    pub fn iter(&self) -> impl Iterator<Item = (BlockType, Cell)> + '_ {
        let (w, d) = (self.dims.width as usize, self.dims.depth as usize);
        self.cells.iter().enumerate().map(move |(i, &id)| {
            let y = i / (w * d);
            let rem = i % (w * d);
            let cell = Cell::new((rem % w) as i32, y as i32, (rem / w) as i32);
            (BlockType::from_id(id).unwrap_or(BlockType::Empty), cell)
        })
    }

    /// Callback form of [`iter`](Self::iter), yielding `(value, x, y, z)`
    pub fn for_each(&self, mut visit: impl FnMut(BlockType, i32, i32, i32)) {
        for (block, cell) in self.iter() {
            visit(block, cell.x, cell.y, cell.z);
        }
    }

    /// Number of non-empty cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != BlockType::Empty.id()).count()
    }

    /// Raw storage, one block id per cell
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Replace the whole grid from raw bytes.
    ///
    /// The bytes are fully validated first; on error the grid is untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.cells.len() {
            return Err(Error::CorruptedSnapshot {
                expected: self.cells.len(),
                actual: bytes.len(),
            });
        }
        if let Some((index, &value)) = bytes
            .iter()
            .enumerate()
            .find(|&(_, &b)| BlockType::from_id(b).is_none())
        {
            return Err(Error::UnknownBlock { index, value });
        }
        self.cells.copy_from_slice(bytes);
        Ok(())
    }
}
