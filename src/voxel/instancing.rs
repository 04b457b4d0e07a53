//! Render-instance synchronization.
//!
//! Each placeable block type owns one instance batch. After every grid edit
//! the batches are rebuilt from a single grid traversal, so what is drawn is
//! always exactly what is stored.

use bytemuck::{Pod, Zeroable};

use super::block::BlockType;
use super::coords::{Cell, CoordinateMapper};
use super::grid::VoxelGrid;

/// Per-instance data uploaded to the renderer - 24 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// World-space center of the block
    pub position: [f32; 3],
    /// RGB multiplier applied to the block's base color
    pub tint: [f32; 3],
}

/// All instances of one block type
#[derive(Clone, Debug)]
pub struct InstanceBatch {
    block: BlockType,
    /// Backing storage; entries past `visible` are stale and never drawn
    instances: Vec<InstanceData>,
    /// Source cell of each instance, parallel to `instances`
    cells: Vec<Cell>,
    visible: usize,
}

impl InstanceBatch {
    fn new(block: BlockType) -> Self {
        Self {
            block,
            instances: Vec::new(),
            cells: Vec::new(),
            visible: 0,
        }
    }

    pub fn block(&self) -> BlockType {
        self.block
    }

    /// Number of instances the renderer should draw
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Allocated instance slots, including logically truncated ones
    pub fn capacity(&self) -> usize {
        self.instances.len()
    }

    pub fn instances(&self) -> &[InstanceData] {
        &self.instances[..self.visible]
    }

    /// Raw bytes of the visible instances, ready for a buffer upload
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.instances())
    }

    /// Cell that produced the instance at `index`
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        (index < self.visible).then(|| self.cells[index])
    }

    fn write(&mut self, slot: usize, data: InstanceData, cell: Cell) {
        if slot < self.instances.len() {
            self.instances[slot] = data;
            self.cells[slot] = cell;
        } else {
            self.instances.push(data);
            self.cells.push(cell);
        }
    }
}

/// Rebuilds per-type instance batches from grid state
#[derive(Clone, Debug)]
pub struct InstanceSynchronizer {
    batches: Vec<InstanceBatch>,
    rebuilds: u64,
}

impl InstanceSynchronizer {
    pub fn new() -> Self {
        Self {
            batches: BlockType::PLACEABLE.iter().map(|&b| InstanceBatch::new(b)).collect(),
            rebuilds: 0,
        }
    }

    /// Rebuild every batch with one traversal of the grid.
    ///
    /// O(cells). Runs once per discrete edit, not per frame.
    pub fn rebuild(&mut self, grid: &VoxelGrid, mapper: &CoordinateMapper) {
        let mut written = [0usize; BlockType::COUNT];

        for (block, cell) in grid.iter() {
            if block.is_empty() {
                continue;
            }
            let Some(batch) = self.batches.get_mut(block.id() as usize - 1) else {
                continue;
            };
            let data = InstanceData {
                position: mapper.cell_to_world(cell).to_array(),
                tint: cell_tint(cell, block),
            };
            let slot = written[block.id() as usize];
            batch.write(slot, data, cell);
            written[block.id() as usize] = slot + 1;
        }

        for batch in &mut self.batches {
            batch.visible = written[batch.block.id() as usize];
        }
        self.rebuilds += 1;

        log::debug!(
            "Instance rebuild #{}: {} visible instances",
            self.rebuilds,
            self.total_visible()
        );
    }

    /// Batch for a block type; None for `Empty`
    pub fn batch(&self, block: BlockType) -> Option<&InstanceBatch> {
        if block.is_empty() {
            return None;
        }
        self.batches.get(block.id() as usize - 1)
    }

    pub fn batches(&self) -> &[InstanceBatch] {
        &self.batches
    }

    pub fn total_visible(&self) -> usize {
        self.batches.iter().map(|b| b.visible).sum()
    }

    /// Number of rebuilds performed so far
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

impl Default for InstanceSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic per-cell brightness jitter.
///
/// Same cell, same tint, so rebuilds never make blocks flicker.
pub fn cell_tint(cell: Cell, block: BlockType) -> [f32; 3] {
    let jitter = block.attributes().tint_jitter;
    if jitter == 0.0 {
        return [1.0; 3];
    }
    let mut h = (cell.x as u32).wrapping_mul(73_856_093)
        ^ (cell.y as u32).wrapping_mul(19_349_663)
        ^ (cell.z as u32).wrapping_mul(83_492_791);
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    let unit = (h & 0xffff) as f32 / 65535.0;
    let scale = 1.0 + (unit * 2.0 - 1.0) * jitter;
    [scale; 3]
}
