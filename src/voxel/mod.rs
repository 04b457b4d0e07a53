//! Voxel data structures and operations

pub mod block;
pub mod grid;
pub mod coords;
pub mod instancing;
pub mod terrain;
pub mod edit;

pub use block::{BlockType, BlockAttributes, BLOCK_ATTRIBUTES};
pub use grid::VoxelGrid;
pub use coords::{Cell, CoordinateMapper, SnapMode};
pub use instancing::{InstanceBatch, InstanceData, InstanceSynchronizer};
pub use edit::{EditAction, EditKind, HistoryLog};
