//! Cell coordinates and the cell <-> world transform.
//!
//! [`CoordinateMapper`] is the only place grid indices and world positions
//! are related. Rendering and picking both go through it.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::config::GridDimensions;
use crate::math::Aabb;

/// Integer coordinate of one grid cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    /// Create a new cell coordinate
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Neighbor reached by stepping along `delta`
    pub fn offset(self, delta: IVec3) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.z + delta.z)
    }

    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    pub fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<IVec3> for Cell {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[i32; 3]> for Cell {
    fn from(v: [i32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// How a world position is rounded to a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapMode {
    /// Floor every axis. For points known to lie inside a cell.
    Snapped,
    /// Floor x/z, round y to the nearest layer boundary. For ground-plane hits
    /// that land exactly on a cell boundary.
    Ground,
}

/// Affine map between cell indices and world space.
///
/// The grid footprint is centered on the world origin in x/z and rests on
/// `y = 0`; cell `(x, y, z)` occupies the box starting at
/// `origin + (x, y, z) * block_size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    dims: GridDimensions,
    block_size: f32,
    origin: Vec3,
}

impl CoordinateMapper {
    pub fn new(dims: GridDimensions, block_size: f32) -> Self {
        let origin = Vec3::new(
            -(dims.width as f32) * block_size * 0.5,
            0.0,
            -(dims.depth as f32) * block_size * 0.5,
        );
        Self { dims, block_size, origin }
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    /// World-space minimum corner of cell (0, 0, 0)
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Height of the implicit ground plane
    pub fn ground_height(&self) -> f32 {
        self.origin.y
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.z >= 0
            && (cell.x as u32) < self.dims.width
            && (cell.y as u32) < self.dims.height
            && (cell.z as u32) < self.dims.depth
    }

    /// Center of a cell in world space
    pub fn cell_to_world(&self, cell: Cell) -> Vec3 {
        self.origin + (cell.as_ivec3().as_vec3() + Vec3::splat(0.5)) * self.block_size
    }

    /// World-space box occupied by a cell
    pub fn cell_bounds(&self, cell: Cell) -> Aabb {
        Aabb::from_center_half_extent(
            self.cell_to_world(cell),
            Vec3::splat(self.block_size * 0.5),
        )
    }

    /// Resolve a world position to a cell; None if it falls outside the grid.
    pub fn world_to_cell(&self, position: Vec3, mode: SnapMode) -> Option<Cell> {
        let local = (position - self.origin) / self.block_size;
        let y = match mode {
            SnapMode::Snapped => local.y.floor(),
            SnapMode::Ground => (local.y + 0.5).floor(),
        };
        let cell = Cell::new(local.x.floor() as i32, y as i32, local.z.floor() as i32);
        self.contains(cell).then_some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(GridDimensions::new(16, 12, 16), 1.0)
    }

    #[test]
    fn test_cell_to_world_centered() {
        let m = mapper();
        assert_eq!(m.cell_to_world(Cell::new(0, 0, 0)), Vec3::new(-7.5, 0.5, -7.5));
        assert_eq!(m.cell_to_world(Cell::new(8, 0, 8)), Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(m.cell_to_world(Cell::new(15, 11, 15)), Vec3::new(7.5, 11.5, 7.5));
    }

    #[test]
    fn test_roundtrip_every_cell() {
        let m = mapper();
        for y in 0..12 {
            for z in 0..16 {
                for x in 0..16 {
                    let cell = Cell::new(x, y, z);
                    let world = m.cell_to_world(cell);
                    assert_eq!(m.world_to_cell(world, SnapMode::Snapped), Some(cell));
                }
            }
        }
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let m = mapper();
        assert!(m.world_to_cell(Vec3::new(-8.5, 0.5, 0.0), SnapMode::Snapped).is_none());
        assert!(m.world_to_cell(Vec3::new(0.0, -0.5, 0.0), SnapMode::Snapped).is_none());
        assert!(m.world_to_cell(Vec3::new(0.0, 12.5, 0.0), SnapMode::Snapped).is_none());
        assert!(!m.contains(Cell::new(16, 0, 0)));
    }

    #[test]
    fn test_ground_mode_absorbs_boundary_error() {
        let m = mapper();
        // A ground-plane hit that lands a hair below y = 0
        let p = Vec3::new(0.25, -1e-5, 0.25);
        assert!(m.world_to_cell(p, SnapMode::Snapped).is_none());
        assert_eq!(m.world_to_cell(p, SnapMode::Ground), Some(Cell::new(8, 0, 8)));
    }

    #[test]
    fn test_scaled_blocks() {
        let m = CoordinateMapper::new(GridDimensions::new(4, 4, 4), 2.0);
        assert_eq!(m.origin(), Vec3::new(-4.0, 0.0, -4.0));
        assert_eq!(m.cell_to_world(Cell::new(1, 1, 1)), Vec3::new(-1.0, 3.0, -1.0));
        let bounds = m.cell_bounds(Cell::new(1, 1, 1));
        assert_eq!(bounds.min, Vec3::new(-2.0, 2.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_cell_offset() {
        assert_eq!(Cell::new(8, 0, 8).offset(IVec3::Y), Cell::new(8, 1, 8));
        assert_eq!(Cell::from([1, 2, 3]).to_array(), [1, 2, 3]);
    }
}
