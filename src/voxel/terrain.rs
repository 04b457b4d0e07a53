//! Default terrain: the one-time seed fill used for a fresh world.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::block::BlockType;
use super::grid::VoxelGrid;

/// Tallest column produced by the default fill
pub const MAX_TERRAIN_HEIGHT: u32 = 3;

/// Reset the grid to rolling 1-3 block terrain.
///
/// Columns are stone with a grass cap; the lowest columns are a single
/// layer of sand. Deterministic for a given seed and grid size.
pub fn fill_default_terrain(grid: &mut VoxelGrid, seed: u32) {
    grid.fill(BlockType::Empty);

    let height_noise = Fbm::<Perlin>::new(seed)
        .set_octaves(3)
        .set_persistence(0.5)
        .set_lacunarity(2.0)
        .set_frequency(0.12);

    let max_height = MAX_TERRAIN_HEIGHT.min(grid.height()) as i32;

    for z in 0..grid.depth() as i32 {
        for x in 0..grid.width() as i32 {
            let n = height_noise.get([x as f64, z as f64]);
            let column = column_height(n, max_height);
            for y in 0..column {
                let block = if column == 1 {
                    BlockType::Sand
                } else if y == column - 1 {
                    BlockType::Grass
                } else {
                    BlockType::Stone
                };
                grid.set(x, y, z, block);
            }
        }
    }

    log::debug!(
        "Default terrain filled (seed {}): {} blocks",
        seed,
        grid.occupied_count()
    );
}

/// Map a noise sample in roughly [-1, 1] to a column height in 1..=max_height
fn column_height(n: f64, max_height: i32) -> i32 {
    let t = ((n + 1.0) * 0.5).clamp(0.0, 1.0);
    (1 + (t * max_height as f64) as i32).min(max_height).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GridDimensions;

    #[test]
    fn test_every_column_has_ground() {
        let mut grid = VoxelGrid::new(GridDimensions::new(16, 12, 16));
        fill_default_terrain(&mut grid, 12345);
        for z in 0..16 {
            for x in 0..16 {
                assert!(!grid.get(x, 0, z).is_empty(), "column ({}, {}) is bare", x, z);
                assert!(grid.get(x, MAX_TERRAIN_HEIGHT as i32, z).is_empty());
            }
        }
    }

    #[test]
    fn test_deterministic_per_seed() {
        let dims = GridDimensions::new(16, 12, 16);
        let mut a = VoxelGrid::new(dims);
        let mut b = VoxelGrid::new(dims);
        fill_default_terrain(&mut a, 7);
        fill_default_terrain(&mut b, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_clears_previous_contents() {
        let mut grid = VoxelGrid::new(GridDimensions::new(8, 8, 8));
        grid.set(4, 7, 4, BlockType::Wood);
        fill_default_terrain(&mut grid, 1);
        assert!(grid.get(4, 7, 4).is_empty());
    }

    #[test]
    fn test_short_grid_is_clamped() {
        let mut grid = VoxelGrid::new(GridDimensions::new(4, 1, 4));
        fill_default_terrain(&mut grid, 3);
        assert_eq!(grid.occupied_count(), 16);
        assert!(grid.iter().all(|(b, _)| b == BlockType::Sand));
    }

    #[test]
    fn test_column_height_range() {
        assert_eq!(column_height(-5.0, 3), 1);
        assert_eq!(column_height(5.0, 3), 3);
        assert_eq!(column_height(0.0, 3), 2);
    }
}
