//! Grid snapshot codec.
//!
//! A snapshot is the grid's raw cell bytes in storage order, base64 encoded
//! with the standard alphabet. The grid's dimensions are not stored: a
//! snapshot only makes sense for a grid of the size that produced it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::core::types::Result;
use crate::voxel::grid::VoxelGrid;

/// Encode the grid's cell bytes as printable text.
pub fn encode(grid: &VoxelGrid) -> String {
    STANDARD.encode(grid.as_bytes())
}

/// Decode a snapshot into `grid`.
///
/// Fails with a corrupted-snapshot error if the text is not valid base64, if
/// the decoded length differs from the grid's cell count, or if a byte is
/// not a known block id. The grid is untouched on failure.
pub fn decode(text: &str, grid: &mut VoxelGrid) -> Result<()> {
    let bytes = STANDARD.decode(text.trim())?;
    grid.load_bytes(&bytes)
}
