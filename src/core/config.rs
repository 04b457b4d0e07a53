//! Editor configuration.
//!
//! Every field has a default, so a config file only needs to name the values
//! it overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Largest extent allowed along any grid axis.
pub const MAX_GRID_EXTENT: u32 = 255;

/// Fixed grid extents, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self { width, height, depth }
    }

    /// Total number of cells (and snapshot bytes).
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(16, 12, 16)
    }
}

/// Configuration for an editing session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid extents, fixed for the session
    pub grid: GridDimensions,
    /// Edge length of one block in world units
    pub block_size: f32,
    /// Quiet period before a requested save is written
    pub save_debounce_ms: u64,
    /// Hold time that turns a press into a removal
    pub long_press_ms: u64,
    /// Key under which the encoded grid is stored
    pub storage_key: String,
    /// Seed for the default terrain fill
    pub terrain_seed: u32,
    /// Pick against the ground plane when no block is under the pointer
    pub ground_fallback: bool,
    /// Inward nudge applied to hit points, in block-size units
    pub pick_nudge: f32,
    /// Maximum undo depth (None = unbounded)
    pub history_capacity: Option<usize>,
    /// TCP port of the remote command server
    pub remote_port: u16,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid: GridDimensions::default(),
            block_size: 1.0,
            save_debounce_ms: 250,
            long_press_ms: 450,
            storage_key: "voxsculpt.grid".to_string(),
            terrain_seed: 12345,
            ground_fallback: true,
            pick_nudge: 0.01,
            history_capacity: None,
            remote_port: voxsculpt_remote::DEFAULT_PORT,
        }
    }
}

impl EditorConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: EditorConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the core relies on.
    pub fn validate(&self) -> Result<()> {
        let GridDimensions { width, height, depth } = self.grid;
        if width == 0 || height == 0 || depth == 0 {
            return Err(Error::Config(format!(
                "grid dimensions must be non-zero, got {}x{}x{}",
                width, height, depth
            )));
        }
        if width > MAX_GRID_EXTENT || height > MAX_GRID_EXTENT || depth > MAX_GRID_EXTENT {
            return Err(Error::Config(format!(
                "grid extent exceeds {} cells: {}x{}x{}",
                MAX_GRID_EXTENT, width, height, depth
            )));
        }
        if !(self.block_size > 0.0) || !self.block_size.is_finite() {
            return Err(Error::Config(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }
        if !(self.pick_nudge > 0.0 && self.pick_nudge < 0.5) {
            return Err(Error::Config(format!(
                "pick_nudge must be in (0, 0.5), got {}",
                self.pick_nudge
            )));
        }
        if self.storage_key.is_empty() {
            return Err(Error::Config("storage_key must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}
