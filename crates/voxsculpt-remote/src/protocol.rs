//! Remote protocol - JSON command/response definitions
//!
//! One JSON object per line in each direction. Block types travel by their
//! lowercase name ("grass", "stone", ...); cells as `[x, y, z]`.

use serde::{Deserialize, Serialize};

/// Commands sent by a remote client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum Command {
    /// Health check
    Ping,
    /// Place a block into an empty cell
    Place { x: i32, y: i32, z: i32, block: String },
    /// Remove the block at a cell
    Remove { x: i32, y: i32, z: i32 },
    Undo,
    Redo,
    /// Regenerate default terrain and clear history
    Reset,
    /// Read one cell
    GetBlock { x: i32, y: i32, z: i32 },
    /// Pick candidates at normalized device coordinates (-1..1, +y up)
    Pick { x: f32, y: f32 },
    PointerDown { id: u64, x: f32, y: f32 },
    PointerMove { id: u64, x: f32, y: f32 },
    PointerUp { id: u64, x: f32, y: f32 },
    PointerCancel { id: u64 },
    /// Block type used by tap placement
    SelectBlock { block: String },
    /// Grid, history and save counters
    GetStats,
    /// Write the snapshot now
    Flush,
    /// Return the encoded grid
    ExportSnapshot,
    /// Replace the grid from an encoded snapshot
    ImportSnapshot { data: String },
}

/// Responses from the command server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Response {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    None,
    Pong { message: String },
    /// Outcome of a grid command; false means "nothing to do"
    Edit { applied: bool },
    Block { x: i32, y: i32, z: i32, block: String },
    /// Edit committed by a pointer event ("place"/"remove"), if any
    Gesture { committed: Option<String>, cell: Option<[i32; 3]> },
    Stats(StatsInfo),
    Snapshot { data: String },
    Selected { block: String },
    Pick { place: Option<[i32; 3]>, remove: Option<[i32; 3]> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsInfo {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub occupied: usize,
    pub visible_instances: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub rebuilds: u64,
    pub selected_block: String,
    pub save_status: String,
}

impl Response {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(ResponseData::Pong {
            message: "pong".into(),
        })
    }

    pub fn none() -> Self {
        Self::ok(ResponseData::None)
    }

    pub fn edit(applied: bool) -> Self {
        Self::ok(ResponseData::Edit { applied })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }
}
