//! Voxel edit actions and the undo/redo history.
//!
//! Every user edit becomes one [`EditAction`]; the history stores actions,
//! not grid snapshots, and derives inverses structurally.

pub mod action;
pub mod history;

pub use action::{EditAction, EditKind};
pub use history::HistoryLog;
