//! Voxsculpt - interactive block-world sculpting core
//!
//! Voxel storage, screen-to-grid picking, instanced-render synchronization,
//! undo/redo and snapshot persistence, wired together by [`editor::Editor`].

pub mod core;
pub mod math;
pub mod voxel;
pub mod interaction;
pub mod persist;
pub mod editor;
pub mod remote;

pub use editor::{Editor, LoadOutcome, SaveStatus};
