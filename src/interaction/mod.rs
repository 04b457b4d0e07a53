//! Pointer interaction: picking and gesture recognition

pub mod gesture;
pub mod picker;

pub use gesture::{GestureCommit, GestureController, GestureState, PointerEvent, PointerId};
pub use picker::{PickHit, PickResult, PickTarget, Picker};
