//! Core editor types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod config;
pub mod camera;

pub use types::*;
pub use error::Error;
pub use config::{EditorConfig, GridDimensions};
pub use camera::Camera;
