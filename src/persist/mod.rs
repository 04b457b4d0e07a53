//! Snapshot persistence: codec, stores and debounced save scheduling

pub mod codec;
pub mod scheduler;
pub mod store;

pub use codec::{decode, encode};
pub use scheduler::SaveScheduler;
pub use store::{FileStore, MemoryStore, SnapshotStore};
