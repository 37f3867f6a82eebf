//! Access to the game and tile content database.

/// Filesystem-backed definition discovery and loading.
pub mod loader;

pub use loader::{DefinitionSource, FsDefinitionSource};
