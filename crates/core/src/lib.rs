#![warn(clippy::all, missing_docs)]

//! Core compiler for 18xx game definitions.
//!
//! This crate hosts the definition models, the hex and tile encoders,
//! the map and market compilers, and the content discovery used by the
//! command line exporter and any future frontends.

pub mod config;
pub mod data;
pub mod error;
pub mod game;
pub mod hex;
pub mod map;
pub mod market;
pub mod models;
pub mod render;
pub mod resource;
pub mod tables;
pub mod tiles;

pub use config::AppConfig;
pub use error::{CompileError, Result};
pub use game::GameCompiler;
pub use hex::{ColorClassifier, HexEncoder};
pub use map::resolve_hexes;
pub use models::{
    CompiledCatalog, CompiledGame, GameDefinition, GameEntry, HexDefinition, TileCatalog,
};
pub use render::{JsonRenderer, Renderer};
pub use resource::{DefinitionSource, FsDefinitionSource};
pub use tables::Tables;
pub use tiles::TileCatalogCompiler;
