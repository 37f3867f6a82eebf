#![allow(missing_docs)]

//! Game compilation: the orchestrator and entity normalisation.

pub mod compiler;
pub mod entities;

pub use compiler::{filename_for, module_for, GameCompiler};
