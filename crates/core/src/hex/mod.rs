#![allow(missing_docs)]

//! Per-hex compilation: palette classification and feature encoding.

mod color;
pub mod encoder;

pub use color::{ColorClassifier, DEFAULT_COLOR};
pub use encoder::{is_junction, side_index, Curve, HexEncoder};
