//! ptree core - process tree engine and renderer.
//!
//! The engine is a pipeline over an immutable snapshot:
//! snapshot acquisition ([`collect`]), arena forest construction and
//! marking ([`tree`]), and depth-first rendering with glyph tables,
//! ANSI-aware widths and colorization ([`render`]).

pub mod collect;
pub mod logging;
pub mod mock_snapshot;
pub mod options;
pub mod pipeline;
pub mod render;
pub mod term;
pub mod tree;
