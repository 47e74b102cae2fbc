//! Tiles (workspace facade crate).
//!
//! Re-exports the engine and its shared types as `tiles::{core, types}` while
//! the implementation lives in dedicated crates under `crates/`.

pub use tiles_core as core;
pub use tiles_types as types;
