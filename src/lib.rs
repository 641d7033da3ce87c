//! Tetris engine (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `tetris_engine::{core,runtime,types}` and ships the
//! stdin-driven binary.

pub use tetris_engine_core as core;
pub use tetris_engine_runtime as runtime;
pub use tetris_engine_types as types;
