//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the whole falling-block engine: shape tables, the
//! board, the active piece, the piece queue, scoring and the engine state
//! machine that ties them together. It has **no dependencies** on rendering,
//! input devices or timers, which makes it:
//!
//! - **Deterministic**: the same seed produces the same piece sequence
//! - **Synchronous**: every call runs to completion, O(board area) at worst
//! - **Portable**: any loop can drive it at any cadence
//!
//! # Module Structure
//!
//! - [`shapes`]: rotation tables for the seven tetrominoes
//! - [`board`]: 10x20 grid with collision queries and line clearing
//! - [`piece`]: the active piece and its checked transformations
//! - [`rng`]: seeded 7-bag piece generation
//! - [`scoring`]: score delta per line clear
//! - [`engine`]: commands, gravity ticks, locking and game over
//!
//! # Example
//!
//! ```
//! use tetris_engine_core::Engine;
//! use tetris_engine_types::{CellState, Command};
//!
//! let mut engine = Engine::new();
//!
//! engine.input(Command::MoveLeft);
//! engine.input(Command::RotateRight);
//!
//! // Gravity: the caller owns the cadence and accumulates the score
//! let mut score = 0;
//! for _ in 0..5 {
//!     score += engine.advance_tick();
//! }
//! assert_eq!(score, 0);
//!
//! assert_eq!(engine.cell_state(9, 19), CellState::Empty);
//! println!("{}", engine.render_text());
//! ```
//!
//! # Concurrency
//!
//! An [`Engine`] holds mutable state with no internal locking. Callers that
//! drive it from several tasks must serialise access (the runtime crate wraps
//! it in a mutex).

pub mod board;
pub mod engine;
pub mod error;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod shapes;

pub use tetris_engine_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Slot};
pub use engine::{Engine, EngineState};
pub use error::EngineError;
pub use piece::ActivePiece;
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::line_clear_score;
pub use shapes::{offsets, offsets_at, PieceShape};
