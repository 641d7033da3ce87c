use thiserror::Error;

/// Caller errors surfaced by the checked query API
///
/// Gameplay itself never fails: illegal commands are ignored and the end of a
/// game is a state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: u8,
        height: u8,
    },
}
