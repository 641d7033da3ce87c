//! Active piece - the falling, player-controlled tetromino

use crate::board::Board;
use crate::shapes::{offsets, PieceShape};
use crate::types::{PieceKind, RotateDirection, Rotation, PIECE_CELLS, SPAWN_POSITION};

/// Active falling piece
///
/// `kind` never changes for the lifetime of a piece. Transformations build a
/// new value; the engine only commits one after [`ActivePiece::fits`] has
/// checked every resulting cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    /// Create a new piece at the spawn position, rotation North
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    /// Cell offsets for the current rotation
    pub fn shape(&self) -> PieceShape {
        offsets(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four occupied cells
    pub fn occupied_cells(&self) -> [(i8, i8); PIECE_CELLS] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Whether this piece covers (x, y)
    pub fn covers(&self, x: i8, y: i8) -> bool {
        self.occupied_cells().contains(&(x, y))
    }

    pub fn translated(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// One rotation step in place (no kick offsets)
    pub fn rotated(&self, direction: RotateDirection) -> Self {
        Self {
            rotation: self.rotation.rotate(direction),
            ..*self
        }
    }

    /// Check if all cells are in bounds and empty on the board
    pub fn fits(&self, board: &Board) -> bool {
        self.occupied_cells()
            .iter()
            .all(|&(x, y)| board.is_free(x, y))
    }

    /// Check if the piece is resting on the floor or on locked cells
    pub fn is_grounded(&self, board: &Board) -> bool {
        !self.translated(0, 1).fits(board)
    }
}
