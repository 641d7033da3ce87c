//! Engine module - the falling-block state machine
//!
//! The engine owns the board, the active piece and the piece queue. It
//! accepts discrete [`Command`]s, advances gravity one row per
//! [`Engine::advance_tick`], locks pieces that can no longer fall, clears full
//! rows, scores the clear and spawns the next piece.
//!
//! Every transformation is checked against the board before it is committed,
//! so an illegal command leaves the game exactly as it was. Nothing here
//! returns an error during play; the only terminal condition is
//! [`EngineState::GameOver`], reached when a fresh piece cannot be placed.

use std::fmt;

use log::{debug, info, warn};

use crate::board::Board;
use crate::error::EngineError;
use crate::piece::ActivePiece;
use crate::rng::PieceQueue;
use crate::scoring::line_clear_score;
use crate::types::{CellState, Command, PieceKind, RotateDirection, DEFAULT_SEED};

/// Lifecycle state of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// A piece is falling and accepts commands
    Active,
    /// Terminal: commands and ticks no longer change anything
    GameOver,
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct Engine {
    board: Board,
    /// Always `Some` while `state` is `Active`
    active: Option<ActivePiece>,
    queue: PieceQueue,
    state: EngineState,
    /// Score earned by hard drops since the last tick
    pending_score: u32,
    /// Total rows cleared
    lines: u32,
    /// Monotonic id for spawned pieces (increments only on successful spawn)
    piece_id: u32,
}

impl Engine {
    /// Create a game on an empty board with the default seed
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a game on an empty board whose piece sequence follows `seed`
    pub fn with_seed(seed: u32) -> Self {
        Self::with_board(Board::new(), seed)
    }

    /// Create a game on a preset board
    ///
    /// If the first piece cannot be placed the engine starts in `GameOver`.
    pub fn with_board(board: Board, seed: u32) -> Self {
        let mut engine = Self {
            board,
            active: None,
            queue: PieceQueue::new(seed),
            state: EngineState::Active,
            pending_score: 0,
            lines: 0,
            piece_id: 0,
        };
        engine.spawn_piece();
        engine
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == EngineState::GameOver
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    /// Locked cells only; the active piece is not part of the board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    /// Kind of the piece that will spawn after the current one locks
    pub fn next_kind(&self) -> PieceKind {
        self.queue.peek()
    }

    pub fn seed(&self) -> u32 {
        self.queue.seed()
    }

    /// Hard-drop score not yet returned by [`Engine::advance_tick`]
    pub fn pending_score(&self) -> u32 {
        self.pending_score
    }

    /// Board width in cells
    pub fn size_x(&self) -> usize {
        self.board.width() as usize
    }

    /// Board height in cells
    pub fn size_y(&self) -> usize {
        self.board.height() as usize
    }

    /// Spawn the next piece from the queue, or end the game if it is blocked
    fn spawn_piece(&mut self) -> bool {
        let kind = self.queue.draw();
        let piece = ActivePiece::spawn(kind);

        if !piece.fits(&self.board) {
            self.active = None;
            self.state = EngineState::GameOver;
            info!(
                "spawn blocked for {} piece, game over after {} pieces and {} lines",
                kind.as_str(),
                self.piece_id,
                self.lines
            );
            return false;
        }

        self.active = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
        debug!("spawned {} piece #{}", kind.as_str(), self.piece_id);
        true
    }

    /// Commit `candidate` if every one of its cells is free
    fn try_place(&mut self, candidate: ActivePiece) -> bool {
        if self.state != EngineState::Active || !candidate.fits(&self.board) {
            return false;
        }
        self.active = Some(candidate);
        true
    }

    /// Try to move the active piece
    pub(crate) fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        self.try_place(active.translated(dx, dy))
    }

    /// Try to rotate the active piece one step (no wall kicks)
    pub(crate) fn try_rotate(&mut self, direction: RotateDirection) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        self.try_place(active.rotated(direction))
    }

    /// Row the active piece's anchor would rest at if dropped now
    pub fn landing_y(&self) -> Option<i8> {
        let mut resting = self.active?;
        while !resting.is_grounded(&self.board) {
            resting = resting.translated(0, 1);
        }
        Some(resting.y)
    }

    /// Drop the active piece to rest and lock it immediately
    ///
    /// The line-clear score is banked until the next tick.
    fn hard_drop(&mut self) -> bool {
        let (Some(active), Some(landing_y)) = (self.active, self.landing_y()) else {
            return false;
        };

        self.active = Some(ActivePiece {
            y: landing_y,
            ..active
        });
        let score = self.lock_piece();
        self.pending_score = self.pending_score.saturating_add(score);
        true
    }

    /// Lock the active piece, clear full rows and spawn the next piece
    ///
    /// Returns the score delta for the rows cleared.
    fn lock_piece(&mut self) -> u32 {
        let Some(active) = self.active.take() else {
            return 0;
        };

        let cells = active.occupied_cells();
        if !self.board.lock_cells(&cells, active.kind) {
            // Unreachable while the active piece only moves through `try_place`
            warn!("active {} piece overlaps the board at lock", active.kind.as_str());
        }

        let cleared_rows = self.board.clear_full_rows();
        let lines_cleared = cleared_rows.len();
        let score = line_clear_score(lines_cleared);

        if lines_cleared > 0 {
            self.lines = self.lines.saturating_add(lines_cleared as u32);
            debug!(
                "locked {} piece at ({}, {}), cleared rows {:?} for {} points",
                active.kind.as_str(),
                active.x,
                active.y,
                cleared_rows.as_slice(),
                score
            );
        } else {
            debug!(
                "locked {} piece at ({}, {})",
                active.kind.as_str(),
                active.x,
                active.y
            );
        }

        self.spawn_piece();
        score
    }

    /// Apply one player command
    ///
    /// Returns whether the command changed the game. Illegal commands and any
    /// command after game over are ignored.
    pub fn input(&mut self, command: Command) -> bool {
        if self.is_game_over() {
            return false;
        }

        match command {
            Command::MoveLeft => self.try_move(-1, 0),
            Command::MoveRight => self.try_move(1, 0),
            Command::MoveBottom => self.try_move(0, 1),
            Command::MoveTop => self.hard_drop(),
            Command::RotateLeft => self.try_rotate(RotateDirection::Left),
            Command::RotateRight => self.try_rotate(RotateDirection::Right),
        }
    }

    /// Apply gravity once and settle the board
    ///
    /// Moves the active piece down one row; if it cannot move it is locked,
    /// full rows are cleared and the next piece spawns. Returns the score
    /// earned since the previous tick (this lock plus any hard drops).
    pub fn advance_tick(&mut self) -> u32 {
        let banked = std::mem::take(&mut self.pending_score);

        if self.is_game_over() || self.try_move(0, 1) {
            return banked;
        }

        banked.saturating_add(self.lock_piece())
    }

    /// Observable state of (x, y), with the active piece overlaid
    ///
    /// Out-of-range coordinates are a caller bug: they are logged and report
    /// `Empty`. Use [`Engine::checked_cell_state`] to get an error instead.
    pub fn cell_state(&self, x: usize, y: usize) -> CellState {
        match self.checked_cell_state(x, y) {
            Ok(state) => state,
            Err(err) => {
                warn!("cell_state: {err}");
                CellState::Empty
            }
        }
    }

    /// Observable state of (x, y), or `OutOfBounds`
    pub fn checked_cell_state(&self, x: usize, y: usize) -> Result<CellState, EngineError> {
        let (width, height) = self.board.dimensions();
        if x >= width as usize || y >= height as usize {
            return Err(EngineError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }

        let (x, y) = (x as i8, y as i8);
        if self.active.is_some_and(|piece| piece.covers(x, y)) {
            return Ok(CellState::Occupied);
        }
        Ok(self.board.cell_state(x, y).unwrap_or_default())
    }

    /// Human-readable snapshot of the board with the active piece overlaid
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Playfield drawn between `<!` `!>` walls, with a floor and a base line
impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size_y() {
            f.write_str("<!")?;
            for x in 0..self.size_x() {
                f.write_str(match self.cell_state(x, y) {
                    CellState::Occupied => "[]",
                    CellState::Empty => " .",
                })?;
            }
            f.write_str("!>\n")?;
        }

        f.write_str("<!")?;
        for _ in 0..self.size_x() {
            f.write_str("==")?;
        }
        f.write_str("!>\n  ")?;
        for _ in 0..self.size_x() {
            f.write_str("\\/")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;
    use crate::types::{Rotation, BOARD_HEIGHT, BOARD_WIDTH};

    /// Engine with a chosen active piece on an otherwise untouched board
    fn engine_with_piece(board: Board, piece: ActivePiece) -> Engine {
        let mut engine = Engine::with_board(board, 12345);
        assert!(!engine.is_game_over());
        engine.active = Some(piece);
        engine
    }

    fn fill_spawn_box(board: &mut Board) {
        for y in 0..2 {
            for x in 3..=6 {
                board.set(x, y, Some(PieceKind::Z));
            }
        }
    }

    fn assert_invariants(engine: &Engine) {
        if engine.is_game_over() {
            assert!(engine.active.is_none());
            return;
        }
        let piece = engine.active.expect("active piece while playing");
        for (x, y) in piece.occupied_cells() {
            assert!((0..BOARD_WIDTH as i8).contains(&x), "x out of bounds: {x}");
            assert!((0..BOARD_HEIGHT as i8).contains(&y), "y out of bounds: {y}");
            assert!(engine.board.is_free(x, y), "piece overlaps ({x}, {y})");
        }
    }

    #[test]
    fn test_new_engine() {
        let engine = Engine::new();

        assert_eq!(engine.state(), EngineState::Active);
        assert_eq!(engine.size_x(), 10);
        assert_eq!(engine.size_y(), 20);
        assert_eq!(engine.board.occupied_count(), 0);
        assert_eq!(engine.pending_score, 0);
        assert_eq!(engine.piece_id, 1);

        let piece = engine.active.unwrap();
        assert_eq!((piece.x, piece.y), (3, 0));
        assert_eq!(piece.rotation, Rotation::North);
    }

    #[test]
    fn test_same_seed_same_first_piece() {
        let a = Engine::with_seed(77);
        let b = Engine::with_seed(77);
        assert_eq!(a.active, b.active);
        assert_eq!(a.next_kind(), b.next_kind());
    }

    #[test]
    fn test_move_left_three_times() {
        for kind in PieceKind::ALL {
            let mut engine = engine_with_piece(Board::new(), ActivePiece::spawn(kind));
            for _ in 0..3 {
                assert!(engine.input(Command::MoveLeft));
            }
            let piece = engine.active.unwrap();
            assert_eq!((piece.x, piece.y), (0, 0), "{kind:?}");
            assert_eq!(piece.rotation, Rotation::North);
        }
    }

    #[test]
    fn test_illegal_move_is_noop() {
        let mut engine = engine_with_piece(Board::new(), ActivePiece::spawn(PieceKind::J));
        while engine.input(Command::MoveLeft) {}

        let piece = engine.active;
        let board = engine.board.clone();
        assert!(!engine.input(Command::MoveLeft));
        assert_eq!(engine.active, piece);
        assert_eq!(engine.board, board);
    }

    #[test]
    fn test_move_into_locked_cell_is_noop() {
        let mut board = Board::new();
        // T north at x=3 covers (3,1); a block at (2,1) stops a left move
        board.set(2, 1, Some(PieceKind::O));
        let mut engine = engine_with_piece(board, ActivePiece::spawn(PieceKind::T));

        assert!(!engine.input(Command::MoveLeft));
        assert_eq!(engine.active.unwrap().x, 3);
        assert!(engine.input(Command::MoveRight));
    }

    #[test]
    fn test_rotation_rejected_without_kicks() {
        // I north resting on the floor: rotating to vertical would leave the board
        let piece = ActivePiece::spawn(PieceKind::I).translated(0, 18);
        let mut engine = engine_with_piece(Board::new(), piece);

        assert!(!engine.input(Command::RotateRight));
        assert!(!engine.input(Command::RotateLeft));
        assert_eq!(engine.active, Some(piece));
    }

    #[test]
    fn test_rotation_cycles() {
        let mut engine = engine_with_piece(Board::new(), ActivePiece::spawn(PieceKind::T));
        let start = engine.active.unwrap();

        assert!(engine.input(Command::RotateRight));
        assert_eq!(engine.active.unwrap().rotation, Rotation::East);
        assert!(engine.input(Command::RotateLeft));
        assert!(engine.input(Command::RotateLeft));
        assert_eq!(engine.active.unwrap().rotation, Rotation::West);
        assert!(engine.input(Command::RotateRight));
        assert_eq!(engine.active.unwrap(), start);
    }

    #[test]
    fn test_move_bottom_never_locks() {
        let piece = ActivePiece::spawn(PieceKind::O).translated(0, 18);
        let mut engine = engine_with_piece(Board::new(), piece);
        let id = engine.piece_id;

        assert!(!engine.input(Command::MoveBottom));
        assert_eq!(engine.active, Some(piece));
        assert_eq!(engine.piece_id, id);
        assert_eq!(engine.board.occupied_count(), 0);
    }

    #[test]
    fn test_tick_applies_gravity() {
        let mut engine = Engine::with_seed(3);
        let y = engine.active.unwrap().y;

        assert_eq!(engine.advance_tick(), 0);
        assert_eq!(engine.active.unwrap().y, y + 1);
    }

    #[test]
    fn test_tick_locks_grounded_piece() {
        let piece = ActivePiece::spawn(PieceKind::O).translated(-4, 18);
        let mut engine = engine_with_piece(Board::new(), piece);
        let id = engine.piece_id;

        assert_eq!(engine.advance_tick(), 0);
        for (x, y) in piece.occupied_cells() {
            assert!(engine.board.is_occupied(x, y));
        }
        assert_eq!(engine.piece_id, id + 1);
        assert_eq!(engine.active.unwrap().y, 0);
    }

    #[test]
    fn test_lock_fills_gap_and_clears_row() {
        let mut board = Board::new();
        board.fill_row(19, PieceKind::L, &[9]);
        board.set(0, 10, Some(PieceKind::S));

        // I east occupies column x+2, rows y..y+3
        let piece = ActivePiece {
            kind: PieceKind::I,
            rotation: Rotation::East,
            x: 7,
            y: 16,
        };
        let mut engine = engine_with_piece(board, piece);

        assert_eq!(engine.advance_tick(), line_clear_score(1));
        assert_eq!(engine.lines, 1);

        // Remaining three I cells compacted down by one
        for y in 17..20 {
            assert!(engine.board.is_occupied(9, y));
        }
        assert!(!engine.board.is_occupied(9, 16));
        assert!(!engine.board.is_occupied(0, 19));
        assert!(engine.board.is_occupied(0, 11));
        assert!(!engine.board.is_occupied(0, 10));
        assert_eq!(engine.board.occupied_count(), 4);
    }

    #[test]
    fn test_untouched_full_row_is_cleared() {
        let mut board = Board::new();
        board.fill_row(19, PieceKind::I, &[]);
        board.set(5, 19, None);
        let piece = ActivePiece::spawn(PieceKind::O).translated(-3, 10);
        let mut engine = engine_with_piece(board, piece);
        // Completed behind the engine's back; only the next lock notices it
        engine.board.set(5, 19, Some(PieceKind::I));
        engine.board.set(2, 17, Some(PieceKind::T));

        // O at x=0 covers columns 1-2; it lands on the T at (2, 17)
        while engine.try_move(0, 1) {}
        let landed = engine.active.unwrap();
        assert_eq!(landed.y, 15);

        assert_eq!(engine.advance_tick(), line_clear_score(1));
        assert!(engine.board.is_occupied(2, 18));
        assert!(engine.board.is_occupied(1, 16) && engine.board.is_occupied(1, 17));
        assert!(!engine.board.is_occupied(0, 19));
        assert_eq!(engine.board.occupied_count(), 5);
    }

    #[test]
    fn test_double_clear_scores_more_than_single() {
        let mut board = Board::new();
        board.fill_row(18, PieceKind::J, &[0]);
        board.fill_row(19, PieceKind::J, &[0]);
        let piece = ActivePiece {
            kind: PieceKind::I,
            rotation: Rotation::West,
            x: -1,
            y: 16,
        };
        let mut engine = engine_with_piece(board, piece);

        let delta = engine.advance_tick();
        assert_eq!(delta, line_clear_score(2));
        assert!(delta > line_clear_score(1));
        assert_eq!(engine.lines, 2);
        // Two I cells left, now at the bottom of column 0
        assert!(engine.board.is_occupied(0, 19) && engine.board.is_occupied(0, 18));
        assert_eq!(engine.board.occupied_count(), 2);
    }

    #[test]
    fn test_hard_drop_locks_and_banks_score() {
        let mut board = Board::new();
        board.fill_row(19, PieceKind::T, &[3, 4, 5, 6]);
        let mut engine = engine_with_piece(board, ActivePiece::spawn(PieceKind::I));
        let id = engine.piece_id;

        assert!(engine.input(Command::MoveTop));
        assert_eq!(engine.piece_id, id + 1);
        assert_eq!(engine.board.occupied_count(), 0);
        assert_eq!(engine.pending_score(), line_clear_score(1));

        assert_eq!(engine.advance_tick(), line_clear_score(1));
        assert_eq!(engine.advance_tick(), 0);
    }

    #[test]
    fn test_landing_y() {
        let mut board = Board::new();
        board.set(4, 12, Some(PieceKind::S));
        let engine = engine_with_piece(board, ActivePiece::spawn(PieceKind::O));
        // O covers rows y..=y+1 in columns 4-5
        assert_eq!(engine.landing_y(), Some(10));
    }

    #[test]
    fn test_game_over_on_blocked_spawn() {
        let piece = ActivePiece::spawn(PieceKind::O).translated(3, 18);
        let mut engine = engine_with_piece(Board::new(), piece);
        fill_spawn_box(&mut engine.board);

        assert_eq!(engine.advance_tick(), 0);
        assert_eq!(engine.state(), EngineState::GameOver);
        assert!(engine.active.is_none());

        let board = engine.board.clone();
        for command in Command::ALL {
            assert!(!engine.input(command));
        }
        assert_eq!(engine.advance_tick(), 0);
        assert_eq!(engine.board, board);
    }

    #[test]
    fn test_blocked_preset_board_starts_game_over() {
        let mut board = Board::new();
        fill_spawn_box(&mut board);
        let engine = Engine::with_board(board, 1);

        assert!(engine.is_game_over());
        assert_eq!(engine.piece_id, 0);
        assert_eq!(engine.cell_state(3, 0), CellState::Occupied);
    }

    #[test]
    fn test_game_over_still_returns_lock_score() {
        let mut board = Board::new();
        board.fill_row(19, PieceKind::L, &[9]);
        let piece = ActivePiece {
            kind: PieceKind::I,
            rotation: Rotation::East,
            x: 7,
            y: 16,
        };
        let mut engine = engine_with_piece(board, piece);
        fill_spawn_box(&mut engine.board);

        assert_eq!(engine.advance_tick(), line_clear_score(1));
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_cell_state_overlays_active_piece() {
        let engine = engine_with_piece(Board::new(), ActivePiece::spawn(PieceKind::T));

        assert_eq!(engine.cell_state(4, 0), CellState::Occupied);
        assert_eq!(engine.board.cell_state(4, 0), Some(CellState::Empty));
        assert_eq!(engine.cell_state(0, 0), CellState::Empty);
    }

    #[test]
    fn test_out_of_bounds_query() {
        let engine = Engine::new();

        assert_eq!(engine.cell_state(10, 0), CellState::Empty);
        assert_eq!(engine.cell_state(0, 20), CellState::Empty);
        assert_eq!(
            engine.checked_cell_state(10, 3),
            Err(EngineError::OutOfBounds {
                x: 10,
                y: 3,
                width: 10,
                height: 20
            })
        );
        assert!(engine.checked_cell_state(9, 19).is_ok());
    }

    #[test]
    fn test_render_text() {
        let mut board = Board::new();
        board.fill_row(19, PieceKind::I, &[8, 9]);
        let piece = ActivePiece::spawn(PieceKind::S).translated(1, 0);
        let engine = engine_with_piece(board, piece);

        let empty = "<! . . . . . . . . . .!>\n";
        let mut expected = String::new();
        expected += "<! . . . . .[][] . . .!>\n";
        expected += "<! . . . .[][] . . . .!>\n";
        for _ in 2..19 {
            expected += empty;
        }
        expected += "<![][][][][][][][] . .!>\n";
        expected += "<!====================!>\n";
        expected += "  \\/\\/\\/\\/\\/\\/\\/\\/\\/\\/";

        assert_eq!(engine.render_text(), expected);
    }

    #[test]
    fn test_invariants_hold_under_random_play() {
        let mut rng = SimpleRng::new(2024);
        for seed in 0..8 {
            let mut engine = Engine::with_seed(seed);
            let mut total = 0u32;
            for _ in 0..2_000 {
                if rng.next_range(4) == 0 {
                    total += engine.advance_tick();
                } else {
                    let command = Command::ALL[rng.next_range(6) as usize];
                    let before = (engine.active, engine.board.clone());
                    if !engine.input(command) {
                        assert_eq!((engine.active, engine.board.clone()), before);
                    }
                }
                assert_invariants(&engine);
            }
            total += engine.advance_tick();
            // Score only comes from cleared rows
            assert!(engine.lines() > 0 || total == 0);
        }
    }
}
