//! Board module - manages the locked-cell grid
//!
//! The board is a 10x20 grid where each slot is either empty or holds the kind
//! of the piece that was locked there. Storage is a flat row-major array.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom). Dimensions never change after construction.
//!
//! Only the engine mutates a live board. The active piece is never written
//! here until it locks.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{CellState, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// One stored cell: `None` when empty, the locked piece kind otherwise
pub type Slot = Option<PieceKind>;

/// Row indices removed by a single compaction pass
pub type ClearedRows = ArrayVec<usize, { BOARD_HEIGHT as usize }>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of slots, row-major order (y * WIDTH + x)
    cells: [Slot; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if Self::out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    #[inline(always)]
    fn out_of_bounds(x: i8, y: i8) -> bool {
        x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// (width, height), constant for the board's lifetime
    pub fn dimensions(&self) -> (u8, u8) {
        (BOARD_WIDTH, BOARD_HEIGHT)
    }

    /// Get the slot at (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Slot> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Two-state view of the slot at (x, y)
    /// Returns None if out of bounds
    pub fn cell_state(&self, x: i8, y: i8) -> Option<CellState> {
        self.get(x, y).map(|slot| match slot {
            Some(_) => CellState::Occupied,
            None => CellState::Empty,
        })
    }

    /// Set the slot at (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, slot: Slot) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = slot;
                true
            }
            None => false,
        }
    }

    /// Check if position is free (within bounds and empty)
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        self.row(y).iter().all(|slot| slot.is_some())
    }

    fn row(&self, y: usize) -> &[Slot] {
        let width = BOARD_WIDTH as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Clear a row and shift all rows above down by one
    /// Returns false when `y` is off the board
    pub fn clear_row(&mut self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }

        let width = BOARD_WIDTH as usize;

        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }

        self.cells[..width].fill(None);

        true
    }

    /// Clear all full rows in one compacting pass
    ///
    /// Remaining rows move down without reordering and the vacated top rows
    /// become empty. Returns the cleared row indices, bottom-most first.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        self.cells[..write_y * width].fill(None);

        cleared_rows
    }

    /// Lock cells onto the board with the given kind
    ///
    /// All-or-nothing: returns false without writing anything if any cell is
    /// out of bounds or already occupied.
    pub fn lock_cells(&mut self, cells: &[(i8, i8)], kind: PieceKind) -> bool {
        if !cells.iter().all(|&(x, y)| self.is_free(x, y)) {
            return false;
        }

        for &(x, y) in cells {
            self.set(x, y, Some(kind));
        }

        true
    }

    /// Fill every cell of row `y` except the columns in `holes`
    ///
    /// Intended for preset puzzles and test setups.
    pub fn fill_row(&mut self, y: i8, kind: PieceKind, holes: &[i8]) {
        for x in 0..BOARD_WIDTH as i8 {
            if !holes.contains(&x) {
                self.set(x, y, Some(kind));
            }
        }
    }

    /// Number of occupied cells on the board
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|slot| slot.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// One line per row, `[]` for occupied and ` .` for empty
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_HEIGHT as usize {
            if y > 0 {
                writeln!(f)?;
            }
            for slot in self.row(y) {
                f.write_str(if slot.is_some() { "[]" } else { " ." })?;
            }
        }
        Ok(())
    }
}
