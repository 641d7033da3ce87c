//! Core types module - shared enumerations and constants
//!
//! This module defines the closed vocabularies every other crate speaks:
//! board dimensions, the two cell states, the six player commands, piece kinds
//! and rotation states. All types are plain data with no dependencies, so the
//! engine, the runtime and any external renderer can share them.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn position**: (3, 0), the top-left corner of a 4x2 spawn box
//!   covering columns 3-6, which centres every piece on a 10-wide board
//!
//! # Cadence Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRAVITY_TICK_MS` | 1000 | One gravity step per second |
//! | `RENDER_FPS` | 30 | Render poll frequency |
//!
//! Both are runtime policy only. The engine works at any caller-chosen cadence.
//!
//! # Wire Compatibility
//!
//! [`CellState`] and [`Command`] are `#[repr(u8)]` with stable discriminants
//! so that callers exchanging small integer codes keep the same value count
//! and ordering.
//!
//! # Examples
//!
//! ```
//! use tetris_engine_types::{Command, CellState, Rotation, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
//! assert_eq!(Command::from_u8(5), Some(Command::RotateRight));
//! assert_eq!(CellState::from_u8(1), Some(CellState::Occupied));
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::from_index(7), Rotation::West);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Anchor position for newly spawned pieces (x, y)
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// Default gravity interval (1000ms = 1 row per second)
pub const GRAVITY_TICK_MS: u64 = 1000;

/// Default render poll frequency
pub const RENDER_FPS: u32 = 30;

/// Seed used by `Engine::new()`
pub const DEFAULT_SEED: u32 = 1;

/// Number of rotation states per piece kind
pub const ROTATION_STATES: usize = 4;

/// Number of cells occupied by every piece
pub const PIECE_CELLS: usize = 4;

/// Line clear scoring table (Classic Nintendo scoring, level 0)
///
/// Points awarded for clearing N rows in a single lock:
/// - 0 rows: 0 points
/// - 1 row: 40 points
/// - 2 rows: 100 points
/// - 3 rows: 300 points
/// - 4 rows: 1200 points
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Observable state of a single board cell
///
/// This is the only cell information exposed to renderers. Locked cells may
/// remember their piece kind internally; that never leaks through here.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Empty = 0,
    Occupied = 1,
}

impl CellState {
    /// Integer code of this state
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode an integer code (0 = empty, 1 = occupied)
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CellState::Empty),
            1 => Some(CellState::Occupied),
            _ => None,
        }
    }

    pub fn is_occupied(self) -> bool {
        self == CellState::Occupied
    }
}

/// Discrete player commands
///
/// Exactly six values, in a fixed order:
///
/// | Code | Command | Effect |
/// |------|---------|--------|
/// | 0 | `MoveLeft` | shift one column left |
/// | 1 | `MoveRight` | shift one column right |
/// | 2 | `MoveTop` | hard drop: fall to rest and lock |
/// | 3 | `MoveBottom` | move one row down |
/// | 4 | `RotateLeft` | rotate counter-clockwise |
/// | 5 | `RotateRight` | rotate clockwise |
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft = 0,
    MoveRight = 1,
    MoveTop = 2,
    MoveBottom = 3,
    RotateLeft = 4,
    RotateRight = 5,
}

impl Command {
    /// Every command, in code order
    pub const ALL: [Command; 6] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::MoveTop,
        Command::MoveBottom,
        Command::RotateLeft,
        Command::RotateRight,
    ];

    /// Integer code of this command
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode an integer code (0-5)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::Command;
    ///
    /// assert_eq!(Command::from_u8(0), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_u8(2), Some(Command::MoveTop));
    /// assert_eq!(Command::from_u8(6), None);
    /// ```
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Parse a command name (case-insensitive)
    ///
    /// Accepts the camelCase names plus short aliases:
    /// `left`, `right`, `drop`/`top`, `down`/`bottom`, `ccw`, `cw`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveRight"), Some(Command::MoveRight));
    /// assert_eq!(Command::from_str("DOWN"), Some(Command::MoveBottom));
    /// assert_eq!(Command::from_str("cw"), Some(Command::RotateRight));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" | "left" => Some(Command::MoveLeft),
            "moveright" | "right" => Some(Command::MoveRight),
            "movetop" | "top" | "drop" => Some(Command::MoveTop),
            "movebottom" | "bottom" | "down" => Some(Command::MoveBottom),
            "rotateleft" | "ccw" => Some(Command::RotateLeft),
            "rotateright" | "cw" => Some(Command::RotateRight),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::MoveTop => "moveTop",
            Command::MoveBottom => "moveBottom",
            Command::RotateLeft => "rotateLeft",
            Command::RotateRight => "rotateRight",
        }
    }
}

/// The seven tetromino piece kinds
///
/// - **I**: straight bar
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **S**: S-shaped
/// - **Z**: Z-shaped (mirror of S)
/// - **J**: J-shaped
/// - **L**: L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every piece kind, in bag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("T"), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation states
///
/// - **North**: spawn orientation (index 0)
/// - **East**: rotated 90° clockwise (index 1)
/// - **South**: rotated 180° (index 2)
/// - **West**: rotated 90° counter-clockwise (index 3)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotate one step in the given direction
    pub fn rotate(&self, direction: RotateDirection) -> Self {
        match direction {
            RotateDirection::Left => self.rotate_ccw(),
            RotateDirection::Right => self.rotate_cw(),
        }
    }

    /// Rotation index in the cycle (0-3)
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build from a raw rotation index, wrapping modulo 4
    pub fn from_index(index: usize) -> Self {
        match index % ROTATION_STATES {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// Direction of a single rotation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateDirection {
    /// Counter-clockwise
    Left,
    /// Clockwise
    Right,
}
