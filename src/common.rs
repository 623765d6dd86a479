//! Common types for the engine: coordinates, sides, cell states, shot
//! outcomes and the board-level error enum.

use core::fmt;

use crate::config::BOARD_SIZE;

const N: usize = BOARD_SIZE as usize;

/// An in-range board coordinate.
///
/// Holding a `Coord` proves `row` and `col` are inside `[0, BOARD_SIZE)`.
/// [`Coord::new`] is for trusted, internally computed positions and panics
/// otherwise; untrusted input goes through [`Coord::try_new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    #[track_caller]
    pub fn new(row: usize, col: usize) -> Self {
        assert!(
            row < N && col < N,
            "coordinate ({}, {}) outside the {}x{} board",
            row,
            col,
            N,
            N
        );
        Self {
            row: row as u8,
            col: col as u8,
        }
    }

    pub fn try_new(row: i64, col: i64) -> Result<Self, CoordError> {
        if (0..N as i64).contains(&row) && (0..N as i64).contains(&col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(CoordError::OutOfRange { row, col })
        }
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// Row-major cell index.
    pub fn index(&self) -> usize {
        self.row() * N + self.col()
    }

    /// Every cell of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..N * N).map(|i| Coord::new(i / N, i % N))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rejected attempt to build a [`Coord`] from untrusted numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoordError {
    #[error("coordinate ({row}, {col}) is outside the board")]
    OutOfRange { row: i64, col: i64 },
}

/// One of the two players. Side 0 always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Side::First),
            1 => Some(Side::Second),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum CellState {
    Empty,
    ShipPresent,
    Miss,
    Hit,
    Destroyed,
}

impl CellState {
    /// True once a shot has landed on the cell.
    pub fn is_shot(self) -> bool {
        matches!(self, CellState::Miss | CellState::Hit | CellState::Destroyed)
    }
}

/// Result of a shot that was accepted by a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum ShotOutcome {
    Miss,
    Hit,
    /// Hit that brought the unit's health to zero.
    Destroyed,
}

impl ShotOutcome {
    pub fn is_hit(self) -> bool {
        !matches!(self, ShotOutcome::Miss)
    }
}

/// Rule violations reported by [`crate::Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Unit would extend past the board edge.
    #[error("unit of length {length} at {origin} does not fit on the board")]
    OutOfBounds { length: usize, origin: Coord },
    /// Unit would cover a cell that is not empty.
    #[error("cell {0} is already occupied")]
    Occupied(Coord),
    /// Unit would touch another unit by edge or corner.
    #[error("unit would touch another unit near {0}")]
    TooClose(Coord),
    /// The fleet already holds every unit of this length.
    #[error("fleet already holds every unit of length {length}")]
    QuotaExceeded { length: usize },
    /// A shot already landed here.
    #[error("cell {0} was already shot")]
    AlreadyShot(Coord),
}
