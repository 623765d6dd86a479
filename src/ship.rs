//! Ship classes and placed units, with occupancy tracked in a `BitBoard`.

use core::fmt;

use crate::bitboard::BitBoard;
use crate::common::{BoardError, Coord};
use crate::config::BOARD_SIZE;

pub(crate) type BB = BitBoard<u128, { BOARD_SIZE as usize }>;

/// Orientation of a unit on the board. Units grow right or down from their origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Unit class, named by deck count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum ShipClass {
    OneDeck,
    TwoDeck,
    ThreeDeck,
    FourDeck,
}

impl ShipClass {
    pub const fn length(self) -> usize {
        match self {
            ShipClass::OneDeck => 1,
            ShipClass::TwoDeck => 2,
            ShipClass::ThreeDeck => 3,
            ShipClass::FourDeck => 4,
        }
    }
}

/// A unit laid out on the board.
///
/// `health` counts the occupied cells not yet hit; it only ever decreases.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    class: ShipClass,
    orientation: Orientation,
    origin: Coord,
    mask: BB,
    health: u8,
}

impl Unit {
    /// Lay out a unit of `class` starting at `origin`.
    pub fn new(class: ShipClass, origin: Coord, orientation: Orientation) -> Result<Self, BoardError> {
        let len = class.length();
        let n = BOARD_SIZE as usize;
        let end = match orientation {
            Orientation::Horizontal => origin.col() + len,
            Orientation::Vertical => origin.row() + len,
        };
        if end > n {
            return Err(BoardError::OutOfBounds { length: len, origin });
        }

        let mut mask = BB::new();
        for i in 0..len {
            let (r, c) = match orientation {
                Orientation::Horizontal => (origin.row(), origin.col() + i),
                Orientation::Vertical => (origin.row() + i, origin.col()),
            };
            // in range: checked against the board edge above
            let _ = mask.set(r, c);
        }

        Ok(Unit {
            class,
            orientation,
            origin,
            mask,
            health: len as u8,
        })
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn length(&self) -> usize {
        self.class.length()
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn health(&self) -> usize {
        self.health as usize
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Occupied cells, ordered from the origin outward.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.length()).map(move |i| match self.orientation {
            Orientation::Horizontal => Coord::new(self.origin.row(), self.origin.col() + i),
            Orientation::Vertical => Coord::new(self.origin.row() + i, self.origin.col()),
        })
    }

    pub fn occupies(&self, coord: Coord) -> bool {
        self.mask.get(coord.row(), coord.col()).unwrap_or(false)
    }

    pub(crate) fn mask(&self) -> BB {
        self.mask
    }

    /// Register a hit; returns `true` if this hit destroyed the unit.
    pub(crate) fn take_hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unit {{ length: {}, origin: {}, orientation: {:?}, health: {} }}",
            self.length(),
            self.origin,
            self.orientation,
            self.health,
        )
    }
}
