//! Randomized, retry-bounded fleet placement.
//!
//! Each unit gets a random starting orientation and up to
//! [`MAX_PLACEMENT_ATTEMPTS`] random origins, flipping orientation after
//! every miss so units near an edge get a second chance. A unit that cannot
//! be placed fails the whole board, which is then reset to empty: a board is
//! either fully populated or untouched, never half done.

use rand::Rng;

use crate::board::Board;
use crate::common::Coord;
use crate::config::{BOARD_SIZE, FLEET, MAX_PLACEMENT_ATTEMPTS};
use crate::ship::{Orientation, ShipClass, Unit};

/// Fleet placement could not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("no room for a unit of length {length} after {attempts} attempts")]
    UnitUnplaceable { length: usize, attempts: usize },
    #[error("no complete fleet layout found in {boards} fresh boards")]
    BoardsExhausted { boards: usize },
}

/// Lay the standard fleet out on `board`, largest unit first.
///
/// The board is cleared first. On failure it is cleared again and the error
/// says which unit ran out of attempts; callers retry with a fresh board.
pub fn auto_place<R: Rng>(board: &mut Board, rng: &mut R) -> Result<(), PlacementError> {
    board.reset();
    for class in FLEET {
        if let Err(e) = place_unit(board, class, rng) {
            log::debug!("fleet placement failed: {}", e);
            board.reset();
            return Err(e);
        }
    }
    Ok(())
}

/// Build a fully populated board, trying at most `max_boards` fresh layouts.
pub fn place_fleet<R: Rng>(rng: &mut R, max_boards: usize) -> Result<Board, PlacementError> {
    let mut board = Board::new();
    for attempt in 1..=max_boards {
        match auto_place(&mut board, rng) {
            Ok(()) => return Ok(board),
            Err(_) => log::debug!("board layout {} of {} failed", attempt, max_boards),
        }
    }
    Err(PlacementError::BoardsExhausted { boards: max_boards })
}

fn place_unit<R: Rng>(board: &mut Board, class: ShipClass, rng: &mut R) -> Result<(), PlacementError> {
    let n = BOARD_SIZE as usize;
    let len = class.length();
    let mut orientation = if rng.random() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let (max_r, max_c) = match orientation {
            Orientation::Vertical => (n - len, n - 1),
            Orientation::Horizontal => (n - 1, n - len),
        };
        let origin = Coord::new(rng.random_range(0..=max_r), rng.random_range(0..=max_c));
        if let Ok(unit) = Unit::new(class, origin, orientation) {
            if board.place(unit).is_ok() {
                return Ok(());
            }
        }
        orientation = orientation.flipped();
    }

    Err(PlacementError::UnitUnplaceable {
        length: len,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}
