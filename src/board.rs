//! One side's board: the cell grid plus the units placed on it.

use core::fmt;

use crate::common::{BoardError, CellState, Coord, ShotOutcome};
use crate::config::{fleet_quota, BOARD_CELLS, BOARD_SIZE, FLEET_SIZE};
use crate::ship::{Unit, BB};

/// A 10×10 grid of cell states and the fleet laid out on it.
///
/// Created empty, populated once by placement, then only mutated by shots.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [CellState; BOARD_CELLS],
    units: [Option<Unit>; FLEET_SIZE],
    ship_map: BB,
}

impl Board {
    /// Create an empty board (no units placed).
    pub fn new() -> Self {
        Board {
            cells: [CellState::Empty; BOARD_CELLS],
            units: [None; FLEET_SIZE],
            ship_map: BB::new(),
        }
    }

    /// Raw state of a cell, including `ShipPresent`.
    pub fn cell(&self, coord: Coord) -> CellState {
        self.cells[coord.index()]
    }

    /// State of a cell as the opposing side may see it: `ShipPresent` reads as `Empty`.
    pub fn view_for(&self, coord: Coord) -> CellState {
        match self.cell(coord) {
            CellState::ShipPresent => CellState::Empty,
            other => other,
        }
    }

    /// Placed units in placement order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().flatten()
    }

    pub fn unit_count(&self) -> usize {
        self.units().count()
    }

    pub fn is_fleet_complete(&self) -> bool {
        self.unit_count() == FLEET_SIZE
    }

    /// The unit covering `coord`, if any.
    pub fn unit_at(&self, coord: Coord) -> Option<&Unit> {
        self.units().find(|u| u.occupies(coord))
    }

    /// Cells no shot has landed on yet.
    pub fn unshot_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        Coord::all().filter(move |c| !self.cell(*c).is_shot())
    }

    /// Place a unit.
    ///
    /// Rejected, leaving the board untouched, if the fleet already holds all
    /// units of that length, if any covered cell is not empty, or if any
    /// covered cell touches an existing unit by edge or corner.
    pub fn place(&mut self, unit: Unit) -> Result<(), BoardError> {
        let length = unit.length();
        let placed = self.units().filter(|u| u.class() == unit.class()).count();
        if placed >= fleet_quota(unit.class()) {
            return Err(BoardError::QuotaExceeded { length });
        }
        if let Some(taken) = unit.cells().find(|c| self.cell(*c) != CellState::Empty) {
            return Err(BoardError::Occupied(taken));
        }
        if let Some((r, c)) = (unit.mask().halo() & self.ship_map).iter_set_bits().next() {
            return Err(BoardError::TooClose(Coord::new(r, c)));
        }
        let Some(slot) = self.units.iter_mut().find(|s| s.is_none()) else {
            return Err(BoardError::QuotaExceeded { length });
        };

        for c in unit.cells() {
            self.cells[c.index()] = CellState::ShipPresent;
        }
        self.ship_map |= unit.mask();
        *slot = Some(unit);
        Ok(())
    }

    /// Resolve a shot at `coord`.
    ///
    /// A repeated shot is rejected with [`BoardError::AlreadyShot`] and
    /// changes nothing. When a hit takes a unit's health to zero, all its
    /// cells become `Destroyed` at once.
    pub fn shoot(&mut self, coord: Coord) -> Result<ShotOutcome, BoardError> {
        let idx = coord.index();
        match self.cells[idx] {
            CellState::Miss | CellState::Hit | CellState::Destroyed => {
                Err(BoardError::AlreadyShot(coord))
            }
            CellState::Empty => {
                self.cells[idx] = CellState::Miss;
                Ok(ShotOutcome::Miss)
            }
            CellState::ShipPresent => {
                self.cells[idx] = CellState::Hit;
                // cells only become ShipPresent through `place`, so an owner exists
                let Some(unit) = self.units.iter_mut().flatten().find(|u| u.occupies(coord)) else {
                    return Ok(ShotOutcome::Hit);
                };
                if !unit.take_hit() {
                    return Ok(ShotOutcome::Hit);
                }
                for c in unit.cells() {
                    self.cells[c.index()] = CellState::Destroyed;
                }
                log::trace!("unit {:?} destroyed", unit);
                Ok(ShotOutcome::Destroyed)
            }
        }
    }

    /// `true` when every placed unit has health 0.
    pub fn all_destroyed(&self) -> bool {
        self.units().all(|u| u.is_destroyed())
    }

    /// Back to an empty grid with no units.
    pub fn reset(&mut self) {
        *self = Board::new();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ units: {} }}", self.unit_count())?;
        let n = BOARD_SIZE as usize;
        for r in 0..n {
            for c in 0..n {
                let ch = match self.cell(Coord::new(r, c)) {
                    CellState::Empty => '.',
                    CellState::ShipPresent => 'S',
                    CellState::Miss => 'o',
                    CellState::Hit => 'x',
                    CellState::Destroyed => '#',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Read-only, masked view of a board: what the opposing side is allowed to see.
///
/// Never yields `ShipPresent`.
#[derive(Clone, Copy)]
pub struct BoardView<'a> {
    board: &'a Board,
}

impl<'a> BoardView<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    pub fn cell(&self, coord: Coord) -> CellState {
        self.board.view_for(coord)
    }

    pub fn unshot_cells(&self) -> impl Iterator<Item = Coord> + 'a {
        self.board.unshot_cells()
    }

    pub fn unshot_count(&self) -> usize {
        self.unshot_cells().count()
    }

    /// Cells holding a hit or destroyed segment.
    pub fn hit_count(&self) -> usize {
        Coord::all()
            .filter(|c| matches!(self.cell(*c), CellState::Hit | CellState::Destroyed))
            .count()
    }

    pub fn all_destroyed(&self) -> bool {
        self.board.all_destroyed()
    }
}
