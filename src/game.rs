use rand::Rng;

use crate::{
    board::{Board, BoardView},
    common::{Coord, ShotOutcome, Side},
    config::MAX_BOARD_ATTEMPTS,
    fleet::{place_fleet, PlacementError},
};

/// Match lifecycle. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum Phase {
    NotStarted,
    InProgress,
    Finished,
}

/// What an accepted shot did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotReport {
    pub shooter: Side,
    pub target: Coord,
    pub outcome: ShotOutcome,
    /// Side to move after this shot.
    pub next_turn: Side,
    /// Set when this shot finished the match.
    pub winner: Option<Side>,
}

/// A shot the engine refused. Nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShotRejection {
    #[error("match is not in progress ({0:?})")]
    NotInProgress(Phase),
    #[error("it is not side {0}'s turn")]
    NotYourTurn(Side),
    #[error("cell {0} was already shot")]
    AlreadyShot(Coord),
}

/// Failure to start a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("match already started")]
    AlreadyStarted,
    #[error("side {0} has no units")]
    EmptyBoard(Side),
    #[error("fleet placement failed: {0}")]
    Placement(#[from] PlacementError),
}

/// Two boards, whose turn it is, and who won.
///
/// Side 0 moves first. A miss passes the turn, a hit keeps it. The match
/// finishes the moment the target board's last unit is destroyed, and the
/// shooter wins.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    boards: [Board; 2],
    current: Side,
    phase: Phase,
    winner: Option<Side>,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self {
            boards: [Board::new(), Board::new()],
            current: Side::First,
            phase: Phase::NotStarted,
            winner: None,
        }
    }

    /// Populate both boards with random fleets and begin play.
    pub fn start<R: Rng>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        if self.phase != Phase::NotStarted {
            return Err(EngineError::AlreadyStarted);
        }
        let first = place_fleet(rng, MAX_BOARD_ATTEMPTS)?;
        let second = place_fleet(rng, MAX_BOARD_ATTEMPTS)?;
        self.begin([first, second]);
        Ok(())
    }

    /// Begin play on boards prepared by the caller.
    pub fn start_with_boards(&mut self, boards: [Board; 2]) -> Result<(), EngineError> {
        if self.phase != Phase::NotStarted {
            return Err(EngineError::AlreadyStarted);
        }
        for side in Side::BOTH {
            if boards[side.index()].unit_count() == 0 {
                return Err(EngineError::EmptyBoard(side));
            }
        }
        self.begin(boards);
        Ok(())
    }

    fn begin(&mut self, boards: [Board; 2]) {
        self.boards = boards;
        self.current = Side::First;
        self.winner = None;
        self.phase = Phase::InProgress;
        log::trace!("match started");
    }

    /// `side` fires at `target` on the opposing board.
    pub fn shoot(&mut self, side: Side, target: Coord) -> Result<ShotReport, ShotRejection> {
        if self.phase != Phase::InProgress {
            return Err(ShotRejection::NotInProgress(self.phase));
        }
        if side != self.current {
            return Err(ShotRejection::NotYourTurn(side));
        }

        let board = &mut self.boards[side.opponent().index()];
        let outcome = board
            .shoot(target)
            .map_err(|_| ShotRejection::AlreadyShot(target))?;

        if outcome.is_hit() {
            if board.all_destroyed() {
                self.phase = Phase::Finished;
                self.winner = Some(side);
            }
        } else {
            self.current = side.opponent();
        }

        Ok(ShotReport {
            shooter: side,
            target,
            outcome,
            next_turn: self.current,
            winner: self.winner,
        })
    }

    /// Would `shoot(side, row, col)` be accepted? Never mutates.
    pub fn is_legal_shot(&self, side: Side, row: i64, col: i64) -> bool {
        let Ok(target) = Coord::try_new(row, col) else {
            return false;
        };
        self.phase == Phase::InProgress
            && side == self.current
            && !self.boards[side.opponent().index()].cell(target).is_shot()
    }

    pub fn current_turn(&self) -> Side {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// `side`'s board as its opponent sees it.
    pub fn board_view(&self, side: Side) -> BoardView<'_> {
        BoardView::new(&self.boards[side.index()])
    }

    /// `side`'s own board, ships included. Read-only.
    pub fn board(&self, side: Side) -> &Board {
        &self.boards[side.index()]
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}
