#![cfg(feature = "std")]
//! Transport-free front end for presentation layers.
//!
//! A [`Table`] owns the match and reports every change as a [`MatchEvent`]
//! on a channel. Consumers only get read-only views back, so nothing outside
//! the table can mutate a board.

use std::string::{String, ToString};

use rand::rngs::SmallRng;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    board::{Board, BoardView},
    common::{CellState, Coord, Side},
    config::BOARD_CELLS,
    game::{MatchEngine, Phase, ShotReport},
    player::ShotSource,
};

/// Notification sent to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// A cell on `side`'s board changed to `state`.
    CellUpdated {
        side: Side,
        coord: Coord,
        state: CellState,
    },
    TurnSwitched(Side),
    GameOver(Side),
    ErrorRaised(String),
}

/// Tally of a match so far. Indexed by shooting side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MatchSummary {
    pub phase: Phase,
    pub winner: Option<Side>,
    pub shots: [usize; 2],
    pub hits: [usize; 2],
}

pub struct Table {
    engine: MatchEngine,
    rng: SmallRng,
    events: UnboundedSender<MatchEvent>,
}

impl Table {
    pub fn new(rng: SmallRng) -> (Self, UnboundedReceiver<MatchEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let table = Self {
            engine: MatchEngine::new(),
            rng,
            events,
        };
        (table, rx)
    }

    fn emit(&self, event: MatchEvent) {
        // a dropped receiver just means nobody is watching
        let _ = self.events.send(event);
    }

    fn raise(&self, text: impl ToString) {
        let text = text.to_string();
        log::debug!("table error: {}", text);
        self.emit(MatchEvent::ErrorRaised(text));
    }

    /// Deal random fleets and start. Side 0 moves first.
    pub fn start_match(&mut self) -> bool {
        let started = self.engine.start(&mut self.rng);
        self.after_start(started)
    }

    /// Start on prepared boards.
    pub fn start_with_boards(&mut self, boards: [Board; 2]) -> bool {
        let started = self.engine.start_with_boards(boards);
        self.after_start(started)
    }

    fn after_start(&self, started: Result<(), crate::game::EngineError>) -> bool {
        match started {
            Ok(()) => {
                self.emit(MatchEvent::TurnSwitched(self.engine.current_turn()));
                true
            }
            Err(e) => {
                self.raise(e);
                false
            }
        }
    }

    /// Fire for `side`. Rejections are reported as `ErrorRaised` and leave the match unchanged.
    pub fn submit_shot(&mut self, side: Side, row: i64, col: i64) -> bool {
        let target = match Coord::try_new(row, col) {
            Ok(c) => c,
            Err(e) => {
                self.raise(e);
                return false;
            }
        };
        match self.engine.shoot(side, target) {
            Ok(report) => {
                self.publish(&report);
                true
            }
            Err(e) => {
                self.raise(e);
                false
            }
        }
    }

    /// Ask `source` for the current side's next shot and submit it.
    pub fn play_turn(&mut self, source: &mut dyn ShotSource) -> bool {
        if self.engine.phase() != Phase::InProgress {
            self.raise("match is not in progress");
            return false;
        }
        let side = self.engine.current_turn();
        let view = self.engine.board_view(side.opponent());
        let Some(target) = source.next_shot(&view, &mut self.rng) else {
            self.raise("no shot available");
            return false;
        };
        self.submit_shot(side, target.row() as i64, target.col() as i64)
    }

    fn publish(&self, report: &ShotReport) {
        let side = report.shooter.opponent();
        let board = self.engine.board(side);
        match board.unit_at(report.target) {
            Some(unit) if unit.is_destroyed() => {
                for coord in unit.cells() {
                    self.emit(MatchEvent::CellUpdated {
                        side,
                        coord,
                        state: CellState::Destroyed,
                    });
                }
            }
            _ => self.emit(MatchEvent::CellUpdated {
                side,
                coord: report.target,
                state: board.view_for(report.target),
            }),
        }

        if let Some(winner) = report.winner {
            self.emit(MatchEvent::GameOver(winner));
        } else if report.next_turn != report.shooter {
            self.emit(MatchEvent::TurnSwitched(report.next_turn));
        }
    }

    pub fn board_view(&self, side: Side) -> BoardView<'_> {
        self.engine.board_view(side)
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn summary(&self) -> MatchSummary {
        let mut shots = [0; 2];
        let mut hits = [0; 2];
        for side in Side::BOTH {
            let target = self.engine.board_view(side.opponent());
            shots[side.index()] = BOARD_CELLS - target.unshot_count();
            hits[side.index()] = target.hit_count();
        }
        MatchSummary {
            phase: self.engine.phase(),
            winner: self.engine.winner(),
            shots,
            hits,
        }
    }
}
