#![cfg(feature = "std")]
//! Per-connection protocol state machine.
//!
//! A [`Session`] turns one client line into the ordered list of lines the
//! server answers with. The client always plays side 0; side 1 is played by
//! a [`ShotSource`] inside the same step that hands it the turn, so every
//! `OPPONENT_SHOT` follows the `SHOOT_RESULT` that caused it.

use std::boxed::Box;
use std::string::String;
use std::vec::Vec;

use rand::rngs::SmallRng;

use crate::{
    board::Board,
    common::{Coord, Side},
    game::{MatchEngine, Phase},
    player::{RandomShooter, ShotSource},
    protocol::{ClientMessage, ServerMessage, ShotVerdict},
};

/// Side played by the connected client.
pub const HUMAN: Side = Side::First;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingJoin,
    AwaitingReady,
    InProgress,
    Finished,
    Closed,
}

pub struct Session {
    phase: SessionPhase,
    player_name: Option<String>,
    engine: MatchEngine,
    opponent: Box<dyn ShotSource>,
    rng: SmallRng,
    preset: Option<[Board; 2]>,
}

impl Session {
    /// A session against a random-shot opponent.
    pub fn new(rng: SmallRng) -> Self {
        Self::with_opponent(rng, Box::new(RandomShooter))
    }

    pub fn with_opponent(rng: SmallRng, opponent: Box<dyn ShotSource>) -> Self {
        Self {
            phase: SessionPhase::AwaitingJoin,
            player_name: None,
            engine: MatchEngine::new(),
            opponent,
            rng,
            preset: None,
        }
    }

    /// Play on these boards instead of random fleets once the client is ready.
    pub fn with_boards(mut self, boards: [Board; 2]) -> Self {
        self.preset = Some(boards);
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// `true` once nothing more will be read from the client.
    pub fn is_over(&self) -> bool {
        matches!(self.phase, SessionPhase::Finished | SessionPhase::Closed)
    }

    /// Drop to `Closed`, e.g. on disconnect. The match is abandoned.
    pub fn close(&mut self) {
        if self.phase != SessionPhase::Closed {
            log::info!("session for {:?} closed in {:?}", self.player_name, self.phase);
            self.phase = SessionPhase::Closed;
        }
    }

    /// Handle one raw line. Malformed input gets a single `ERROR`.
    pub fn handle_line(&mut self, line: &str) -> Vec<ServerMessage> {
        match line.parse::<ClientMessage>() {
            Ok(msg) => self.handle(msg),
            Err(e) => {
                log::debug!("malformed line {:?}: {}", line, e);
                vec![ServerMessage::error(e)]
            }
        }
    }

    pub fn handle(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        log::debug!("{:?} <- {}", self.phase, msg);
        if self.phase == SessionPhase::Closed {
            return vec![ServerMessage::error("session is closed")];
        }
        let mut out = Vec::new();
        match msg {
            ClientMessage::JoinGame { name } => self.join(name, &mut out),
            ClientMessage::Ready => self.ready(&mut out),
            ClientMessage::Shoot { row, col } => self.shoot(row, col, &mut out),
            ClientMessage::Quit => self.close(),
        }
        out
    }

    fn join(&mut self, name: String, out: &mut Vec<ServerMessage>) {
        if self.phase != SessionPhase::AwaitingJoin {
            out.push(ServerMessage::error("cannot join at this state"));
            return;
        }
        log::info!("player {} joined", name);
        self.player_name = Some(name);
        self.phase = SessionPhase::AwaitingReady;
        out.push(ServerMessage::GameStarted { player: HUMAN });
    }

    fn ready(&mut self, out: &mut Vec<ServerMessage>) {
        match self.phase {
            SessionPhase::AwaitingReady => {}
            SessionPhase::AwaitingJoin => {
                out.push(ServerMessage::error("join the game before sending READY"));
                return;
            }
            _ => {
                out.push(ServerMessage::error("cannot ready at this state"));
                return;
            }
        }

        let started = match self.preset.take() {
            Some(boards) => self.engine.start_with_boards(boards),
            None => self.engine.start(&mut self.rng),
        };
        if let Err(e) = started {
            log::warn!("could not start match: {}", e);
            out.push(ServerMessage::error(format!("could not start match: {}", e)));
            return;
        }
        log::info!("match started for {:?}", self.player_name);
        self.phase = SessionPhase::InProgress;
        out.push(ServerMessage::YourTurn);
    }

    fn shoot(&mut self, row: i64, col: i64, out: &mut Vec<ServerMessage>) {
        let refusal = match self.phase {
            SessionPhase::InProgress => None,
            SessionPhase::AwaitingJoin => Some("join the game before shooting"),
            SessionPhase::AwaitingReady => Some("send READY before shooting"),
            SessionPhase::Finished | SessionPhase::Closed => Some("game is not in progress"),
        };
        if let Some(text) = refusal {
            out.push(ServerMessage::error(text));
            return;
        }
        if self.engine.current_turn() != HUMAN {
            out.push(ServerMessage::error("not your turn"));
            return;
        }

        let invalid = ServerMessage::ShootResult {
            row,
            col,
            result: ShotVerdict::Invalid,
        };
        let Ok(target) = Coord::try_new(row, col) else {
            out.push(invalid);
            return;
        };
        let report = match self.engine.shoot(HUMAN, target) {
            Ok(report) => report,
            Err(e) => {
                log::debug!("shot rejected: {}", e);
                out.push(invalid);
                return;
            }
        };

        out.push(ServerMessage::ShootResult {
            row,
            col,
            result: report.outcome.into(),
        });
        if let Some(winner) = report.winner {
            self.finish(winner, out);
        } else if report.next_turn == HUMAN {
            out.push(ServerMessage::YourTurn);
        } else {
            self.opponent_turn(out);
        }
    }

    /// Let the synthetic side shoot until it misses or wins.
    fn opponent_turn(&mut self, out: &mut Vec<ServerMessage>) {
        let side = HUMAN.opponent();
        while self.engine.phase() == Phase::InProgress && self.engine.current_turn() == side {
            let view = self.engine.board_view(HUMAN);
            let picked = self
                .opponent
                .next_shot(&view, &mut self.rng)
                .filter(|c| !view.cell(*c).is_shot());
            let target = match picked {
                Some(c) => c,
                None => {
                    log::warn!("opponent gave no usable shot, taking the first open cell");
                    match view.unshot_cells().next() {
                        Some(c) => c,
                        None => break,
                    }
                }
            };

            let report = match self.engine.shoot(side, target) {
                Ok(report) => report,
                Err(e) => {
                    log::warn!("opponent shot rejected: {}", e);
                    break;
                }
            };
            out.push(ServerMessage::OpponentShot {
                row: target.row() as i64,
                col: target.col() as i64,
                result: report.outcome,
            });
            if let Some(winner) = report.winner {
                self.finish(winner, out);
                return;
            }
        }
        if self.phase == SessionPhase::InProgress && self.engine.current_turn() == HUMAN {
            out.push(ServerMessage::YourTurn);
        }
    }

    fn finish(&mut self, winner: Side, out: &mut Vec<ServerMessage>) {
        log::info!("match over, side {} won", winner);
        self.phase = SessionPhase::Finished;
        out.push(ServerMessage::GameOver { winner });
    }
}
