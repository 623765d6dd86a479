#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bitboard;
mod board;
mod common;
mod config;
mod fleet;
mod game;
mod player;
mod ship;
pub mod protocol;
#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
mod controller;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
mod player_cli;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
pub mod ui;

pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
pub use player::*;
pub use protocol::{ClientMessage, ProtocolError, ServerMessage, ShotVerdict};
pub use ship::{Orientation, ShipClass, Unit};
#[cfg(feature = "std")]
pub use client::ProtocolClient;
#[cfg(feature = "std")]
pub use controller::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, level_from, LOG_ENV};
#[cfg(feature = "std")]
pub use player_cli::*;
#[cfg(feature = "std")]
pub use server::{run_session, Admission, AdmissionDecision, AdmissionGuard, GameServer};
#[cfg(feature = "std")]
pub use session::{Session, SessionPhase, HUMAN};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, LineTransport};
