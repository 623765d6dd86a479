#![cfg(feature = "std")]

use std::fmt::Write;
use std::string::String;

use crate::{
    board::{Board, BoardView},
    common::{CellState, Coord, Side},
    config::BOARD_SIZE,
    game::MatchEngine,
};

fn cell_char(state: CellState) -> char {
    match state {
        CellState::Empty => '.',
        CellState::ShipPresent => 'S',
        CellState::Miss => 'o',
        CellState::Hit => 'X',
        CellState::Destroyed => '#',
    }
}

fn render_grid(mut cell: impl FnMut(Coord) -> CellState) -> String {
    let n = BOARD_SIZE as usize;
    let mut out = String::from("   ");
    for c in 0..n {
        let _ = write!(out, " {}", c);
    }
    out.push('\n');
    for r in 0..n {
        let _ = write!(out, "{:2} ", r);
        for c in 0..n {
            let _ = write!(out, " {}", cell_char(cell(Coord::new(r, c))));
        }
        out.push('\n');
    }
    out
}

/// Render a board as its opponent sees it. Unhit ships stay hidden.
pub fn render_view(view: &BoardView<'_>) -> String {
    render_grid(|c| view.cell(c))
}

/// Render a board from its owner's side, ships included.
pub fn render_board(board: &Board) -> String {
    render_grid(|c| board.cell(c))
}

/// Display the opponent board (top) and `side`'s own board (bottom).
pub fn print_player_view(engine: &MatchEngine, side: Side) {
    std::println!("Opponent board:");
    std::print!("{}", render_view(&engine.board_view(side.opponent())));
    std::println!("\nYour board:");
    std::print!("{}", render_board(engine.board(side)));
}
