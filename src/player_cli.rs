#![cfg(feature = "std")]

use std::io::{self, BufRead, Write};
use std::string::String;

use rand::rngs::SmallRng;

use crate::{
    board::BoardView,
    common::Coord,
    player::{RandomShooter, ShotSource},
};

/// Reads shots as `row col` lines. An empty line takes the suggested random cell.
pub struct ConsoleShooter<R> {
    input: R,
}

impl ConsoleShooter<io::BufReader<io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send> ConsoleShooter<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

/// Parse `row col` (zero-based, whitespace separated) into an in-range coordinate.
pub fn parse_coord(input: &str) -> Option<Coord> {
    let mut parts = input.split_whitespace();
    let row: i64 = parts.next()?.parse().ok()?;
    let col: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Coord::try_new(row, col).ok()
}

impl<R: BufRead + Send> ShotSource for ConsoleShooter<R> {
    fn next_shot(&mut self, target: &BoardView<'_>, rng: &mut SmallRng) -> Option<Coord> {
        let suggestion = RandomShooter.next_shot(target, rng)?;
        loop {
            std::print!("Enter shot as 'row col' [{} {}]: ", suggestion.row(), suggestion.col());
            let _ = io::stdout().flush();
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            let line = line.trim();
            if line.is_empty() {
                return Some(suggestion);
            }
            match parse_coord(line) {
                Some(coord) if !target.cell(coord).is_shot() => return Some(coord),
                Some(coord) => std::println!("Cell {} was already shot", coord),
                None => std::println!("Invalid coordinate"),
            }
        }
    }
}
