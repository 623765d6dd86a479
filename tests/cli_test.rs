#![cfg(feature = "std")]

use std::io::Cursor;

use log::LevelFilter;
use rand::{rngs::SmallRng, SeedableRng};
use seabattle::{
    level_from, parse_coord, ui, Board, BoardView, ConsoleShooter, Coord, MatchEvent,
    Orientation, Phase, ShipClass, ShotSource, Side, Table, Unit,
};

fn sample_board() -> Board {
    let mut board = Board::new();
    board
        .place(Unit::new(ShipClass::TwoDeck, Coord::new(1, 1), Orientation::Horizontal).unwrap())
        .unwrap();
    board.shoot(Coord::new(1, 1)).unwrap();
    board.shoot(Coord::new(5, 5)).unwrap();
    board
}

#[test]
fn parse_coord_accepts_row_col() {
    assert_eq!(parse_coord("3 4"), Some(Coord::new(3, 4)));
    assert_eq!(parse_coord("  0   9 "), Some(Coord::new(0, 9)));
    assert_eq!(parse_coord("10 1"), None);
    assert_eq!(parse_coord("A5"), None);
    assert_eq!(parse_coord("1 2 3"), None);
}

#[test]
fn console_shooter_skips_bad_input() {
    let board = sample_board();
    let view = BoardView::new(&board);
    let mut rng = SmallRng::seed_from_u64(1);
    let input = Cursor::new("nonsense\n1 1\n7 8\n");
    let mut shooter = ConsoleShooter::new(input);
    assert_eq!(shooter.next_shot(&view, &mut rng), Some(Coord::new(7, 8)));
    // input exhausted
    assert_eq!(shooter.next_shot(&view, &mut rng), None);
}

#[test]
fn console_shooter_empty_line_takes_suggestion() {
    let board = sample_board();
    let view = BoardView::new(&board);
    let mut rng = SmallRng::seed_from_u64(2);
    let mut shooter = ConsoleShooter::new(Cursor::new("\n"));
    let shot = shooter.next_shot(&view, &mut rng).unwrap();
    assert!(!view.cell(shot).is_shot());
}

#[test]
fn hotseat_players_alternate_on_console_input() {
    let mut first_fleet = Board::new();
    first_fleet
        .place(Unit::new(ShipClass::OneDeck, Coord::new(9, 9), Orientation::Horizontal).unwrap())
        .unwrap();
    let mut second_fleet = Board::new();
    second_fleet
        .place(Unit::new(ShipClass::TwoDeck, Coord::new(0, 0), Orientation::Vertical).unwrap())
        .unwrap();

    let (mut table, mut events) = Table::new(SmallRng::seed_from_u64(3));
    assert!(table.start_with_boards([first_fleet, second_fleet]));

    // side 0 misses, side 1 misses, side 0 sinks the 2-deck
    let mut first = ConsoleShooter::new(Cursor::new("5 5\n0 0\n1 0\n"));
    let mut second = ConsoleShooter::new(Cursor::new("oops\n0 0\n"));
    let mut turns = Vec::new();
    while table.engine().phase() == Phase::InProgress {
        let side = table.engine().current_turn();
        turns.push(side);
        let source: &mut dyn ShotSource = match side {
            Side::First => &mut first,
            Side::Second => &mut second,
        };
        assert!(table.play_turn(source));
    }

    assert_eq!(turns, [Side::First, Side::Second, Side::First, Side::First]);
    assert_eq!(table.engine().winner(), Some(Side::First));
    let summary = table.summary();
    assert_eq!(summary.shots, [3, 1]);
    assert_eq!(summary.hits, [2, 0]);

    let mut game_over = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let MatchEvent::GameOver(winner) = event {
            game_over.push(winner);
        }
    }
    assert_eq!(game_over, [Side::First]);
}

#[test]
fn render_view_hides_ships() {
    let board = sample_board();
    let hidden = ui::render_view(&BoardView::new(&board));
    let shown = ui::render_board(&board);

    assert!(!hidden.contains('S'));
    assert!(shown.contains('S'));
    let row1: Vec<&str> = hidden.lines().nth(2).unwrap().split_whitespace().collect();
    assert_eq!(row1[..4], ["1", ".", "X", "."]);
    assert_eq!(hidden.lines().count(), 11);
}

#[test]
fn log_level_parsing() {
    assert_eq!(level_from(Some("debug")), LevelFilter::Debug);
    assert_eq!(level_from(Some("OFF")), LevelFilter::Off);
    assert_eq!(level_from(Some("loud")), LevelFilter::Info);
    assert_eq!(level_from(None), LevelFilter::Info);
}
