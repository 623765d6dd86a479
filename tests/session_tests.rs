#![cfg(feature = "std")]

use rand::{rngs::SmallRng, SeedableRng};
use seabattle::{
    Board, Coord, Orientation, Phase, ScriptedShooter, ServerMessage, Session, SessionPhase,
    ShipClass, ShotOutcome, ShotVerdict, Side, Unit,
};

fn board_with(units: &[(ShipClass, usize, usize, Orientation)]) -> Board {
    let mut board = Board::new();
    for &(class, r, c, o) in units {
        board.place(Unit::new(class, Coord::new(r, c), o).unwrap()).unwrap();
    }
    board
}

/// Client fleet: a 1-deck at (9, 9). Opponent fleet: a 2-deck at (2, 2)-(2, 3) and a 1-deck at (7, 7).
fn scripted_session(script: &[(usize, usize)]) -> Session {
    let human = board_with(&[(ShipClass::OneDeck, 9, 9, Orientation::Horizontal)]);
    let opponent = board_with(&[
        (ShipClass::TwoDeck, 2, 2, Orientation::Horizontal),
        (ShipClass::OneDeck, 7, 7, Orientation::Horizontal),
    ]);
    let shooter = ScriptedShooter::new(script.iter().map(|&(r, c)| Coord::new(r, c)));
    Session::with_opponent(SmallRng::seed_from_u64(1), Box::new(shooter)).with_boards([human, opponent])
}

fn started(script: &[(usize, usize)]) -> Session {
    let mut session = scripted_session(script);
    assert_eq!(
        session.handle_line("JOIN_GAME Alice"),
        vec![ServerMessage::GameStarted { player: Side::First }]
    );
    assert_eq!(session.handle_line("READY"), vec![ServerMessage::YourTurn]);
    session
}

fn shoot_result(row: i64, col: i64, result: ShotVerdict) -> ServerMessage {
    ServerMessage::ShootResult { row, col, result }
}

fn opponent_shot(row: i64, col: i64, result: ShotOutcome) -> ServerMessage {
    ServerMessage::OpponentShot { row, col, result }
}

#[test]
fn shoot_before_join_is_an_error() {
    let mut session = scripted_session(&[]);
    let out = session.handle_line("SHOOT 1 1");
    assert_eq!(out, vec![ServerMessage::error("join the game before shooting")]);
    assert_eq!(session.phase(), SessionPhase::AwaitingJoin);
}

#[test]
fn shoot_before_ready_names_the_missing_step() {
    let mut session = scripted_session(&[]);
    session.handle_line("JOIN_GAME Alice");
    let out = session.handle_line("SHOOT 1 1");
    assert_eq!(out, vec![ServerMessage::error("send READY before shooting")]);
    assert_eq!(session.phase(), SessionPhase::AwaitingReady);
    assert_eq!(session.engine().phase(), Phase::NotStarted);

    assert_eq!(session.handle_line("READY"), vec![ServerMessage::YourTurn]);
}

#[test]
fn join_records_name_once() {
    let mut session = scripted_session(&[]);
    let out = session.handle_line("JOIN_GAME Captain Nemo");
    assert_eq!(out, vec![ServerMessage::GameStarted { player: Side::First }]);
    assert_eq!(session.phase(), SessionPhase::AwaitingReady);
    assert_eq!(session.player_name(), Some("Captain Nemo"));

    let out = session.handle_line("JOIN_GAME Bob");
    assert_eq!(out, vec![ServerMessage::error("cannot join at this state")]);
    assert_eq!(session.player_name(), Some("Captain Nemo"));
}

#[test]
fn ready_requires_join() {
    let mut session = scripted_session(&[]);
    let out = session.handle_line("READY");
    assert_eq!(out, vec![ServerMessage::error("join the game before sending READY")]);
    assert_eq!(session.phase(), SessionPhase::AwaitingJoin);
    assert_eq!(session.engine().phase(), Phase::NotStarted);
}

#[test]
fn ready_starts_match_once() {
    let mut session = started(&[]);
    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert_eq!(session.engine().phase(), Phase::InProgress);
    let out = session.handle_line("READY");
    assert_eq!(out, vec![ServerMessage::error("cannot ready at this state")]);
}

#[test]
fn double_shot_is_invalid_without_turn_change() {
    let mut session = started(&[(0, 0)]);
    let out = session.handle_line("SHOOT 0 0");
    assert_eq!(
        out,
        vec![
            shoot_result(0, 0, ShotVerdict::Miss),
            opponent_shot(0, 0, ShotOutcome::Miss),
            ServerMessage::YourTurn,
        ]
    );

    let out = session.handle_line("SHOOT 0 0");
    assert_eq!(out, vec![shoot_result(0, 0, ShotVerdict::Invalid)]);
    assert_eq!(session.engine().current_turn(), Side::First);
    assert_eq!(session.phase(), SessionPhase::InProgress);
}

#[test]
fn hit_gives_the_turn_back() {
    let mut session = started(&[]);
    let out = session.handle_line("SHOOT 2 2");
    assert_eq!(
        out,
        vec![shoot_result(2, 2, ShotVerdict::Hit), ServerMessage::YourTurn]
    );
}

#[test]
fn out_of_range_shot_is_invalid() {
    let mut session = started(&[]);
    assert_eq!(
        session.handle_line("SHOOT 10 3"),
        vec![shoot_result(10, 3, ShotVerdict::Invalid)]
    );
    assert_eq!(
        session.handle_line("SHOOT -1 0"),
        vec![shoot_result(-1, 0, ShotVerdict::Invalid)]
    );
    assert_eq!(session.engine().current_turn(), Side::First);
}

#[test]
fn client_wins_by_destroying_everything() {
    let mut session = started(&[]);
    session.handle_line("SHOOT 2 2");
    assert_eq!(
        session.handle_line("SHOOT 2 3"),
        vec![shoot_result(2, 3, ShotVerdict::Destroyed), ServerMessage::YourTurn]
    );
    assert_eq!(
        session.handle_line("SHOOT 7 7"),
        vec![
            shoot_result(7, 7, ShotVerdict::Destroyed),
            ServerMessage::GameOver { winner: Side::First },
        ]
    );
    assert_eq!(session.phase(), SessionPhase::Finished);
    assert!(session.is_over());
    assert_eq!(
        session.handle_line("SHOOT 0 0"),
        vec![ServerMessage::error("game is not in progress")]
    );
}

#[test]
fn opponent_keeps_shooting_while_it_hits() {
    let mut session = started(&[(9, 9)]);
    let out = session.handle_line("SHOOT 0 0");
    assert_eq!(
        out,
        vec![
            shoot_result(0, 0, ShotVerdict::Miss),
            opponent_shot(9, 9, ShotOutcome::Destroyed),
            ServerMessage::GameOver { winner: Side::Second },
        ]
    );
    assert_eq!(session.phase(), SessionPhase::Finished);
}

#[test]
fn opponent_streak_ends_on_miss() {
    let human = board_with(&[
        (ShipClass::TwoDeck, 5, 5, Orientation::Horizontal),
        (ShipClass::OneDeck, 0, 0, Orientation::Horizontal),
    ]);
    let opponent = board_with(&[(ShipClass::OneDeck, 7, 7, Orientation::Horizontal)]);
    let shooter = ScriptedShooter::new([Coord::new(5, 5), Coord::new(1, 1)]);
    let mut session = Session::with_opponent(SmallRng::seed_from_u64(2), Box::new(shooter))
        .with_boards([human, opponent]);
    session.handle_line("JOIN_GAME Eve");
    session.handle_line("READY");

    let out = session.handle_line("SHOOT 3 3");
    assert_eq!(
        out,
        vec![
            shoot_result(3, 3, ShotVerdict::Miss),
            opponent_shot(5, 5, ShotOutcome::Hit),
            opponent_shot(1, 1, ShotOutcome::Miss),
            ServerMessage::YourTurn,
        ]
    );
}

#[test]
fn opponent_repeat_falls_back_to_open_cell() {
    let mut session = started(&[(0, 0), (0, 0)]);
    session.handle_line("SHOOT 0 0");
    let out = session.handle_line("SHOOT 0 1");
    assert_eq!(
        out,
        vec![
            shoot_result(0, 1, ShotVerdict::Miss),
            opponent_shot(0, 1, ShotOutcome::Miss),
            ServerMessage::YourTurn,
        ]
    );
}

#[test]
fn malformed_lines_get_one_error_each() {
    let mut session = started(&[]);
    for line in ["SHOOT a b", "SHOOT 1", "SHOOT 1 2 3", "DANCE", "", "YOUR_TURN", "JOIN_GAME"] {
        let out = session.handle_line(line);
        assert_eq!(out.len(), 1, "line {:?}", line);
        assert!(matches!(out[0], ServerMessage::Error(_)), "line {:?}", line);
    }
    assert_eq!(
        session.handle_line("SHOOT 99999999999999999999999 1").len(),
        1
    );
    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert_eq!(session.engine().current_turn(), Side::First);
}

#[test]
fn trailing_whitespace_is_tolerated() {
    let mut session = scripted_session(&[]);
    session.handle_line("JOIN_GAME Zed");
    assert_eq!(session.handle_line("READY  \r"), vec![ServerMessage::YourTurn]);
    assert_eq!(
        session.handle_line("SHOOT 2 2 \r"),
        vec![shoot_result(2, 2, ShotVerdict::Hit), ServerMessage::YourTurn]
    );
}

#[test]
fn quit_closes_from_any_state() {
    let mut session = scripted_session(&[]);
    assert!(session.handle_line("QUIT").is_empty());
    assert_eq!(session.phase(), SessionPhase::Closed);
    assert_eq!(
        session.handle_line("JOIN_GAME Late"),
        vec![ServerMessage::error("session is closed")]
    );

    let mut session = started(&[]);
    assert!(session.handle_line("QUIT").is_empty());
    assert!(session.is_over());
}

#[test]
fn random_session_plays_to_the_end() {
    let mut session = Session::new(SmallRng::seed_from_u64(42));
    session.handle_line("JOIN_GAME Bot");
    assert_eq!(session.handle_line("READY"), vec![ServerMessage::YourTurn]);

    let mut over = false;
    for target in Coord::all() {
        let line = format!("SHOOT {} {}", target.row(), target.col());
        let out = session.handle_line(&line);
        assert!(matches!(out[0], ServerMessage::ShootResult { .. }));
        if let Some(ServerMessage::GameOver { .. }) = out.last() {
            over = true;
            break;
        }
        assert_eq!(out.last(), Some(&ServerMessage::YourTurn));
    }
    assert!(over);
    assert_eq!(session.phase(), SessionPhase::Finished);
    assert!(session.engine().winner().is_some());
}
