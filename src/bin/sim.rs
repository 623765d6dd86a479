use rand::{rngs::SmallRng, SeedableRng};
use seabattle::{place_fleet, Phase, RandomShooter, Table, MAX_BOARD_ATTEMPTS};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    // seed1 lays out side 0 and drives the shots, seed2 lays out side 1
    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);
    let first = place_fleet(&mut rng1, MAX_BOARD_ATTEMPTS)?;
    let second = place_fleet(&mut rng2, MAX_BOARD_ATTEMPTS)?;

    let (mut table, _events) = Table::new(rng1);
    if !table.start_with_boards([first, second]) {
        return Err(anyhow::anyhow!("match did not start"));
    }
    let mut shooters = [RandomShooter, RandomShooter];
    while table.engine().phase() == Phase::InProgress {
        let side = table.engine().current_turn();
        if !table.play_turn(&mut shooters[side.index()]) {
            break;
        }
    }

    let summary = table.summary();
    let winner = summary.winner.map(|s| match s.index() {
        0 => "player1",
        _ => "player2",
    });
    let result = json!({
        "player1": {"shots": summary.shots[0], "hits": summary.hits[0]},
        "player2": {"shots": summary.shots[1], "hits": summary.hits[1]},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
