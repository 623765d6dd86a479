#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use seabattle::{
    client::play_game, init_logging, ui::print_player_view, ConsoleShooter, GameServer,
    MatchEvent, Phase, ProtocolClient, RandomShooter, ServerConfig, ShotSource, Side, Table,
    DEFAULT_PORT,
};

#[cfg(feature = "std")]
use std::future::Future;

#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Run the game server; one match at a time against a random-shot opponent.
    Serve {
        #[arg(default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Connect to a server and play a whole match with random shots.
    Client {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value = "Player")]
        name: String,
    },
    /// Play in this terminal: against a random-shot opponent, or two players taking turns.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Let a random shooter play side 0 as well")]
        auto: bool,
        #[arg(long, conflicts_with = "auto", help = "Two players share this terminal")]
        hotseat: bool,
    },
}

#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocalMode {
    /// Console player against the random shooter.
    Solo,
    Auto,
    Hotseat,
}

#[cfg(feature = "std")]
impl LocalMode {
    fn from_flags(auto: bool, hotseat: bool) -> Self {
        match (auto, hotseat) {
            (true, _) => LocalMode::Auto,
            (false, true) => LocalMode::Hotseat,
            (false, false) => LocalMode::Solo,
        }
    }

    fn at_console(self, side: Side) -> bool {
        match self {
            LocalMode::Solo => side == Side::First,
            LocalMode::Auto => false,
            LocalMode::Hotseat => true,
        }
    }
}

/// Resolves on ctrl-c, or on SIGTERM where there is one. The SIGTERM handler
/// is in place as soon as this returns.
#[cfg(feature = "std")]
fn shutdown_signal() -> anyhow::Result<impl Future<Output = ()>> {
    #[cfg(unix)]
    let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    Ok(async move {
        #[cfg(unix)]
        tokio::select! {
            _ = tokio::signal::ctrl_c() => log::info!("interrupted"),
            _ = term.recv() => log::info!("terminated"),
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("interrupted");
        }
    })
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => {
            println!("Using fixed seed: {} (game will be reproducible)", s);
            SmallRng::seed_from_u64(s)
        }
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, seed } => {
            let config = ServerConfig {
                host,
                port,
                seed,
                ..ServerConfig::default()
            };
            let shutdown = shutdown_signal()?;
            let server = GameServer::bind(config).await?;
            println!("Serving on {}", server.local_addr()?);
            server.run_until(shutdown).await?;
        }
        Commands::Client {
            connect,
            seed,
            name,
        } => {
            println!("Connecting to {}...", connect);
            let mut rng = make_rng(seed);
            let mut client = ProtocolClient::connect(&connect).await?;
            let winner = play_game(&mut client, &name, &mut rng).await?;
            if Some(winner) == client.side() {
                println!("You won!");
            } else {
                println!("You lost. Side {} won.", winner);
            }
        }
        Commands::Local {
            seed,
            auto,
            hotseat,
        } => run_local(make_rng(seed), LocalMode::from_flags(auto, hotseat))?,
    }
    Ok(())
}

#[cfg(feature = "std")]
fn run_local(rng: SmallRng, mode: LocalMode) -> anyhow::Result<()> {
    let (mut table, mut events) = Table::new(rng);
    if !table.start_match() {
        return Err(anyhow::anyhow!("could not deal the fleets"));
    }

    // hotseat players share one reader so neither buffers the other's input
    let mut console = ConsoleShooter::stdin();
    let mut bot = RandomShooter;

    while table.engine().phase() == Phase::InProgress {
        let side = table.engine().current_turn();
        let source: &mut dyn ShotSource = if mode.at_console(side) {
            if mode == LocalMode::Hotseat {
                println!("\n=== Side {} to shoot ===", side);
            }
            print_player_view(table.engine(), side);
            &mut console
        } else {
            &mut bot
        };
        let played = table.play_turn(source);

        while let Ok(event) = events.try_recv() {
            match event {
                MatchEvent::CellUpdated { side, coord, state } => {
                    println!("side {} board: {} -> {:?}", side, coord, state);
                }
                MatchEvent::TurnSwitched(next) => println!("side {} to move", next),
                MatchEvent::GameOver(winner) => println!("Game over: side {} wins", winner),
                MatchEvent::ErrorRaised(text) => eprintln!("Error: {}", text),
            }
        }
        if !played {
            break;
        }
    }

    if mode != LocalMode::Hotseat {
        print_player_view(table.engine(), Side::First);
    }
    println!("{}", serde_json::to_string(&table.summary())?);
    Ok(())
}
