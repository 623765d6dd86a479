use crate::ship::ShipClass;

pub const BOARD_SIZE: u8 = 10;
pub const BOARD_CELLS: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;

pub const FLEET_SIZE: usize = 10;
/// Classic fleet, largest first: one 4-deck, two 3-deck, three 2-deck, four 1-deck.
pub const FLEET: [ShipClass; FLEET_SIZE] = [
    ShipClass::FourDeck,
    ShipClass::ThreeDeck,
    ShipClass::ThreeDeck,
    ShipClass::TwoDeck,
    ShipClass::TwoDeck,
    ShipClass::TwoDeck,
    ShipClass::OneDeck,
    ShipClass::OneDeck,
    ShipClass::OneDeck,
    ShipClass::OneDeck,
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_FLEET_CELLS: usize = 4 + 3 * 2 + 2 * 3 + 4;

/// Random origins tried per unit before the board is given up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Fresh boards tried by [`crate::MatchEngine::start`] before reporting failure.
pub const MAX_BOARD_ATTEMPTS: usize = 32;

pub const DEFAULT_PORT: u16 = 8080;

/// Longest accepted protocol line, excluding the newline.
pub const MAX_LINE_LEN: usize = 1024;

/// How many units of `class` a complete fleet contains.
pub fn fleet_quota(class: ShipClass) -> usize {
    FLEET.iter().filter(|&&c| c == class).count()
}

#[cfg(feature = "std")]
pub use server_config::ServerConfig;

#[cfg(feature = "std")]
mod server_config {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::{DEFAULT_PORT, MAX_LINE_LEN};

    /// Runtime settings for the standalone server.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
        /// Fixed RNG seed; session `n` is seeded with `seed + n`.
        pub seed: Option<u64>,
        pub max_line_len: usize,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
                seed: None,
                max_line_len: MAX_LINE_LEN,
            }
        }
    }

    impl ServerConfig {
        pub fn bind_addr(&self) -> String {
            format!("{}:{}", self.host, self.port)
        }

        /// RNG for the `session`-th session accepted by the server.
        pub fn session_rng(&self, session: u64) -> SmallRng {
            match self.seed {
                Some(s) => SmallRng::seed_from_u64(s.wrapping_add(session)),
                None => {
                    let mut seed_rng = rand::rng();
                    SmallRng::from_rng(&mut seed_rng)
                }
            }
        }
    }
}
