#![cfg(feature = "std")]

use std::string::ToString;
use std::vec::Vec;

use rand::{rngs::SmallRng, Rng};
use tokio::net::ToSocketAddrs;

use crate::{
    common::{Coord, Side},
    protocol::{ClientMessage, ServerMessage, ShotVerdict},
    transport::{tcp::TcpTransport, LineTransport},
};

/// Client side of the line protocol.
pub struct ProtocolClient<T> {
    transport: T,
    side: Option<Side>,
}

impl ProtocolClient<TcpTransport> {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        Ok(Self::new(TcpTransport::connect(addr).await?))
    }
}

impl<T: LineTransport> ProtocolClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            side: None,
        }
    }

    /// Side assigned by the server, once joined.
    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub async fn send(&mut self, msg: &ClientMessage) -> anyhow::Result<()> {
        log::debug!("-> {}", msg);
        self.transport.send_line(&msg.to_string()).await
    }

    /// Next server message, or `None` when the server closed the connection.
    pub async fn next_message(&mut self) -> anyhow::Result<Option<ServerMessage>> {
        let Some(line) = self.transport.recv_line().await? else {
            return Ok(None);
        };
        log::debug!("<- {}", line);
        let msg = line
            .parse::<ServerMessage>()
            .map_err(|e| anyhow::anyhow!("bad server line {:?}: {}", line, e))?;
        Ok(Some(msg))
    }

    async fn expect_message(&mut self) -> anyhow::Result<ServerMessage> {
        self.next_message()
            .await?
            .ok_or_else(|| anyhow::anyhow!("server closed the connection"))
    }

    /// Join under `name`; returns the side the server assigned.
    pub async fn join(&mut self, name: &str) -> anyhow::Result<Side> {
        self.send(&ClientMessage::JoinGame {
            name: name.to_string(),
        })
        .await?;
        match self.expect_message().await? {
            ServerMessage::GameStarted { player } => {
                self.side = Some(player);
                Ok(player)
            }
            ServerMessage::Error(text) => Err(anyhow::anyhow!("join refused: {}", text)),
            other => Err(anyhow::anyhow!("expected GAME_STARTED, got {}", other)),
        }
    }

    /// Declare readiness and wait for the first `YOUR_TURN`.
    pub async fn ready(&mut self) -> anyhow::Result<()> {
        self.send(&ClientMessage::Ready).await?;
        match self.expect_message().await? {
            ServerMessage::YourTurn => Ok(()),
            ServerMessage::Error(text) => Err(anyhow::anyhow!("ready refused: {}", text)),
            other => Err(anyhow::anyhow!("expected YOUR_TURN, got {}", other)),
        }
    }

    pub async fn shoot(&mut self, row: i64, col: i64) -> anyhow::Result<()> {
        self.send(&ClientMessage::Shoot { row, col }).await
    }

    pub async fn quit(&mut self) -> anyhow::Result<()> {
        self.send(&ClientMessage::Quit).await
    }

    /// Play the rest of the match with random shots, starting on our turn.
    /// Returns the winner.
    pub async fn play_random(&mut self, rng: &mut SmallRng) -> anyhow::Result<Side> {
        let mut open: Vec<Coord> = Coord::all().collect();
        loop {
            if open.is_empty() {
                return Err(anyhow::anyhow!("no cells left to shoot"));
            }
            let target = open.swap_remove(rng.random_range(0..open.len()));
            self.shoot(target.row() as i64, target.col() as i64).await?;

            // read until the turn comes back or the match ends
            loop {
                match self.expect_message().await? {
                    ServerMessage::ShootResult { result, .. } => {
                        if result == ShotVerdict::Invalid {
                            log::warn!("server refused shot at {}", target);
                            break;
                        }
                    }
                    ServerMessage::OpponentShot { .. } => {}
                    ServerMessage::YourTurn => break,
                    ServerMessage::GameOver { winner } => return Ok(winner),
                    ServerMessage::Error(text) => {
                        return Err(anyhow::anyhow!("server error: {}", text));
                    }
                    other @ ServerMessage::GameStarted { .. } => {
                        return Err(anyhow::anyhow!("unexpected {}", other));
                    }
                }
            }
        }
    }
}

/// Join, ready up and play a whole random game. Returns the winner.
pub async fn play_game<T: LineTransport>(
    client: &mut ProtocolClient<T>,
    name: &str,
    rng: &mut SmallRng,
) -> anyhow::Result<Side> {
    let side = client.join(name).await?;
    log::info!("joined as side {}", side);
    client.ready().await?;
    client.play_random(rng).await
}
