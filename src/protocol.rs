//! Line protocol spoken between a game server and its client.
//!
//! Every message is one line: `TYPE [args...]`, tokens separated by spaces.
//! Parsing tolerates surrounding whitespace and a trailing `\r`. `Display`
//! renders a message without its line terminator.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use crate::common::{ShotOutcome, Side};

/// Result reported for a shot on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotVerdict {
    Miss,
    Hit,
    Destroyed,
    /// Shot refused: out of range or already shot.
    Invalid,
}

impl ShotVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            ShotVerdict::Miss => "MISS",
            ShotVerdict::Hit => "HIT",
            ShotVerdict::Destroyed => "DESTROYED",
            ShotVerdict::Invalid => "INVALID",
        }
    }

    /// The accepted outcome, or `None` for `Invalid`.
    pub fn outcome(self) -> Option<ShotOutcome> {
        match self {
            ShotVerdict::Miss => Some(ShotOutcome::Miss),
            ShotVerdict::Hit => Some(ShotOutcome::Hit),
            ShotVerdict::Destroyed => Some(ShotOutcome::Destroyed),
            ShotVerdict::Invalid => None,
        }
    }
}

impl From<ShotOutcome> for ShotVerdict {
    fn from(outcome: ShotOutcome) -> Self {
        match outcome {
            ShotOutcome::Miss => ShotVerdict::Miss,
            ShotOutcome::Hit => ShotVerdict::Hit,
            ShotOutcome::Destroyed => ShotVerdict::Destroyed,
        }
    }
}

impl FromStr for ShotVerdict {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MISS" => Ok(ShotVerdict::Miss),
            "HIT" => Ok(ShotVerdict::Hit),
            "DESTROYED" => Ok(ShotVerdict::Destroyed),
            "INVALID" => Ok(ShotVerdict::Invalid),
            other => Err(ProtocolError::BadResult(other.to_string())),
        }
    }
}

impl fmt::Display for ShotVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a line could not be turned into a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,
    #[error("unknown message type '{0}'")]
    UnknownType(String),
    #[error("{0} is missing an argument")]
    MissingArgument(&'static str),
    #[error("{0} has too many arguments")]
    UnexpectedArgument(&'static str),
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' is not a shot result")]
    BadResult(String),
    #[error("'{0}' is not a player number")]
    BadPlayer(String),
    #[error("{0} cannot be sent in this direction")]
    WrongDirection(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    JoinGame,
    Ready,
    Shoot,
    Quit,
    GameStarted,
    YourTurn,
    ShootResult,
    OpponentShot,
    GameOver,
    Error,
}

impl Kind {
    fn parse(token: &str) -> Option<Kind> {
        Some(match token {
            "JOIN_GAME" => Kind::JoinGame,
            "READY" => Kind::Ready,
            "SHOOT" => Kind::Shoot,
            "QUIT" => Kind::Quit,
            "GAME_STARTED" => Kind::GameStarted,
            "YOUR_TURN" => Kind::YourTurn,
            "SHOOT_RESULT" => Kind::ShootResult,
            "OPPONENT_SHOT" => Kind::OpponentShot,
            "GAME_OVER" => Kind::GameOver,
            "ERROR" => Kind::Error,
            _ => return None,
        })
    }

    fn as_str(self) -> &'static str {
        match self {
            Kind::JoinGame => "JOIN_GAME",
            Kind::Ready => "READY",
            Kind::Shoot => "SHOOT",
            Kind::Quit => "QUIT",
            Kind::GameStarted => "GAME_STARTED",
            Kind::YourTurn => "YOUR_TURN",
            Kind::ShootResult => "SHOOT_RESULT",
            Kind::OpponentShot => "OPPONENT_SHOT",
            Kind::GameOver => "GAME_OVER",
            Kind::Error => "ERROR",
        }
    }
}

/// Splits a line into its type and the (trimmed) remainder.
fn split_line(line: &str) -> Result<(Kind, &str), ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (line, ""),
    };
    let kind = Kind::parse(head).ok_or_else(|| ProtocolError::UnknownType(head.to_string()))?;
    Ok((kind, rest))
}

/// Pulls exactly `N` tokens out of `rest`.
fn tokens<'a, const N: usize>(kind: Kind, rest: &'a str) -> Result<[&'a str; N], ProtocolError> {
    let mut parts = rest.split_whitespace();
    let mut out = [""; N];
    for slot in out.iter_mut() {
        *slot = parts.next().ok_or(ProtocolError::MissingArgument(kind.as_str()))?;
    }
    if parts.next().is_some() {
        return Err(ProtocolError::UnexpectedArgument(kind.as_str()));
    }
    Ok(out)
}

fn number(token: &str) -> Result<i64, ProtocolError> {
    token
        .parse()
        .map_err(|_| ProtocolError::NotANumber(token.to_string()))
}

fn player(token: &str) -> Result<Side, ProtocolError> {
    token
        .parse::<usize>()
        .ok()
        .and_then(Side::from_index)
        .ok_or_else(|| ProtocolError::BadPlayer(token.to_string()))
}

/// Client to server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Everything after the type token, so names may contain spaces.
    JoinGame { name: String },
    Ready,
    /// Coordinates are kept as sent; range checks belong to the session.
    Shoot { row: i64, col: i64 },
    Quit,
}

impl FromStr for ClientMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = split_line(line)?;
        match kind {
            Kind::JoinGame => {
                if rest.is_empty() {
                    return Err(ProtocolError::MissingArgument(kind.as_str()));
                }
                Ok(ClientMessage::JoinGame {
                    name: rest.to_string(),
                })
            }
            Kind::Ready => tokens::<0>(kind, rest).map(|_| ClientMessage::Ready),
            Kind::Quit => tokens::<0>(kind, rest).map(|_| ClientMessage::Quit),
            Kind::Shoot => {
                let [row, col] = tokens(kind, rest)?;
                Ok(ClientMessage::Shoot {
                    row: number(row)?,
                    col: number(col)?,
                })
            }
            other => Err(ProtocolError::WrongDirection(other.as_str())),
        }
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientMessage::JoinGame { name } => write!(f, "JOIN_GAME {}", name),
            ClientMessage::Ready => f.write_str("READY"),
            ClientMessage::Shoot { row, col } => write!(f, "SHOOT {} {}", row, col),
            ClientMessage::Quit => f.write_str("QUIT"),
        }
    }
}

/// Server to client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    GameStarted { player: Side },
    YourTurn,
    /// Echoes the coordinates the client sent, even when out of range.
    ShootResult { row: i64, col: i64, result: ShotVerdict },
    OpponentShot { row: i64, col: i64, result: ShotOutcome },
    GameOver { winner: Side },
    Error(String),
}

impl ServerMessage {
    pub fn error(text: impl ToString) -> Self {
        ServerMessage::Error(text.to_string())
    }
}

impl FromStr for ServerMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = split_line(line)?;
        match kind {
            Kind::GameStarted => {
                let [p] = tokens(kind, rest)?;
                Ok(ServerMessage::GameStarted { player: player(p)? })
            }
            Kind::YourTurn => tokens::<0>(kind, rest).map(|_| ServerMessage::YourTurn),
            Kind::ShootResult => {
                let [row, col, result] = tokens(kind, rest)?;
                Ok(ServerMessage::ShootResult {
                    row: number(row)?,
                    col: number(col)?,
                    result: result.parse()?,
                })
            }
            Kind::OpponentShot => {
                let [row, col, result] = tokens(kind, rest)?;
                let verdict: ShotVerdict = result.parse()?;
                let result = verdict
                    .outcome()
                    .ok_or_else(|| ProtocolError::BadResult(result.to_string()))?;
                Ok(ServerMessage::OpponentShot {
                    row: number(row)?,
                    col: number(col)?,
                    result,
                })
            }
            Kind::GameOver => {
                let [w] = tokens(kind, rest)?;
                Ok(ServerMessage::GameOver { winner: player(w)? })
            }
            Kind::Error => Ok(ServerMessage::Error(rest.to_string())),
            other => Err(ProtocolError::WrongDirection(other.as_str())),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::GameStarted { player } => write!(f, "GAME_STARTED {}", player),
            ServerMessage::YourTurn => f.write_str("YOUR_TURN"),
            ServerMessage::ShootResult { row, col, result } => {
                write!(f, "SHOOT_RESULT {} {} {}", row, col, result)
            }
            ServerMessage::OpponentShot { row, col, result } => {
                write!(f, "OPPONENT_SHOT {} {} {}", row, col, ShotVerdict::from(*result))
            }
            ServerMessage::GameOver { winner } => write!(f, "GAME_OVER {}", winner),
            ServerMessage::Error(text) => write!(f, "ERROR {}", text),
        }
    }
}
