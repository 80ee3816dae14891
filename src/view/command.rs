//! Outbound commands and the user interactions that produce them.

use super::store::{GameId, GameMode};
use std::num::ParseIntError;
use thiserror::Error;

/// Which button on a game panel was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    Join,
    Rejoin,
    Watch,
}

impl GameAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Rejoin => "rejoin",
            Self::Watch => "watch",
        }
    }

    /// Command this action sends for a game.
    pub fn command(&self, game_id: GameId) -> Command {
        match self {
            Self::Join => Command::JoinGame { game_id },
            Self::Rejoin => Command::RejoinGame { game_id },
            Self::Watch => Command::WatchGame { game_id },
        }
    }
}

/// User input on the lobby panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Mode selector of the create-game form changed
    ModeSelected { mode: String },

    /// Create-game button pressed, with the raw form values
    CreateGameClicked { mode: String, max_players: String },

    /// Action button on a game panel pressed
    GameButtonClicked { game_id: GameId, action: GameAction },
}

/// Commands sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateGame { mode: GameMode, max_players: usize },
    JoinGame { game_id: GameId },
    RejoinGame { game_id: GameId },
    WatchGame { game_id: GameId },
}

impl Command {
    /// Numeric command code used on the wire.
    pub fn code(&self) -> u8 {
        match self {
            Self::CreateGame { .. } => 0,
            Self::JoinGame { .. } => 1,
            Self::RejoinGame { .. } => 2,
            Self::WatchGame { .. } => 3,
        }
    }

    /// Wire form: `[code, args...]`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::CreateGame { mode, max_players } => {
                serde_json::json!([self.code(), mode.code(), max_players])
            }
            Self::JoinGame { game_id }
            | Self::RejoinGame { game_id }
            | Self::WatchGame { game_id } => serde_json::json!([self.code(), game_id]),
        }
    }
}

/// Transport for outbound commands.
pub trait CommandSink {
    fn send(&mut self, command: Command);
}

impl CommandSink for Vec<Command> {
    fn send(&mut self, command: Command) {
        self.push(command);
    }
}

/// Interaction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("interactions are not bound yet")]
    Unbound,

    #[error("unknown game mode {0:?}")]
    UnknownMode(String),

    #[error("invalid max players {value:?}")]
    InvalidMaxPlayers {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("game {0} has no panel in the lobby")]
    UnknownPanel(GameId),

    #[error("{} button of game {game_id} is not clickable", .action.as_str())]
    ControlUnavailable { game_id: GameId, action: GameAction },
}

/// Build a create-game command from raw form values.
pub fn create_game(mode: &str, max_players: &str) -> Result<Command, CommandError> {
    let mode =
        GameMode::from_name(mode).ok_or_else(|| CommandError::UnknownMode(mode.to_string()))?;
    let max_players = max_players
        .trim()
        .parse::<usize>()
        .map_err(|source| CommandError::InvalidMaxPlayers {
            value: max_players.to_string(),
            source,
        })?;
    Ok(Command::CreateGame { mode, max_players })
}
