//! Read-only access to the shared view-data store.
//!
//! The store holds the canonical client and game records. It is populated
//! elsewhere; the lobby view only reads it while reconciling.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

/// Server-assigned client ID.
pub type ClientId = u32;

/// Server-assigned game ID.
pub type GameId = u32;

/// Lifecycle state of a game as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Accepting players
    Starting,
    /// All seats taken, waiting for the host to begin
    StartingFull,
    /// Being played
    InProgress,
    /// Finished
    Completed,
}

impl GameState {
    /// Only a starting game can be joined, and it keeps every seat visible.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Starting)
    }
}

/// Game mode chosen at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Singles,
    Teams,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singles => "Singles",
            Self::Teams => "Teams",
        }
    }

    /// Look up a mode by its selector value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Singles" => Some(Self::Singles),
            "Teams" => Some(Self::Teams),
            _ => None,
        }
    }

    /// Numeric code used on the wire.
    pub fn code(&self) -> u8 {
        match self {
            Self::Singles => 0,
            Self::Teams => 1,
        }
    }
}

impl Default for GameMode {
    fn default() -> Self {
        Self::Singles
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile of a connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub username: String,
    pub ip_address: String,
}

impl ClientProfile {
    pub fn new(username: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ip_address: ip_address.into(),
        }
    }

    /// Tooltip text, e.g. `ann (1.2.3.4)`.
    pub fn title(&self) -> String {
        format!("{} ({})", self.username, self.ip_address)
    }
}

/// A seat in a game's score sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDatum {
    pub username: String,

    /// Client currently playing this seat, if connected
    #[serde(default)]
    pub client_id: Option<ClientId>,
}

/// Canonical record of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub state: GameState,

    #[serde(default)]
    pub mode: GameMode,

    /// Seats declared so far
    pub number_of_players: usize,

    /// Seat capacity
    pub max_players: usize,

    /// Seats by player index
    #[serde(default)]
    pub player_data: BTreeMap<usize, PlayerDatum>,
}

impl GameRecord {
    /// Human-readable state label shown on the game panel.
    pub fn state_text(&self) -> String {
        let state = match self.state {
            GameState::Starting => {
                format!("Starting ({}/{})", self.number_of_players, self.max_players)
            }
            GameState::StartingFull => "Starting (full)".to_string(),
            GameState::InProgress => "In Progress".to_string(),
            GameState::Completed => "Completed".to_string(),
        };
        format!("{}, {}", self.mode, state)
    }

    /// Check if a username holds any seat in this game.
    pub fn has_username(&self, username: &str) -> bool {
        self.player_data.values().any(|p| p.username == username)
    }

    /// Seats above the declared player count.
    pub fn unused_slots(&self) -> usize {
        self.max_players.saturating_sub(self.number_of_players)
    }
}

/// Lookup failures while reconciling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("client {0} is not in the view-data store")]
    UnknownClient(ClientId),

    #[error("game {0} is not in the view-data store")]
    UnknownGame(GameId),

    #[error("game {0} has no panel in the lobby")]
    MissingPanel(GameId),
}

/// Read-only view of the canonical client and game records.
pub trait ViewDataStore {
    /// The client this session is logged in as, once assigned.
    fn local_client_id(&self) -> Option<ClientId>;

    fn client(&self, client_id: ClientId) -> Option<&ClientProfile>;

    fn game(&self, game_id: GameId) -> Option<&GameRecord>;
}

/// Look up a client, failing on an unknown ID.
pub fn require_client(
    store: &dyn ViewDataStore,
    client_id: ClientId,
) -> Result<&ClientProfile, ViewError> {
    store
        .client(client_id)
        .ok_or(ViewError::UnknownClient(client_id))
}

/// Look up a game, failing on an unknown ID.
pub fn require_game(store: &dyn ViewDataStore, game_id: GameId) -> Result<&GameRecord, ViewError> {
    store.game(game_id).ok_or(ViewError::UnknownGame(game_id))
}

/// In-memory store.
///
/// Deserializes from JSON with string map keys:
///
/// ```json
/// {
///   "local_client_id": 1,
///   "clients": { "1": { "username": "ann", "ip_address": "1.2.3.4" } },
///   "games": { "42": { "state": "Starting", "number_of_players": 1, "max_players": 4 } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewData {
    #[serde(default)]
    pub local_client_id: Option<ClientId>,

    #[serde(default)]
    pub clients: HashMap<ClientId, ClientProfile>,

    #[serde(default)]
    pub games: BTreeMap<GameId, GameRecord>,
}

impl ViewData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl ViewDataStore for ViewData {
    fn local_client_id(&self) -> Option<ClientId> {
        self.local_client_id
    }

    fn client(&self, client_id: ClientId) -> Option<&ClientProfile> {
        self.clients.get(&client_id)
    }

    fn game(&self, game_id: GameId) -> Option<&GameRecord> {
        self.games.get(&game_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ViewData {
        ViewData::from_json(serde_json::json!({
            "local_client_id": 1,
            "clients": {
                "1": {"username": "ann", "ip_address": "1.2.3.4"},
                "2": {"username": "bob", "ip_address": "5.6.7.8"}
            },
            "games": {
                "42": {
                    "state": "Starting",
                    "number_of_players": 1,
                    "max_players": 4,
                    "player_data": {"0": {"username": "bob", "client_id": 2}}
                },
                "43": {
                    "state": "InProgress",
                    "mode": "Teams",
                    "number_of_players": 4,
                    "max_players": 4
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_store_from_json() {
        let store = sample();
        assert_eq!(store.local_client_id(), Some(1));
        assert_eq!(store.client(1).unwrap().title(), "ann (1.2.3.4)");
        assert!(store.client(3).is_none());

        let game = store.game(42).unwrap();
        assert_eq!(game.mode, GameMode::Singles);
        assert_eq!(game.player_data[&0].client_id, Some(2));
        assert!(game.has_username("bob"));
        assert!(!game.has_username("ann"));
        assert_eq!(game.unused_slots(), 3);
    }

    #[test]
    fn test_require_lookups() {
        let store = sample();
        assert!(require_game(&store, 43).is_ok());
        assert_eq!(
            require_game(&store, 7).unwrap_err(),
            ViewError::UnknownGame(7)
        );
        assert_eq!(
            require_client(&store, 9).unwrap_err(),
            ViewError::UnknownClient(9)
        );
    }

    #[test]
    fn test_state_text() {
        let store = sample();
        assert_eq!(store.game(42).unwrap().state_text(), "Singles, Starting (1/4)");
        assert_eq!(store.game(43).unwrap().state_text(), "Teams, In Progress");
    }

    #[test]
    fn test_game_mode_names() {
        assert_eq!(GameMode::from_name("Teams"), Some(GameMode::Teams));
        assert_eq!(GameMode::from_name("teams"), None);
        assert_eq!(GameMode::Teams.code(), 1);
        assert!(GameState::Starting.is_joinable());
        assert!(!GameState::StartingFull.is_joinable());
    }
}
