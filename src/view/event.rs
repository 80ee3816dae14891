//! Inbound lobby events.

use super::effects::NodeKey;
use super::page::Page;
use super::store::{ClientId, GameId};
use serde::{Deserialize, Serialize};

/// Everything the lobby view reacts to.
///
/// Serialized externally tagged, e.g. `{"SetGameState":{"game_id":42}}` or
/// `"Disconnect"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LobbyEvent {
    SetPage(Page),
    AddLobbyClient {
        client_id: ClientId,
    },
    RemoveLobbyClient {
        client_id: ClientId,
    },
    SetGameState {
        game_id: GameId,
    },
    SetGamePlayerData {
        game_id: GameId,
        player_id: usize,
        username: String,
        client_id: Option<ClientId>,
    },
    AddGameWatcher {
        game_id: GameId,
        client_id: ClientId,
    },
    RemoveGameWatcher {
        game_id: GameId,
        client_id: ClientId,
    },
    DestroyGame {
        game_id: GameId,
    },
    /// Initial replay finished
    MessageProcessingComplete,
    /// Connection lost; the next session starts from scratch
    Disconnect,
    InitializationComplete,
    /// An exit animation requested through the effects finished
    AnimationFinished(NodeKey),
}

impl LobbyEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPage(_) => "SetPage",
            Self::AddLobbyClient { .. } => "AddLobbyClient",
            Self::RemoveLobbyClient { .. } => "RemoveLobbyClient",
            Self::SetGameState { .. } => "SetGameState",
            Self::SetGamePlayerData { .. } => "SetGamePlayerData",
            Self::AddGameWatcher { .. } => "AddGameWatcher",
            Self::RemoveGameWatcher { .. } => "RemoveGameWatcher",
            Self::DestroyGame { .. } => "DestroyGame",
            Self::MessageProcessingComplete => "MessageProcessingComplete",
            Self::Disconnect => "Disconnect",
            Self::InitializationComplete => "InitializationComplete",
            Self::AnimationFinished(_) => "AnimationFinished",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_events() {
        let event: LobbyEvent =
            serde_json::from_str(r#"{"SetGameState":{"game_id":42}}"#).unwrap();
        assert_eq!(event, LobbyEvent::SetGameState { game_id: 42 });

        let event: LobbyEvent = serde_json::from_str(
            r#"{"SetGamePlayerData":{"game_id":1,"player_id":2,"username":"ann","client_id":null}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            LobbyEvent::SetGamePlayerData {
                game_id: 1,
                player_id: 2,
                username: "ann".to_string(),
                client_id: None,
            }
        );

        let event: LobbyEvent = serde_json::from_str(r#"{"SetPage":"lobby"}"#).unwrap();
        assert_eq!(event.name(), "SetPage");

        let event: LobbyEvent = serde_json::from_str(r#""Disconnect""#).unwrap();
        assert_eq!(event, LobbyEvent::Disconnect);

        let event: LobbyEvent =
            serde_json::from_str(r#"{"AnimationFinished":{"PlayerSlot":[3,1]}}"#).unwrap();
        assert_eq!(event, LobbyEvent::AnimationFinished(NodeKey::PlayerSlot(3, 1)));
    }
}
