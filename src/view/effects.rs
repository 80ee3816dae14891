//! Visual effects capability.
//!
//! Rendering and animation live outside this crate. The reconciler only asks
//! for enter/exit animations and repositioning through [`VisualEffects`], and
//! learns that an exit animation finished through
//! [`LobbyEvent::AnimationFinished`](super::LobbyEvent::AnimationFinished).

use super::page::PageRect;
use super::store::{ClientId, GameId};
use std::fmt;
use std::time::Duration;

/// Identity of an animatable node in the lobby view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeKey {
    LobbyClient(ClientId),
    GamePanel(GameId),
    PlayerSlot(GameId, usize),
    Watcher(GameId, ClientId),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LobbyClient(client_id) => write!(f, "client-{}", client_id),
            Self::GamePanel(game_id) => write!(f, "lobby-game-{}", game_id),
            Self::PlayerSlot(game_id, player_id) => {
                write!(f, "lobby-game-{}/player-{}", game_id, player_id)
            }
            Self::Watcher(game_id, client_id) => {
                write!(f, "lobby-game-{}/client-{}", game_id, client_id)
            }
        }
    }
}

/// Animation and layout primitives provided by the renderer.
pub trait VisualEffects {
    /// Animate a freshly inserted node into view.
    fn animate_in(&mut self, key: NodeKey, duration: Duration);

    /// Animate a node out of view. The renderer reports completion with
    /// `AnimationFinished(key)`.
    fn animate_out(&mut self, key: NodeKey, duration: Duration);

    /// Stop a pending exit animation; the node stays.
    fn cancel(&mut self, key: NodeKey);

    /// Move the lobby panel.
    fn reposition(&mut self, rect: PageRect);
}

/// Headless effects that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEffects;

impl VisualEffects for NoEffects {
    fn animate_in(&mut self, _key: NodeKey, _duration: Duration) {}

    fn animate_out(&mut self, _key: NodeKey, _duration: Duration) {}

    fn cancel(&mut self, _key: NodeKey) {}

    fn reposition(&mut self, _rect: PageRect) {}
}

/// A single recorded effect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    In(NodeKey, Duration),
    Out(NodeKey, Duration),
    Cancel(NodeKey),
    Reposition(PageRect),
}

/// Effects that record every request, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct EffectLog {
    effects: Vec<Effect>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Take all recorded effects, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl VisualEffects for EffectLog {
    fn animate_in(&mut self, key: NodeKey, duration: Duration) {
        self.effects.push(Effect::In(key, duration));
    }

    fn animate_out(&mut self, key: NodeKey, duration: Duration) {
        self.effects.push(Effect::Out(key, duration));
    }

    fn cancel(&mut self, key: NodeKey) {
        self.effects.push(Effect::Cancel(key));
    }

    fn reposition(&mut self, rect: PageRect) {
        self.effects.push(Effect::Reposition(rect));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_log_drain() {
        let mut log = EffectLog::new();
        log.animate_in(NodeKey::LobbyClient(1), Duration::from_millis(250));
        log.cancel(NodeKey::GamePanel(2));

        assert_eq!(log.effects().len(), 2);
        let drained = log.drain();
        assert_eq!(drained[1], Effect::Cancel(NodeKey::GamePanel(2)));
        assert!(log.is_empty());
    }

    #[test]
    fn test_node_key_display() {
        assert_eq!(NodeKey::GamePanel(42).to_string(), "lobby-game-42");
        assert_eq!(
            NodeKey::PlayerSlot(42, 3).to_string(),
            "lobby-game-42/player-3"
        );
    }
}
