//! Lobby view state.
//!
//! This module provides the view-side state of the lobby panel:
//!
//! - `page` - active page, per-page layout and visibility rules
//! - `store` - read-only access to canonical client and game records
//! - `tree` - the structured view model a renderer draws
//! - `effects` - animation capability supplied by the renderer
//! - `event` - inbound events
//! - `command` - user interactions and outbound commands
//! - `reconcile` - event handlers that keep the tree in step with the store
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  LobbyEvent   ┌──────────────────────────────────────┐
//! │  event bus   │──────────────▶│              LobbyView                │
//! └──────────────┘               │                                      │
//! ┌──────────────┐   read only   │  PageState   LobbyTree   Stage<E>    │
//! │ ViewDataStore│◀──────────────│  (page,      (clients,   (snapshot   │
//! └──────────────┘               │   rects)      panels)     latch, E)  │
//! ┌──────────────┐  Interaction  │                                      │
//! │    input     │──────────────▶│                                      │
//! └──────────────┘               └──────┬──────────────────────┬────────┘
//!                                       │ Command              │ animate_in/out
//!                                       ▼                      ▼
//!                                ┌──────────────┐      ┌──────────────┐
//!                                │ CommandSink  │      │VisualEffects │
//!                                └──────────────┘      └──────────────┘
//! ```
//!
//! # Snapshot and live mode
//!
//! A session starts in snapshot mode: the server replays every client and
//! game, and nodes are inserted and removed without animation. The first
//! `MessageProcessingComplete` prunes unused seats of every panel once and
//! switches to live mode, where inserts animate in and removals animate out
//! before leaving the tree. `Disconnect` clears the tree and re-arms snapshot
//! mode for the next session.

pub mod command;
pub mod config;
pub mod effects;
pub mod event;
pub mod page;
pub mod reconcile;
pub mod store;
pub mod tree;

pub use command::{create_game, Command, CommandError, CommandSink, GameAction, Interaction};
pub use config::{ViewConfig, DEFAULT_MILLIS_PER_LINE, DEFAULT_MISSING_ADDRESS};
pub use effects::{Effect, EffectLog, NoEffects, NodeKey, VisualEffects};
pub use event::LobbyEvent;
pub use page::{Page, PageRect, PageState, Visibility};
pub use store::{
    ClientId, ClientProfile, GameId, GameMode, GameRecord, GameState, PlayerDatum, ViewData,
    ViewDataStore, ViewError,
};
pub use tree::{
    ActionButton, ClientEntry, GameButtons, GamePanel, LobbyTree, PlayerSlot, Presence,
};

use reconcile::Stage;
use tracing::{debug, info, warn};

/// Lobby view for one client.
///
/// Owns all session state. Feed it events with [`LobbyView::handle`] and user
/// input with [`LobbyView::interact`]; read the result from
/// [`LobbyView::tree`].
#[derive(Debug)]
pub struct LobbyView<E: VisualEffects> {
    pages: PageState,
    tree: LobbyTree,
    stage: Stage<E>,
    interactions_bound: bool,
}

impl<E: VisualEffects> LobbyView<E> {
    pub fn new(effects: E) -> Self {
        Self::with_config(effects, ViewConfig::default())
    }

    pub fn with_config(effects: E, config: ViewConfig) -> Self {
        Self {
            pages: PageState::new(),
            tree: LobbyTree::new(),
            stage: Stage::new(effects, config),
            interactions_bound: false,
        }
    }

    /// The view model.
    pub fn tree(&self) -> &LobbyTree {
        &self.tree
    }

    pub fn current_page(&self) -> Option<Page> {
        self.pages.current()
    }

    pub fn show_on_game_page(&self) -> bool {
        self.pages.show_on_game_page()
    }

    /// Still replaying the initial snapshot.
    pub fn is_snapshot(&self) -> bool {
        self.stage.snapshot
    }

    pub fn interactions_bound(&self) -> bool {
        self.interactions_bound
    }

    pub fn config(&self) -> &ViewConfig {
        &self.stage.config
    }

    pub fn effects(&self) -> &E {
        &self.stage.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.stage.effects
    }

    /// Keep the lobby panel on the game page or not.
    pub fn set_show_on_game_page(&mut self, show: bool) {
        if let Some(page) = self.pages.set_show_on_game_page(show) {
            self.set_page(page);
        }
    }

    /// Register where the lobby panel sits on `page`.
    pub fn set_position_for_page(
        &mut self,
        page: Page,
        left: i32,
        top: i32,
        width: u32,
        height: u32,
    ) {
        self.pages
            .register_rect(page, PageRect::new(left, top, width, height));

        if self.pages.is_current(page) {
            self.reposition();
        }
    }

    /// Apply one event.
    pub fn handle(
        &mut self,
        store: &dyn ViewDataStore,
        event: LobbyEvent,
    ) -> Result<(), ViewError> {
        debug!(event = event.name(), "lobby event");

        match event {
            LobbyEvent::SetPage(page) => {
                self.set_page(page);
                Ok(())
            }
            LobbyEvent::AddLobbyClient { client_id } => self.add_lobby_client(store, client_id),
            LobbyEvent::RemoveLobbyClient { client_id } => {
                self.remove_lobby_client(client_id);
                Ok(())
            }
            LobbyEvent::SetGameState { game_id } => self.set_game_state(store, game_id),
            LobbyEvent::SetGamePlayerData {
                game_id,
                player_id,
                username,
                client_id,
            } => self.set_game_player_data(store, game_id, player_id, &username, client_id),
            LobbyEvent::AddGameWatcher { game_id, client_id } => {
                self.add_game_watcher(store, game_id, client_id)
            }
            LobbyEvent::RemoveGameWatcher { game_id, client_id } => {
                self.remove_game_watcher(game_id, client_id);
                Ok(())
            }
            LobbyEvent::DestroyGame { game_id } => self.destroy_game(game_id),
            LobbyEvent::MessageProcessingComplete => self.message_processing_complete(store),
            LobbyEvent::Disconnect => {
                self.reset();
                Ok(())
            }
            LobbyEvent::InitializationComplete => {
                self.bind_interactions();
                Ok(())
            }
            LobbyEvent::AnimationFinished(key) => {
                self.animation_finished(key);
                Ok(())
            }
        }
    }

    /// Turn user input into an outbound command.
    pub fn interact(
        &mut self,
        interaction: Interaction,
        sink: &mut impl CommandSink,
    ) -> Result<(), CommandError> {
        if !self.interactions_bound {
            return Err(CommandError::Unbound);
        }

        match interaction {
            Interaction::ModeSelected { mode } => match GameMode::from_name(&mode) {
                Some(GameMode::Singles) => self.tree.max_players_field_visible = true,
                Some(GameMode::Teams) => self.tree.max_players_field_visible = false,
                None => debug!(%mode, "ignoring unknown mode selection"),
            },
            Interaction::CreateGameClicked { mode, max_players } => {
                let command = create_game(&mode, &max_players)?;
                info!(?command, "create game");
                sink.send(command);
            }
            Interaction::GameButtonClicked { game_id, action } => {
                let panel = self
                    .tree
                    .panel(game_id)
                    .ok_or(CommandError::UnknownPanel(game_id))?;
                let button = match action {
                    GameAction::Join => panel.buttons.join,
                    GameAction::Rejoin => panel.buttons.rejoin,
                    GameAction::Watch => panel.buttons.watch,
                };
                if !panel.buttons_visible || !button.is_clickable() {
                    return Err(CommandError::ControlUnavailable { game_id, action });
                }

                info!(game_id, action = action.as_str(), "game action");
                sink.send(action.command(game_id));
            }
        }

        Ok(())
    }

    /// Switch pages and re-derive visibility and position.
    fn set_page(&mut self, page: Page) {
        let visibility = self.pages.set_page(page);

        self.tree.set_controls_visible(visibility.controls);
        self.tree.lobby_visible = visibility.lobby;

        if visibility.lobby {
            self.reposition();
        }
    }

    fn reposition(&mut self) {
        match self.pages.current_rect() {
            Some(rect) => {
                self.tree.position = Some(rect);
                self.stage.effects.reposition(rect);
            }
            None => debug!(page = ?self.pages.current(), "no position registered for page"),
        }
    }

    fn bind_interactions(&mut self) {
        if self.interactions_bound {
            warn!("interactions already bound");
            return;
        }
        self.interactions_bound = true;
        info!("lobby interactions bound");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view() -> LobbyView<EffectLog> {
        LobbyView::new(EffectLog::new())
    }

    fn bound_view_with_game() -> (LobbyView<EffectLog>, ViewData) {
        let store = ViewData::from_json(serde_json::json!({
            "local_client_id": 1,
            "clients": {"1": {"username": "ann", "ip_address": "1.2.3.4"}},
            "games": {"42": {"state": "Starting", "number_of_players": 1, "max_players": 4}}
        }))
        .unwrap();
        let mut view = view();
        view.handle(&store, LobbyEvent::InitializationComplete).unwrap();
        view.handle(&store, LobbyEvent::SetPage(Page::Lobby)).unwrap();
        view.handle(&store, LobbyEvent::SetGameState { game_id: 42 })
            .unwrap();
        (view, store)
    }

    #[test]
    fn test_visibility_follows_page_and_flag() {
        let store = ViewData::new();
        let mut view = view();

        view.handle(&store, LobbyEvent::SetPage(Page::Game)).unwrap();
        assert!(!view.tree().lobby_visible);
        assert!(!view.tree().controls_visible);

        view.set_show_on_game_page(true);
        assert!(view.tree().lobby_visible);
        assert!(!view.tree().controls_visible);

        view.handle(&store, LobbyEvent::SetPage(Page::Lobby)).unwrap();
        assert!(view.tree().lobby_visible);
        assert!(view.tree().controls_visible);

        view.set_show_on_game_page(false);
        assert!(view.tree().lobby_visible);

        view.handle(&store, LobbyEvent::SetPage(Page::Settings))
            .unwrap();
        assert!(!view.tree().lobby_visible);
        assert!(view.tree().controls_visible);
    }

    #[test]
    fn test_show_on_game_page_ignored_off_game_page() {
        let store = ViewData::new();
        let mut view = LobbyView::new(NoEffects);
        view.handle(&store, LobbyEvent::SetPage(Page::Login)).unwrap();

        view.set_show_on_game_page(true);
        assert!(view.show_on_game_page());
        assert!(!view.tree().lobby_visible);
        assert_eq!(view.current_page(), Some(Page::Login));
    }

    #[test]
    fn test_positioning() {
        let store = ViewData::new();
        let mut view = view();
        let lobby_rect = PageRect::new(10, 20, 300, 400);

        // Nothing registered yet: showing the lobby does not move it
        view.handle(&store, LobbyEvent::SetPage(Page::Lobby)).unwrap();
        assert_eq!(view.tree().position, None);
        assert!(view.effects().is_empty());

        view.set_position_for_page(Page::Lobby, 10, 20, 300, 400);
        assert_eq!(view.tree().position, Some(lobby_rect));

        // Registering another page does not move the panel
        view.set_position_for_page(Page::Game, 0, 0, 100, 100);
        assert_eq!(view.tree().position, Some(lobby_rect));

        view.set_show_on_game_page(true);
        view.handle(&store, LobbyEvent::SetPage(Page::Game)).unwrap();
        assert_eq!(view.tree().position, Some(PageRect::new(0, 0, 100, 100)));

        assert_eq!(
            view.effects_mut().drain(),
            vec![
                Effect::Reposition(lobby_rect),
                Effect::Reposition(PageRect::new(0, 0, 100, 100)),
            ]
        );
    }

    #[test]
    fn test_configured_animation_speed() {
        let store = ViewData::from_json(serde_json::json!({
            "clients": {"7": {"username": "ann", "ip_address": "1.2.3.4"}}
        }))
        .unwrap();
        let config = ViewConfig::from_json(r#"{"millis_per_line": 100}"#).unwrap();
        let mut view = LobbyView::with_config(EffectLog::new(), config);
        assert_eq!(view.config().millis_per_line, 100);

        view.handle(&store, LobbyEvent::MessageProcessingComplete)
            .unwrap();
        view.handle(&store, LobbyEvent::AddLobbyClient { client_id: 7 })
            .unwrap();
        assert_eq!(
            view.effects().effects(),
            &[Effect::In(
                NodeKey::LobbyClient(7),
                std::time::Duration::from_millis(100)
            )]
        );
    }

    #[test]
    fn test_interactions_require_binding() {
        let store = ViewData::new();
        let mut view = view();
        let mut sent: Vec<Command> = Vec::new();

        let click = Interaction::CreateGameClicked {
            mode: "Singles".to_string(),
            max_players: "4".to_string(),
        };
        assert_eq!(
            view.interact(click.clone(), &mut sent),
            Err(CommandError::Unbound)
        );

        view.handle(&store, LobbyEvent::InitializationComplete)
            .unwrap();
        view.handle(&store, LobbyEvent::InitializationComplete)
            .unwrap();
        assert!(view.interactions_bound());

        view.interact(click, &mut sent).unwrap();
        assert_eq!(
            sent,
            vec![Command::CreateGame {
                mode: GameMode::Singles,
                max_players: 4
            }]
        );
    }

    #[test]
    fn test_create_game_bad_input_sends_nothing() {
        let (mut view, _store) = bound_view_with_game();
        let mut sent: Vec<Command> = Vec::new();

        let result = view.interact(
            Interaction::CreateGameClicked {
                mode: "Teams".to_string(),
                max_players: "".to_string(),
            },
            &mut sent,
        );
        assert!(matches!(result, Err(CommandError::InvalidMaxPlayers { .. })));
        assert!(sent.is_empty());
    }

    #[test]
    fn test_mode_selection_toggles_max_players_field() {
        let (mut view, _store) = bound_view_with_game();
        let mut sent: Vec<Command> = Vec::new();
        assert!(view.tree().max_players_field_visible);

        let select = |mode: &str| Interaction::ModeSelected {
            mode: mode.to_string(),
        };
        view.interact(select("Teams"), &mut sent).unwrap();
        assert!(!view.tree().max_players_field_visible);

        view.interact(select("Bogus"), &mut sent).unwrap();
        assert!(!view.tree().max_players_field_visible);

        view.interact(select("Singles"), &mut sent).unwrap();
        assert!(view.tree().max_players_field_visible);
        assert!(sent.is_empty());
    }

    #[test]
    fn test_game_buttons() {
        let (mut view, store) = bound_view_with_game();
        let mut sent: Vec<Command> = Vec::new();

        view.interact(
            Interaction::GameButtonClicked {
                game_id: 42,
                action: GameAction::Join,
            },
            &mut sent,
        )
        .unwrap();
        assert_eq!(sent, vec![Command::JoinGame { game_id: 42 }]);

        // Rejoin is hidden for a client not in the game
        assert_eq!(
            view.interact(
                Interaction::GameButtonClicked {
                    game_id: 42,
                    action: GameAction::Rejoin,
                },
                &mut sent,
            ),
            Err(CommandError::ControlUnavailable {
                game_id: 42,
                action: GameAction::Rejoin
            })
        );

        assert_eq!(
            view.interact(
                Interaction::GameButtonClicked {
                    game_id: 7,
                    action: GameAction::Watch,
                },
                &mut sent,
            ),
            Err(CommandError::UnknownPanel(7))
        );

        // Buttons are hidden on the game page
        view.handle(&store, LobbyEvent::SetPage(Page::Game)).unwrap();
        assert!(view
            .interact(
                Interaction::GameButtonClicked {
                    game_id: 42,
                    action: GameAction::Watch,
                },
                &mut sent,
            )
            .is_err());

        // And disabled once the game is destroyed
        view.handle(&store, LobbyEvent::SetPage(Page::Lobby)).unwrap();
        view.handle(&store, LobbyEvent::MessageProcessingComplete)
            .unwrap();
        view.handle(&store, LobbyEvent::DestroyGame { game_id: 42 })
            .unwrap();
        assert!(view
            .interact(
                Interaction::GameButtonClicked {
                    game_id: 42,
                    action: GameAction::Watch,
                },
                &mut sent,
            )
            .is_err());
        assert_eq!(sent.len(), 1);
    }
}
