//! Event handlers that reconcile the view tree with the store.
//!
//! Every handler is idempotent: replaying an event against unchanged store
//! data leaves the tree as it was. All inserts go through
//! [`Stage::materialize`] and all removals through [`Stage::dematerialize`],
//! which decide between immediate application (snapshot mode) and animation
//! (live mode).
//!
//! # Deferred removal
//!
//! In live mode a removed node stays in the tree as [`Presence::Leaving`]
//! until `AnimationFinished` arrives for its key. An add for the same client
//! or watcher key in the meantime revives the node and cancels the
//! animation, so the late `AnimationFinished` finds nothing to remove.
//!
//! Game ids are never reused, so a destroyed panel is never revived. Late
//! updates for its game land on the leaving panel in place, its buttons stay
//! disabled, and `AnimationFinished` still removes it.

use super::config::ViewConfig;
use super::effects::{NodeKey, VisualEffects};
use super::page::Page;
use super::store::{require_client, require_game, ClientId, GameId, ViewDataStore, ViewError};
use super::tree::{ClientEntry, GamePanel, Presence};
use super::LobbyView;
use tracing::{debug, info, warn};

/// Snapshot latch plus the effects used to animate inserts and removals.
#[derive(Debug)]
pub struct Stage<E> {
    pub(super) effects: E,
    pub(super) config: ViewConfig,

    /// Replaying the initial snapshot; nothing animates
    pub(super) snapshot: bool,
}

impl<E: VisualEffects> Stage<E> {
    pub(super) fn new(effects: E, config: ViewConfig) -> Self {
        Self {
            effects,
            config,
            snapshot: true,
        }
    }

    /// Announce a node that was just inserted.
    fn materialize(&mut self, key: NodeKey, lines: usize) {
        if !self.snapshot {
            self.effects.animate_in(key, self.config.duration_for(lines));
        }
    }

    /// Start removing a node. `None` means remove it now; otherwise the
    /// node should take the returned presence until its animation finishes.
    fn dematerialize(&mut self, key: NodeKey, lines: usize) -> Option<Presence> {
        if self.snapshot {
            return None;
        }
        let duration = self.config.duration_for(lines);
        self.effects.animate_out(key, duration);
        Some(Presence::leaving(duration))
    }

    /// Stop a pending removal.
    fn revive(&mut self, key: NodeKey) {
        self.effects.cancel(key);
    }
}

impl<E: VisualEffects> LobbyView<E> {
    pub(super) fn add_lobby_client(
        &mut self,
        store: &dyn ViewDataStore,
        client_id: ClientId,
    ) -> Result<(), ViewError> {
        let profile = require_client(store, client_id)?;
        let key = NodeKey::LobbyClient(client_id);

        if let Some(entry) = self.tree.client_mut(client_id) {
            if entry.presence.is_leaving() {
                self.stage.revive(key);
            }
            entry.refresh(profile);
            debug!(client_id, "refreshed lobby client");
            return Ok(());
        }

        self.tree.push_client(ClientEntry::new(client_id, profile));
        self.stage.materialize(key, 1);
        debug!(client_id, username = %profile.username, "added lobby client");
        Ok(())
    }

    pub(super) fn remove_lobby_client(&mut self, client_id: ClientId) {
        match self.tree.client(client_id) {
            None => {
                debug!(client_id, "no lobby client to remove");
                return;
            }
            Some(entry) if entry.presence.is_leaving() => return,
            Some(_) => {}
        }

        match self.stage.dematerialize(NodeKey::LobbyClient(client_id), 1) {
            Some(presence) => {
                if let Some(entry) = self.tree.client_mut(client_id) {
                    entry.presence = presence;
                }
            }
            None => {
                self.tree.remove_client(client_id);
            }
        }
    }

    /// Create the panel for a game if it is not in the tree yet.
    fn ensure_panel(
        &mut self,
        store: &dyn ViewDataStore,
        game_id: GameId,
    ) -> Result<(), ViewError> {
        if self.tree.panel(game_id).is_some() {
            return Ok(());
        }

        let key = NodeKey::GamePanel(game_id);
        let game = require_game(store, game_id)?;
        let buttons_visible = !self.pages.is_current(Page::Game);
        self.tree
            .prepend_panel(GamePanel::new(game_id, game.max_players, buttons_visible));
        self.stage.materialize(key, game.max_players + 2);
        debug!(game_id, max_players = game.max_players, "created game panel");
        Ok(())
    }

    pub(super) fn set_game_state(
        &mut self,
        store: &dyn ViewDataStore,
        game_id: GameId,
    ) -> Result<(), ViewError> {
        self.ensure_panel(store, game_id)?;

        let game = require_game(store, game_id)?;
        let in_game = match store.local_client_id() {
            Some(local_id) => game.has_username(&require_client(store, local_id)?.username),
            None => false,
        };

        let panel = self
            .tree
            .panel_mut(game_id)
            .ok_or(ViewError::MissingPanel(game_id))?;
        panel.state_text = game.state_text();
        panel.buttons.join.visible = game.state.is_joinable() && !in_game;
        panel.buttons.rejoin.visible = in_game;
        panel.buttons.watch.visible = !in_game;
        let leaving = panel.presence.is_leaving();

        if !self.stage.snapshot && !leaving {
            self.prune_slots(store, game_id)?;
        }
        Ok(())
    }

    pub(super) fn set_game_player_data(
        &mut self,
        store: &dyn ViewDataStore,
        game_id: GameId,
        player_id: usize,
        username: &str,
        client_id: Option<ClientId>,
    ) -> Result<(), ViewError> {
        self.ensure_panel(store, game_id)?;

        let address = match client_id {
            Some(id) => require_client(store, id)?.ip_address.clone(),
            None => self.stage.config.missing_address.clone(),
        };

        let panel = self
            .tree
            .panel_mut(game_id)
            .ok_or(ViewError::MissingPanel(game_id))?;
        match panel.slot_mut(player_id) {
            Some(slot) => {
                slot.missing = client_id.is_none();
                slot.client_id = client_id;
                slot.username = username.to_string();
                slot.title = format!("{} ({})", username, address);
            }
            None => warn!(game_id, player_id, "no slot for player"),
        }

        self.set_game_state(store, game_id)
    }

    /// Remove the seats above the declared player count, highest first.
    /// A starting game keeps every seat so others can see there is room.
    fn prune_slots(
        &mut self,
        store: &dyn ViewDataStore,
        game_id: GameId,
    ) -> Result<(), ViewError> {
        let game = require_game(store, game_id)?;
        if game.state.is_joinable() {
            return Ok(());
        }

        let lines = game.unused_slots();
        let panel = self
            .tree
            .panel_mut(game_id)
            .ok_or(ViewError::MissingPanel(game_id))?;

        for index in (game.number_of_players..game.max_players).rev() {
            let leaving = match panel.slot(index) {
                Some(slot) => slot.presence.is_leaving(),
                None => continue,
            };
            if leaving {
                continue;
            }

            match self.stage.dematerialize(NodeKey::PlayerSlot(game_id, index), lines) {
                Some(presence) => {
                    if let Some(slot) = panel.slot_mut(index) {
                        slot.presence = presence;
                    }
                }
                None => {
                    panel.remove_slot(index);
                }
            }
            debug!(game_id, index, "pruned unused slot");
        }
        Ok(())
    }

    pub(super) fn add_game_watcher(
        &mut self,
        store: &dyn ViewDataStore,
        game_id: GameId,
        client_id: ClientId,
    ) -> Result<(), ViewError> {
        self.ensure_panel(store, game_id)?;

        let profile = require_client(store, client_id)?;
        let key = NodeKey::Watcher(game_id, client_id);
        let panel = self
            .tree
            .panel_mut(game_id)
            .ok_or(ViewError::MissingPanel(game_id))?;

        if let Some(entry) = panel.watcher_mut(client_id) {
            if entry.presence.is_leaving() {
                self.stage.revive(key);
            }
            entry.refresh(profile);
            return Ok(());
        }

        panel.push_watcher(ClientEntry::new(client_id, profile));
        self.stage.materialize(key, 1);
        debug!(game_id, client_id, "added watcher");
        Ok(())
    }

    pub(super) fn remove_game_watcher(&mut self, game_id: GameId, client_id: ClientId) {
        let Some(panel) = self.tree.panel_mut(game_id) else {
            debug!(game_id, client_id, "no panel for watcher removal");
            return;
        };

        let leaving = match panel.watcher(client_id) {
            Some(entry) => entry.presence.is_leaving(),
            None => {
                debug!(game_id, client_id, "no watcher to remove");
                return;
            }
        };
        if leaving {
            return;
        }

        match self.stage.dematerialize(NodeKey::Watcher(game_id, client_id), 1) {
            Some(presence) => {
                if let Some(entry) = panel.watcher_mut(client_id) {
                    entry.presence = presence;
                }
            }
            None => {
                panel.remove_watcher(client_id);
            }
        }
    }

    pub(super) fn destroy_game(&mut self, game_id: GameId) -> Result<(), ViewError> {
        let panel = self
            .tree
            .panel_mut(game_id)
            .ok_or(ViewError::MissingPanel(game_id))?;

        panel.buttons.disable_all();
        if panel.presence.is_leaving() {
            return Ok(());
        }
        let lines = panel.row_count() + 2;

        match self.stage.dematerialize(NodeKey::GamePanel(game_id), lines) {
            Some(presence) => panel.presence = presence,
            None => {
                self.tree.remove_panel(game_id);
            }
        }
        debug!(game_id, "destroying game panel");
        Ok(())
    }

    /// End of the initial snapshot. Only the first call per session acts.
    pub(super) fn message_processing_complete(
        &mut self,
        store: &dyn ViewDataStore,
    ) -> Result<(), ViewError> {
        if !self.stage.snapshot {
            return Ok(());
        }

        let game_ids = self.tree.panel_ids();
        for game_id in &game_ids {
            if store.game(*game_id).is_none() {
                warn!(game_id, "no game record for panel, skipping prune");
                continue;
            }
            self.prune_slots(store, *game_id)?;
        }

        self.stage.snapshot = false;
        info!(games = game_ids.len(), "lobby snapshot complete");
        Ok(())
    }

    /// Drop everything without animation and wait for a new snapshot.
    pub(super) fn reset(&mut self) {
        self.tree.clear();
        self.stage.snapshot = true;
        info!("lobby reset");
    }

    /// Finish a deferred removal.
    pub(super) fn animation_finished(&mut self, key: NodeKey) {
        let removed = match key {
            NodeKey::LobbyClient(client_id) => {
                let leaving = self
                    .tree
                    .client(client_id)
                    .is_some_and(|entry| entry.presence.is_leaving());
                leaving && self.tree.remove_client(client_id).is_some()
            }
            NodeKey::GamePanel(game_id) => {
                let leaving = self
                    .tree
                    .panel(game_id)
                    .is_some_and(|panel| panel.presence.is_leaving());
                leaving && self.tree.remove_panel(game_id).is_some()
            }
            NodeKey::PlayerSlot(game_id, index) => match self.tree.panel_mut(game_id) {
                Some(panel) => {
                    let leaving = panel
                        .slot(index)
                        .is_some_and(|slot| slot.presence.is_leaving());
                    leaving && panel.remove_slot(index).is_some()
                }
                None => false,
            },
            NodeKey::Watcher(game_id, client_id) => match self.tree.panel_mut(game_id) {
                Some(panel) => {
                    let leaving = panel
                        .watcher(client_id)
                        .is_some_and(|entry| entry.presence.is_leaving());
                    leaving && panel.remove_watcher(client_id).is_some()
                }
                None => false,
            },
        };

        if removed {
            debug!(%key, "removed after animation");
        } else {
            debug!(%key, "stale animation finished");
        }
    }
}
