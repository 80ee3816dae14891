//! Structured view model of the lobby.
//!
//! This is what a renderer draws. Nodes that are animating out stay in the
//! tree with [`Presence::Leaving`] until the animation finishes.

use super::page::PageRect;
use super::store::{ClientId, ClientProfile, GameId};
use std::time::Duration;

/// Whether a node is settled in the tree or on its way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Visible,
    Leaving {
        since: chrono::DateTime<chrono::Utc>,
        duration: Duration,
    },
}

impl Presence {
    pub fn leaving(duration: Duration) -> Self {
        Self::Leaving {
            since: chrono::Utc::now(),
            duration,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }

    pub fn is_leaving(&self) -> bool {
        matches!(self, Self::Leaving { .. })
    }
}

/// A client row, used both for the lobby list and for game watchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEntry {
    pub client_id: ClientId,

    /// Username
    pub label: String,

    /// `username (address)`
    pub title: String,

    pub presence: Presence,

    /// When this entry was created
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ClientEntry {
    pub fn new(client_id: ClientId, profile: &ClientProfile) -> Self {
        Self {
            client_id,
            label: profile.username.clone(),
            title: profile.title(),
            presence: Presence::Visible,
            created_at: chrono::Utc::now(),
        }
    }

    /// Refresh text from a profile and bring the entry back if leaving.
    pub fn refresh(&mut self, profile: &ClientProfile) {
        self.label = profile.username.clone();
        self.title = profile.title();
        self.presence = Presence::Visible;
    }
}

/// One seat row of a game panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    /// Seat index within the game
    pub index: usize,

    pub username: String,

    pub title: String,

    /// Client playing this seat, `None` when the player is disconnected
    pub client_id: Option<ClientId>,

    /// Seat has a player whose client is gone
    pub missing: bool,

    pub presence: Presence,
}

impl PlayerSlot {
    /// Empty seat, as cloned from the panel template.
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            username: String::new(),
            title: String::new(),
            client_id: None,
            missing: false,
            presence: Presence::Visible,
        }
    }

    pub fn is_occupied(&self) -> bool {
        !self.username.is_empty()
    }
}

/// A join/rejoin/watch button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub visible: bool,
    pub enabled: bool,
}

impl Default for ActionButton {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
        }
    }
}

impl ActionButton {
    pub fn is_clickable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// The three action buttons of a game panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameButtons {
    pub join: ActionButton,
    pub rejoin: ActionButton,
    pub watch: ActionButton,
}

impl GameButtons {
    pub fn disable_all(&mut self) {
        self.join.enabled = false;
        self.rejoin.enabled = false;
        self.watch.enabled = false;
    }
}

/// Everything the lobby shows about one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePanel {
    pub game_id: GameId,

    /// `Game #<id>`
    pub header: String,

    pub state_text: String,

    /// Seat rows in index order
    slots: Vec<PlayerSlot>,

    /// Watchers in arrival order
    watchers: Vec<ClientEntry>,

    pub buttons: GameButtons,

    /// Button group shown (hidden while on the game page)
    pub buttons_visible: bool,

    pub presence: Presence,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl GamePanel {
    /// New panel with `max_players` empty seats.
    pub fn new(game_id: GameId, max_players: usize, buttons_visible: bool) -> Self {
        Self {
            game_id,
            header: format!("Game #{}", game_id),
            state_text: String::new(),
            slots: (0..max_players).map(PlayerSlot::empty).collect(),
            watchers: Vec::new(),
            buttons: GameButtons::default(),
            buttons_visible,
            presence: Presence::Visible,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn slots(&self) -> &[PlayerSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&PlayerSlot> {
        self.slots.iter().find(|s| s.index == index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut PlayerSlot> {
        self.slots.iter_mut().find(|s| s.index == index)
    }

    pub fn remove_slot(&mut self, index: usize) -> Option<PlayerSlot> {
        let pos = self.slots.iter().position(|s| s.index == index)?;
        Some(self.slots.remove(pos))
    }

    /// Seat rows currently in the tree, leaving ones included.
    pub fn row_count(&self) -> usize {
        self.slots.len()
    }

    pub fn watchers(&self) -> &[ClientEntry] {
        &self.watchers
    }

    pub fn watcher(&self, client_id: ClientId) -> Option<&ClientEntry> {
        self.watchers.iter().find(|w| w.client_id == client_id)
    }

    pub fn watcher_mut(&mut self, client_id: ClientId) -> Option<&mut ClientEntry> {
        self.watchers.iter_mut().find(|w| w.client_id == client_id)
    }

    pub fn push_watcher(&mut self, entry: ClientEntry) {
        self.watchers.push(entry);
    }

    pub fn remove_watcher(&mut self, client_id: ClientId) -> Option<ClientEntry> {
        let pos = self.watchers.iter().position(|w| w.client_id == client_id)?;
        Some(self.watchers.remove(pos))
    }
}

/// The whole lobby panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LobbyTree {
    /// Lobby panel shown on the current page
    pub lobby_visible: bool,

    /// Header and create-game section shown
    pub controls_visible: bool,

    /// Last position applied to the lobby panel
    pub position: Option<PageRect>,

    /// Max-players field of the create-game form shown
    pub max_players_field_visible: bool,

    /// Idle clients in arrival order
    clients: Vec<ClientEntry>,

    /// Game panels, newest first
    panels: Vec<GamePanel>,
}

impl LobbyTree {
    pub fn new() -> Self {
        Self {
            max_players_field_visible: true,
            ..Self::default()
        }
    }

    pub fn clients(&self) -> &[ClientEntry] {
        &self.clients
    }

    /// Clients not animating out.
    pub fn visible_clients(&self) -> impl Iterator<Item = &ClientEntry> {
        self.clients.iter().filter(|c| c.presence.is_visible())
    }

    pub fn client(&self, client_id: ClientId) -> Option<&ClientEntry> {
        self.clients.iter().find(|c| c.client_id == client_id)
    }

    pub fn client_mut(&mut self, client_id: ClientId) -> Option<&mut ClientEntry> {
        self.clients.iter_mut().find(|c| c.client_id == client_id)
    }

    pub fn push_client(&mut self, entry: ClientEntry) {
        self.clients.push(entry);
    }

    pub fn remove_client(&mut self, client_id: ClientId) -> Option<ClientEntry> {
        let pos = self.clients.iter().position(|c| c.client_id == client_id)?;
        Some(self.clients.remove(pos))
    }

    pub fn panels(&self) -> &[GamePanel] {
        &self.panels
    }

    pub fn panel(&self, game_id: GameId) -> Option<&GamePanel> {
        self.panels.iter().find(|p| p.game_id == game_id)
    }

    pub fn panel_mut(&mut self, game_id: GameId) -> Option<&mut GamePanel> {
        self.panels.iter_mut().find(|p| p.game_id == game_id)
    }

    /// Insert a panel at the top.
    pub fn prepend_panel(&mut self, panel: GamePanel) {
        self.panels.insert(0, panel);
    }

    pub fn remove_panel(&mut self, game_id: GameId) -> Option<GamePanel> {
        let pos = self.panels.iter().position(|p| p.game_id == game_id)?;
        Some(self.panels.remove(pos))
    }

    pub fn panel_ids(&self) -> Vec<GameId> {
        self.panels.iter().map(|p| p.game_id).collect()
    }

    /// Show or hide the header, create-game section and every button group.
    pub fn set_controls_visible(&mut self, visible: bool) {
        self.controls_visible = visible;
        for panel in &mut self.panels {
            panel.buttons_visible = visible;
        }
    }

    /// Drop all clients and panels.
    pub fn clear(&mut self) {
        self.clients.clear();
        self.panels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_slots() {
        let mut panel = GamePanel::new(7, 4, true);
        assert_eq!(panel.header, "Game #7");
        assert_eq!(panel.row_count(), 4);
        assert!(panel.slots().iter().all(|s| !s.is_occupied()));

        // Removing out of order keeps indexes stable
        panel.remove_slot(2);
        panel.remove_slot(3);
        assert_eq!(panel.row_count(), 2);
        assert!(panel.slot(1).is_some());
        assert!(panel.slot(3).is_none());
        assert!(panel.remove_slot(3).is_none());
    }

    #[test]
    fn test_panels_newest_first() {
        let mut tree = LobbyTree::new();
        tree.prepend_panel(GamePanel::new(1, 2, true));
        tree.prepend_panel(GamePanel::new(2, 2, true));
        assert_eq!(tree.panel_ids(), vec![2, 1]);

        tree.set_controls_visible(false);
        assert!(tree.panels().iter().all(|p| !p.buttons_visible));

        tree.remove_panel(2);
        assert_eq!(tree.panel_ids(), vec![1]);
    }

    #[test]
    fn test_client_entries() {
        let mut tree = LobbyTree::new();
        let profile = ClientProfile::new("ann", "1.2.3.4");
        tree.push_client(ClientEntry::new(7, &profile));

        let entry = tree.client_mut(7).unwrap();
        entry.presence = Presence::leaving(Duration::from_millis(250));
        assert_eq!(tree.visible_clients().count(), 0);

        tree.client_mut(7).unwrap().refresh(&profile);
        assert_eq!(tree.visible_clients().count(), 1);
        assert_eq!(tree.client(7).unwrap().title, "ann (1.2.3.4)");
    }

    #[test]
    fn test_buttons() {
        let mut buttons = GameButtons::default();
        assert!(buttons.watch.is_clickable());
        buttons.disable_all();
        assert!(!buttons.join.is_clickable());
        assert!(buttons.join.visible);
    }
}
