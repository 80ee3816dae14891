//! Lobby View Library
//!
//! This crate keeps the client-side view of a multiplayer game lobby in step
//! with the server.
//!
//! # Overview
//!
//! The view module provides:
//!
//! - **Reconciler** - Turns lobby events (clients joining and leaving, game
//!   state and seat changes, watchers, destroyed games) into a structured view
//!   model, idempotently and in any order.
//!
//! - **Snapshot Mode** - The initial replay builds the view without animation;
//!   a one-time completion signal prunes unused seats and switches to animated
//!   live updates.
//!
//! - **Visibility and Layout** - Which page is active decides whether the
//!   lobby panel and its controls are shown, and where the panel sits.
//!
//! - **Commands** - Create, join, rejoin and watch requests built from user
//!   input.
//!
//! # Design Principles
//!
//! 1. **One owner** - All session state lives in a single `LobbyView`.
//!
//! 2. **Closed event set** - Events and commands are enums matched
//!    exhaustively.
//!
//! 3. **No rendering** - Animation and drawing sit behind the
//!    `VisualEffects` trait; the view model can be inspected headlessly.
//!
//! 4. **Read-only store** - Canonical records are only ever read through
//!    `ViewDataStore`.
//!
//! # Example
//!
//! ```rust
//! use lobby_view::{EffectLog, LobbyEvent, LobbyView, Page, ViewData};
//!
//! let store = ViewData::from_json(serde_json::json!({
//!     "local_client_id": 1,
//!     "clients": {
//!         "1": {"username": "me", "ip_address": "10.0.0.1"},
//!         "7": {"username": "ann", "ip_address": "1.2.3.4"}
//!     },
//!     "games": {"42": {"state": "Starting", "number_of_players": 1, "max_players": 4}}
//! }))
//! .unwrap();
//!
//! let mut view = LobbyView::new(EffectLog::new());
//! view.handle(&store, LobbyEvent::SetPage(Page::Lobby)).unwrap();
//! view.handle(&store, LobbyEvent::AddLobbyClient { client_id: 7 }).unwrap();
//! view.handle(&store, LobbyEvent::SetGameState { game_id: 42 }).unwrap();
//! view.handle(&store, LobbyEvent::MessageProcessingComplete).unwrap();
//!
//! let tree = view.tree();
//! assert!(tree.lobby_visible);
//! assert_eq!(tree.client(7).unwrap().title, "ann (1.2.3.4)");
//! assert_eq!(tree.panel(42).unwrap().slots().len(), 4);
//! ```

pub mod view;

// Re-export everything from view module at crate root
pub use view::*;
