//! Page tracking, lobby layout and visibility rules.
//!
//! The lobby panel is shared between pages. Each page registers the
//! rectangle the panel should occupy while it is active, and the active
//! page decides whether the panel (and its controls) are shown at all.
//!
//! | page     | lobby panel              | header / buttons |
//! |----------|--------------------------|------------------|
//! | lobby    | shown                    | shown            |
//! | game     | shown iff show-on-game   | hidden           |
//! | other    | hidden                   | shown            |

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Top-level view of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Login,
    Lobby,
    Game,
    Settings,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Lobby => "lobby",
            Self::Game => "game",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position and size of the lobby panel on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl PageRect {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// What the visibility rules derive for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    /// Lobby panel as a whole
    pub lobby: bool,

    /// Header, create-game section and per-game action buttons
    pub controls: bool,
}

impl Visibility {
    pub fn for_page(page: Page, show_on_game_page: bool) -> Self {
        Self {
            lobby: page == Page::Lobby || (page == Page::Game && show_on_game_page),
            controls: page != Page::Game,
        }
    }
}

/// Active page, per-page rectangles and the show-on-game-page flag.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    current: Option<Page>,
    show_on_game_page: bool,
    rects: HashMap<Page, PageRect>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Page> {
        self.current
    }

    pub fn is_current(&self, page: Page) -> bool {
        self.current == Some(page)
    }

    pub fn show_on_game_page(&self) -> bool {
        self.show_on_game_page
    }

    /// Switch pages and derive the new visibility.
    pub fn set_page(&mut self, page: Page) -> Visibility {
        self.current = Some(page);
        Visibility::for_page(page, self.show_on_game_page)
    }

    /// Store the flag. Returns the page to re-apply, which is only ever the
    /// game page since the flag has no effect elsewhere.
    pub fn set_show_on_game_page(&mut self, show: bool) -> Option<Page> {
        self.show_on_game_page = show;
        self.current.filter(|page| *page == Page::Game)
    }

    /// Store or overwrite the rectangle for a page.
    pub fn register_rect(&mut self, page: Page, rect: PageRect) {
        self.rects.insert(page, rect);
    }

    pub fn rect_for(&self, page: Page) -> Option<PageRect> {
        self.rects.get(&page).copied()
    }

    /// Rectangle for the active page, if one was registered.
    pub fn current_rect(&self) -> Option<PageRect> {
        self.current.and_then(|page| self.rect_for(page))
    }
}
