//! UI Components for pitwall-tui.
//!
//! Each tab is a component that owns its controller from `pitwall-core`.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

mod driver_view;
mod ranking_view;
pub mod state_renderer;
mod status_bar;
pub mod styles;
mod tables_view;

pub use driver_view::{DriverView, INITIAL_DRIVER_ID};
pub use ranking_view::RankingView;
pub use status_bar::{KeyBinding, StatusBar};
pub use tables_view::TablesView;

/// Active tab for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Tables,
    Leaderboard,
    Constructors,
    Drivers,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 4] = [
        ActiveTab::Tables,
        ActiveTab::Leaderboard,
        ActiveTab::Constructors,
        ActiveTab::Drivers,
    ];

    pub fn index(self) -> usize {
        match self {
            ActiveTab::Tables => 0,
            ActiveTab::Leaderboard => 1,
            ActiveTab::Constructors => 2,
            ActiveTab::Drivers => 3,
        }
    }

    /// Out-of-range indices map to the first tab.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// Get the next tab (cycling).
    pub fn next(self) -> Self {
        Self::from_index((self.index() + 1) % Self::ALL.len())
    }

    /// Get the previous tab (cycling).
    pub fn previous(self) -> Self {
        Self::from_index((self.index() + Self::ALL.len() - 1) % Self::ALL.len())
    }

    pub fn label(self) -> &'static str {
        match self {
            ActiveTab::Tables => "🗄️ Tables",
            ActiveTab::Leaderboard => "🏆 Leaderboard",
            ActiveTab::Constructors => "🏎️ Constructors",
            ActiveTab::Drivers => "👤 Drivers",
        }
    }
}

/// Common trait for all UI components.
pub trait Component {
    /// Draw the component within the given area.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool);

    /// Handle keyboard input. Returns true if the event was consumed.
    fn handle_key(&mut self, key: KeyEvent) -> bool;

    /// Apply finished background work. Called once per loop iteration.
    fn tick(&mut self) {}

    /// Called when the component's tab becomes visible.
    fn activate(&mut self) {}

    /// True while the component wants every key, including global shortcuts.
    fn is_capturing_input(&self) -> bool {
        false
    }

    /// Key hints for the status bar.
    fn key_bindings(&self) -> Vec<KeyBinding> {
        Vec::new()
    }
}
