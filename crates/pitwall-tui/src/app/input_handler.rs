//! Keyboard input handling for the application.
//!
//! A tab that is capturing text input gets every key first. Otherwise the
//! global bindings are checked, then the key goes to the active tab.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::components::ActiveTab;

use super::App;

impl App {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.active_component().is_capturing_input() {
            self.active_component().handle_key(key);
        } else if !self.handle_global_keys(key) {
            self.active_component().handle_key(key);
        }

        // Bindings change when a tab enters or leaves an input mode.
        self.refresh_bindings();
    }

    /// Returns true if the key was handled.
    fn handle_global_keys(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.switch_to_tab(ActiveTab::from_index(index));
            }
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.switch_to_tab(self.active_tab.previous());
            }
            KeyCode::Tab => self.switch_to_tab(self.active_tab.next()),
            KeyCode::BackTab => self.switch_to_tab(self.active_tab.previous()),
            _ => return false,
        }
        true
    }
}
