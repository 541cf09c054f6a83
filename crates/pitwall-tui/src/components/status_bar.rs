//! Status bar component.
//!
//! Displays keybindings and status messages at the bottom of the screen.

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Component;

/// Key binding display item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyBinding {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

const GLOBAL_BINDINGS: [KeyBinding; 2] = [
    KeyBinding::new("1-4/Tab", "Switch"),
    KeyBinding::new("q", "Quit"),
];

/// Status bar showing keybindings and messages.
pub struct StatusBar {
    message: String,
    bindings: Vec<KeyBinding>,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            message: String::new(),
            bindings: GLOBAL_BINDINGS.to_vec(),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Show `bindings` ahead of the global ones.
    pub fn set_bindings(&mut self, bindings: Vec<KeyBinding>) {
        self.bindings = bindings;
        self.bindings.extend(GLOBAL_BINDINGS);
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }
}

impl Component for StatusBar {
    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool) {
        let mut spans: Vec<Span> = Vec::new();

        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                format!(" {} ", binding.key),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(binding.action));
        }

        if !self.message.is_empty() {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                self.message.clone(),
                Style::default().fg(Color::Green),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        frame.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, _key: KeyEvent) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_bindings_always_last() {
        let mut bar = StatusBar::new();
        bar.set_bindings(vec![KeyBinding::new("r", "Retry")]);

        let keys: Vec<&str> = bar.bindings().iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["r", "1-4/Tab", "q"]);
    }
}
