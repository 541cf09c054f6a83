//! Shared style definitions for TUI components.

use ratatui::style::{Color, Modifier, Style};

/// Border style for focused components.
pub const BORDER_FOCUSED: Style = Style::new().fg(Color::Cyan);

/// Border style for unfocused components.
pub const BORDER_UNFOCUSED: Style = Style::new().fg(Color::DarkGray);

#[inline]
pub fn border_style(focused: bool) -> Style {
    if focused {
        BORDER_FOCUSED
    } else {
        BORDER_UNFOCUSED
    }
}

/// Style for table header text.
pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Style for table row when selected/highlighted.
pub fn row_highlight_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub const HIGHLIGHT_SYMBOL: &str = "► ";

pub const TEXT_DIM: Style = Style::new().fg(Color::DarkGray);
pub const TEXT_WARNING: Style = Style::new().fg(Color::Yellow);
pub const TEXT_ERROR: Style = Style::new().fg(Color::Red);

/// CONNECTED pill.
pub fn pill_ok_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

/// DEGRADED pill.
pub fn pill_degraded_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Style for cursor indicator.
pub fn cursor_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::SLOW_BLINK)
}
