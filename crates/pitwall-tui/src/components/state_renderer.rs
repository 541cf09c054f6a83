//! Placeholder rendering for views without data to show.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use pitwall_core::core::Phase;

use super::styles::{TEXT_DIM, TEXT_ERROR, TEXT_WARNING, border_style};

/// Configuration for rendering placeholder views.
pub struct PlaceholderConfig<'a> {
    pub title: &'a str,
    /// Shown when nothing has been requested yet
    pub empty_message: &'a str,
    pub loading_message: &'a str,
    pub border_style: Style,
}

impl<'a> PlaceholderConfig<'a> {
    pub fn new(title: &'a str, focused: bool) -> Self {
        Self {
            title,
            empty_message: "Press 'r' to load data",
            loading_message: "Loading...",
            border_style: border_style(focused),
        }
    }

    pub fn with_empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }

    pub fn with_loading_message(mut self, message: &'a str) -> Self {
        self.loading_message = message;
        self
    }
}

fn render_lines(frame: &mut Frame, area: Rect, config: &PlaceholderConfig<'_>, lines: Vec<Line>) {
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(config.title)
            .borders(Borders::ALL)
            .border_style(config.border_style),
    );
    frame.render_widget(paragraph, area);
}

pub fn render_empty(frame: &mut Frame, area: Rect, config: &PlaceholderConfig<'_>) {
    render_lines(
        frame,
        area,
        config,
        vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", config.empty_message), TEXT_DIM)),
        ],
    );
}

pub fn render_loading(frame: &mut Frame, area: Rect, config: &PlaceholderConfig<'_>) {
    render_lines(
        frame,
        area,
        config,
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  ⏳ {}", config.loading_message),
                TEXT_WARNING,
            )),
        ],
    );
}

/// Error message with a retry hint.
pub fn render_error(frame: &mut Frame, area: Rect, config: &PlaceholderConfig<'_>, error_msg: &str) {
    render_lines(
        frame,
        area,
        config,
        vec![
            Line::from(""),
            Line::from(Span::styled(format!("  ❌ Error: {}", error_msg), TEXT_ERROR)),
            Line::from(""),
            Line::from(Span::styled("  Press 'r' to retry", TEXT_DIM)),
        ],
    );
}

/// Render a placeholder when there is no data to draw.
///
/// Returns true if something was rendered; false means the caller should
/// draw its data (possibly with a loading or error annotation).
pub fn render_without_data(
    frame: &mut Frame,
    area: Rect,
    phase: Phase,
    has_data: bool,
    error: Option<&str>,
    config: &PlaceholderConfig<'_>,
) -> bool {
    if has_data {
        return false;
    }

    match phase {
        Phase::Empty | Phase::Ready => render_empty(frame, area, config),
        Phase::Loading => render_loading(frame, area, config),
        Phase::Degraded => render_error(frame, area, config, error.unwrap_or("Request failed")),
    }
    true
}
