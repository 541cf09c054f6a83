//! Driver stats lookup by id.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use pitwall_core::api::models::DriverStats;
use pitwall_core::core::Phase;
use pitwall_core::core::viewer::RecordViewer;

use super::state_renderer::{PlaceholderConfig, render_without_data};
use super::styles::{TEXT_DIM, TEXT_ERROR, TEXT_WARNING, border_style, cursor_style};
use super::{Component, KeyBinding};
use crate::layout::stats::INPUT_HEIGHT;

pub const INITIAL_DRIVER_ID: i64 = 1;
const MAX_ID_DIGITS: usize = 9;

pub struct DriverView {
    viewer: RecordViewer<i64, DriverStats>,
    input: String,
    editing: bool,
    input_error: Option<String>,
}

impl DriverView {
    pub fn new(viewer: RecordViewer<i64, DriverStats>) -> Self {
        let input = viewer.query().to_string();
        Self {
            viewer,
            input,
            editing: false,
            input_error: None,
        }
    }

    pub fn viewer(&self) -> &RecordViewer<i64, DriverStats> {
        &self.viewer
    }

    fn submit(&mut self) {
        match self.input.trim().parse::<i64>() {
            Ok(id) if id > 0 => {
                self.input_error = None;
                self.editing = false;
                self.viewer.set_query(id);
            }
            _ => {
                self.input_error = Some(format!("'{}' is not a driver id", self.input));
            }
        }
    }

    fn edit(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                self.editing = false;
                self.input_error = None;
                self.input = self.viewer.query().to_string();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() && self.input.len() < MAX_ID_DIGITS => {
                self.input.push(c);
            }
            _ => {}
        }
    }

    fn input_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(" Driver ID: ", TEXT_DIM),
            Span::raw(self.input.clone()),
        ];
        if self.editing {
            spans.push(Span::styled("▏", cursor_style()));
        } else {
            spans.push(Span::styled("  (press '/' to change)", TEXT_DIM));
        }
        if self.viewer.is_loading() {
            spans.push(Span::styled("  ⏳ Loading...", TEXT_WARNING));
        }
        if let Some(error) = &self.input_error {
            spans.push(Span::styled(format!("  {}", error), TEXT_ERROR));
        }
        Line::from(spans)
    }
}

impl Component for DriverView {
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(0)])
            .split(area);

        let input = Paragraph::new(self.input_line()).block(
            Block::default()
                .title(" Driver ")
                .borders(Borders::ALL)
                .border_style(border_style(focused && self.editing)),
        );
        frame.render_widget(input, chunks[0]);

        let config = PlaceholderConfig::new(" Stats ", focused && !self.editing)
            .with_loading_message("Loading driver stats...");
        if render_without_data(
            frame,
            chunks[1],
            self.viewer.phase(),
            self.viewer.data().is_some(),
            self.viewer.error(),
            &config,
        ) {
            return;
        }

        let Some(stats) = self.viewer.data() else {
            return;
        };

        let rows: Vec<Row> = stats
            .fields()
            .into_iter()
            .map(|(label, value)| {
                Row::new(vec![
                    Cell::from(Span::styled(
                        label,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Cell::from(value),
                ])
            })
            .collect();

        let mut title = format!(" Stats: driver {} ", stats.driver_id);
        if let Some(error) = self.viewer.error() {
            title = format!(" Stats: driver {} (stale: {}) ", stats.driver_id, error);
        }

        let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(0)]).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style(focused && !self.editing)),
        );
        frame.render_widget(table, chunks[1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.editing {
            self.edit(key);
            return true;
        }

        match key.code {
            KeyCode::Char('/') | KeyCode::Char('i') => {
                self.editing = true;
                self.input.clear();
            }
            KeyCode::Char('r') => self.viewer.load(),
            _ => return false,
        }
        true
    }

    fn tick(&mut self) {
        self.viewer.process_pending();
    }

    fn activate(&mut self) {
        if self.viewer.phase() == Phase::Empty {
            self.viewer.load();
        }
    }

    fn is_capturing_input(&self) -> bool {
        self.editing
    }

    fn key_bindings(&self) -> Vec<KeyBinding> {
        if self.editing {
            return vec![
                KeyBinding::new("Enter", "Look up"),
                KeyBinding::new("Esc", "Cancel"),
            ];
        }
        vec![
            KeyBinding::new("/", "Driver ID"),
            KeyBinding::new("r", "Reload"),
        ]
    }
}
