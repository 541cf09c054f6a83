//! Ranked record tables (leaderboard, constructor points).

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use pitwall_core::api::models::Tabular;
use pitwall_core::core::Phase;
use pitwall_core::core::viewer::RecordViewer;

use super::state_renderer::{PlaceholderConfig, render_without_data};
use super::styles::{
    HIGHLIGHT_SYMBOL, TEXT_DIM, TEXT_ERROR, TEXT_WARNING, border_style, header_style,
    row_highlight_style,
};
use super::{Component, KeyBinding};
use crate::layout::stats::{INPUT_HEIGHT, RANK_WIDTH};

/// Step the query by a signed amount, keeping it in range.
pub type Adjust<Q> = fn(&Q, i32) -> Q;
/// One-line description of the query for the parameter box.
pub type Describe<Q> = fn(&Q) -> String;

pub struct RankingView<Q, T> {
    title: &'static str,
    viewer: RecordViewer<Q, Vec<T>>,
    table_state: TableState,
    adjust: Adjust<Q>,
    describe: Describe<Q>,
}

impl<Q, T> RankingView<Q, T>
where
    Q: Clone + PartialEq + Send + 'static,
    T: Tabular + Send + 'static,
{
    pub fn new(
        title: &'static str,
        viewer: RecordViewer<Q, Vec<T>>,
        adjust: Adjust<Q>,
        describe: Describe<Q>,
    ) -> Self {
        Self {
            title,
            viewer,
            table_state: TableState::default(),
            adjust,
            describe,
        }
    }

    pub fn viewer(&self) -> &RecordViewer<Q, Vec<T>> {
        &self.viewer
    }

    fn step(&mut self, delta: i32) {
        let next = (self.adjust)(self.viewer.query(), delta);
        if &next != self.viewer.query() {
            self.viewer.set_query(next);
            self.table_state = TableState::default();
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let count = self.viewer.data().map(Vec::len).unwrap_or(0);
        if count == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if forward => (i + 1).min(count - 1),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn parameter_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::raw(format!(" {} ", (self.describe)(self.viewer.query()))),
            Span::styled("(←/→ to change)", TEXT_DIM),
        ];
        if self.viewer.is_loading() {
            spans.push(Span::styled("  ⏳ Loading...", TEXT_WARNING));
        }
        if let Some(error) = self.viewer.error() {
            spans.push(Span::styled(format!("  ❌ {}", error), TEXT_ERROR));
        }
        Line::from(spans)
    }
}

impl<Q, T> Component for RankingView<Q, T>
where
    Q: Clone + PartialEq + Send + 'static,
    T: Tabular + Send + 'static,
{
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(0)])
            .split(area);

        let parameters = Paragraph::new(self.parameter_line()).block(
            Block::default()
                .title(format!(" {} ", self.title))
                .borders(Borders::ALL)
                .border_style(border_style(focused)),
        );
        frame.render_widget(parameters, chunks[0]);

        let title = format!(" {} ", self.title);
        let config = PlaceholderConfig::new(&title, focused)
            .with_loading_message("Loading standings...");
        let has_data = self.viewer.data().is_some();
        if render_without_data(
            frame,
            chunks[1],
            self.viewer.phase(),
            has_data,
            self.viewer.error(),
            &config,
        ) {
            return;
        }

        let records = self.viewer.data().map(Vec::as_slice).unwrap_or_default();
        let rows: Vec<Row> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let mut cells = vec![Cell::from(Span::styled(
                    (index + 1).to_string(),
                    TEXT_DIM,
                ))];
                cells.extend(record.cells().into_iter().map(Cell::from));
                Row::new(cells)
            })
            .collect();

        let mut header = vec![Cell::from("#")];
        header.extend(T::headers().into_iter().map(Cell::from));

        let mut widths = vec![Constraint::Length(RANK_WIDTH)];
        widths.extend(T::headers().iter().map(|_| Constraint::Fill(1)));

        let block_title = match self.viewer.phase() {
            Phase::Loading => format!(" {} (refreshing) ", self.title),
            _ => format!(" {} ({}) ", self.title, records.len()),
        };

        let table = Table::new(rows, widths)
            .header(Row::new(header).style(header_style()).bottom_margin(1))
            .block(
                Block::default()
                    .title(block_title)
                    .borders(Borders::ALL)
                    .border_style(border_style(focused)),
            )
            .row_highlight_style(row_highlight_style())
            .highlight_symbol(HIGHLIGHT_SYMBOL);

        frame.render_stateful_widget(table, chunks[1], &mut self.table_state);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left | KeyCode::Char('-') => self.step(-1),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => self.step(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
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

    fn key_bindings(&self) -> Vec<KeyBinding> {
        vec![
            KeyBinding::new("←→", "Change"),
            KeyBinding::new("↑↓", "Select"),
            KeyBinding::new("r", "Reload"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use futures::FutureExt;
    use pitwall_core::api::models::LeaderboardEntry;
    use pitwall_core::core::viewer::Fetcher;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    fn leaderboard() -> RankingView<u32, LeaderboardEntry> {
        let fetcher: Fetcher<u32, Vec<LeaderboardEntry>> = Arc::new(|limit: u32| {
            async move {
                Ok((1..=limit)
                    .map(|i| LeaderboardEntry {
                        driver_id: i64::from(i),
                        driver_name: format!("Driver {}", i),
                        total_points: f64::from(100 - i),
                    })
                    .collect())
            }
            .boxed()
        });
        RankingView::new(
            "Leaderboard",
            RecordViewer::new(3, fetcher),
            |limit, delta| (*limit as i32 + delta).clamp(1, 5) as u32,
            |limit| format!("Top {}", limit),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(view: &mut RankingView<u32, LeaderboardEntry>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).expect("terminal");
        terminal
            .draw(|frame| view.draw(frame, frame.area(), true))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_activate_loads_once() {
        let mut view = leaderboard();
        assert_eq!(view.viewer().phase(), Phase::Empty);

        view.activate();
        assert!(view.viewer().is_loading());
        view.viewer.settle().await;
        assert_eq!(view.viewer().data().map(Vec::len), Some(3));

        view.activate();
        assert!(!view.viewer().is_loading());
    }

    #[tokio::test]
    async fn test_adjust_clamps_and_reloads() {
        let mut view = leaderboard();
        view.handle_key(key(KeyCode::Right));
        view.handle_key(key(KeyCode::Right));
        view.handle_key(key(KeyCode::Right));
        assert_eq!(*view.viewer().query(), 5);
        view.viewer.settle().await;
        assert_eq!(view.viewer().data().map(Vec::len), Some(5));

        view.handle_key(key(KeyCode::Char('-')));
        assert_eq!(*view.viewer().query(), 4);
    }

    #[tokio::test]
    async fn test_draws_records() {
        let mut view = leaderboard();
        assert!(screen(&mut view).contains("Press 'r' to load data"));

        view.activate();
        view.viewer.settle().await;
        let text = screen(&mut view);
        assert!(text.contains("Top 3"));
        assert!(text.contains("Driver 2"));
    }
}
