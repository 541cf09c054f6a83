//! Tables tab: sidebar of tables, page summary, search box and data grid.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState},
};

use pitwall_core::core::Phase;
use pitwall_core::core::browser::TableBrowser;
use pitwall_core::utils::text::truncate_text;

use super::state_renderer::{PlaceholderConfig, render_without_data};
use super::styles::{
    HIGHLIGHT_SYMBOL, TEXT_DIM, TEXT_ERROR, TEXT_WARNING, border_style, cursor_style,
    header_style, pill_degraded_style, pill_ok_style, row_highlight_style,
};
use super::{Component, KeyBinding};
use crate::layout::tables::{
    COLUMN_MIN_WIDTH, POS_WIDTH, SEARCH_HEIGHT, SIDEBAR_WIDTH, SUMMARY_HEIGHT,
};

/// Longest cell text drawn in the grid.
const MAX_CELL_CHARS: usize = 40;

pub struct TablesView {
    browser: TableBrowser,
    sidebar: ListState,
    grid: TableState,
    searching: bool,
    started: bool,
}

impl TablesView {
    pub fn new(browser: TableBrowser) -> Self {
        Self {
            browser,
            sidebar: ListState::default(),
            grid: TableState::default(),
            searching: false,
            started: false,
        }
    }

    pub fn browser(&self) -> &TableBrowser {
        &self.browser
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    #[cfg(test)]
    pub(crate) fn browser_mut(&mut self) -> &mut TableBrowser {
        &mut self.browser
    }

    fn sidebar_index(&self) -> Option<usize> {
        self.sidebar.selected().or_else(|| {
            let selected = self.browser.selected_table()?;
            self.browser.tables().iter().position(|t| t == selected)
        })
    }

    fn move_sidebar(&mut self, forward: bool) {
        let count = self.browser.tables().len();
        if count == 0 {
            return;
        }
        let current = self.sidebar_index().unwrap_or(0);
        let next = if forward {
            (current + 1).min(count - 1)
        } else {
            current.saturating_sub(1)
        };
        self.sidebar.select(Some(next));
    }

    fn open_highlighted(&mut self) {
        let Some(index) = self.sidebar_index() else {
            return;
        };
        if let Some(name) = self.browser.tables().get(index).cloned() {
            self.browser.select_table(name);
            self.grid = TableState::default();
        }
    }

    fn edit_search(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.searching = false,
            KeyCode::Backspace => {
                let mut text = self.browser.query().raw_search.clone();
                text.pop();
                self.browser.set_search(text);
            }
            KeyCode::Char(c) => {
                let mut text = self.browser.query().raw_search.clone();
                text.push(c);
                self.browser.set_search(text);
            }
            _ => {}
        }
    }

    fn draw_sidebar(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let title = format!(" Tables ({}) ", self.browser.tables().len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(focused && !self.searching));

        if self.browser.is_tables_loading() {
            let loading = Paragraph::new(Span::styled(" ⏳ Loading tables...", TEXT_WARNING))
                .block(block);
            frame.render_widget(loading, area);
            return;
        }

        if self.browser.tables().is_empty() {
            let message = match self.browser.error() {
                Some(error) => Span::styled(format!(" {}", error), TEXT_ERROR),
                None => Span::styled(" No tables", TEXT_DIM),
            };
            frame.render_widget(Paragraph::new(message).block(block), area);
            return;
        }

        let selected = self.browser.selected_table();
        let items: Vec<ListItem> = self
            .browser
            .tables()
            .iter()
            .map(|name| {
                let style = if Some(name.as_str()) == selected {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(name.clone(), style))
            })
            .collect();

        if self.sidebar.selected().is_none() {
            self.sidebar.select(self.sidebar_index());
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(row_highlight_style())
            .highlight_symbol(HIGHLIGHT_SYMBOL);
        frame.render_stateful_widget(list, area, &mut self.sidebar);
    }

    fn summary_line(&self) -> Line<'static> {
        let browser = &self.browser;
        let mut spans = vec![Span::styled(
            format!(" {} ", browser.selected_table().unwrap_or("-")),
            Style::default().add_modifier(Modifier::BOLD),
        )];

        spans.push(Span::raw(format!(
            "│ Page {}/{} · Total rows: {} ",
            browser.page(),
            browser.total_pages(),
            browser.total_rows()
        )));

        match browser.error() {
            Some(error) => {
                spans.push(Span::styled(" DEGRADED ", pill_degraded_style()));
                spans.push(Span::styled(format!(" {}", error), TEXT_ERROR));
            }
            None => spans.push(Span::styled(" CONNECTED ", pill_ok_style())),
        }

        if browser.is_data_loading() || browser.is_search_pending() {
            spans.push(Span::styled("  ⏳ Loading...", TEXT_WARNING));
        }

        Line::from(spans)
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let raw = &self.browser.query().raw_search;
        let mut spans = vec![Span::raw(format!(" {}", raw))];
        if self.searching {
            spans.push(Span::styled("▏", cursor_style()));
        } else if raw.is_empty() {
            spans.push(Span::styled("Press '/' to search", TEXT_DIM));
        }

        let search = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_style(border_style(focused && self.searching)),
        );
        frame.render_widget(search, area);
    }

    fn draw_grid(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let config = PlaceholderConfig::new(" Rows ", focused)
            .with_empty_message("Select a table")
            .with_loading_message("Loading rows...");

        let has_data = !self.browser.columns().is_empty();
        if render_without_data(
            frame,
            area,
            self.browser.phase(),
            has_data,
            self.browser.error(),
            &config,
        ) {
            return;
        }

        let first = self.browser.first_position();
        let rows: Vec<Row> = self
            .browser
            .projected_rows()
            .into_iter()
            .enumerate()
            .map(|(index, cells)| {
                let mut row = vec![Cell::from(Span::styled(
                    (first + index as u64).to_string(),
                    TEXT_DIM,
                ))];
                row.extend(
                    cells
                        .iter()
                        .map(|text| Cell::from(truncate_text(text, MAX_CELL_CHARS))),
                );
                Row::new(row)
            })
            .collect();

        let mut header = vec![Cell::from("POS")];
        header.extend(self.browser.columns().iter().map(|c| Cell::from(c.clone())));

        let mut widths = vec![Constraint::Length(POS_WIDTH)];
        widths.extend(
            self.browser
                .columns()
                .iter()
                .map(|_| Constraint::Min(COLUMN_MIN_WIDTH)),
        );

        let title = if self.browser.phase() == Phase::Loading {
            " Rows (refreshing) ".to_string()
        } else {
            format!(" Rows ({}) ", self.browser.rows().len())
        };

        let table = Table::new(rows, widths)
            .header(Row::new(header).style(header_style()).bottom_margin(1))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border_style(focused && !self.searching)),
            )
            .row_highlight_style(row_highlight_style())
            .highlight_symbol(HIGHLIGHT_SYMBOL);

        frame.render_stateful_widget(table, area, &mut self.grid);
    }
}

impl Component for TablesView {
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        self.draw_sidebar(frame, columns[0], focused);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SUMMARY_HEIGHT),
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        let summary = Paragraph::new(self.summary_line()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(false)),
        );
        frame.render_widget(summary, main[0]);
        self.draw_search(frame, main[1], focused);
        self.draw_grid(frame, main[2], focused);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.searching {
            self.edit_search(key);
            return true;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_sidebar(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_sidebar(true),
            KeyCode::Enter => self.open_highlighted(),
            KeyCode::Char('n') | KeyCode::Right => {
                self.browser.next_page();
                self.grid = TableState::default();
            }
            KeyCode::Char('p') | KeyCode::Left => {
                self.browser.prev_page();
                self.grid = TableState::default();
            }
            KeyCode::Char('/') if self.browser.selected_table().is_some() => {
                self.searching = true;
            }
            KeyCode::Char('r') => self.browser.retry(),
            _ => return false,
        }
        true
    }

    fn tick(&mut self) {
        self.browser.process_pending();
    }

    fn activate(&mut self) {
        if !self.started {
            self.started = true;
            self.browser.initialize();
        }
    }

    fn is_capturing_input(&self) -> bool {
        self.searching
    }

    fn key_bindings(&self) -> Vec<KeyBinding> {
        if self.searching {
            return vec![KeyBinding::new("Enter/Esc", "Done")];
        }
        vec![
            KeyBinding::new("↑↓", "Table"),
            KeyBinding::new("Enter", "Open"),
            KeyBinding::new("n/p", "Page"),
            KeyBinding::new("/", "Search"),
            KeyBinding::new("r", "Retry"),
        ]
    }
}
