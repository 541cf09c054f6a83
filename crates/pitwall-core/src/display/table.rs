use crate::api::models::{Page, Tabular};
use crate::storage::keys::ApiKeyEntry;
use crate::utils::text::truncate_text;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use crossterm::terminal;

/// Longest cell text shown before truncation.
const MAX_CELL_WIDTH: usize = 60;

pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(color)
        } else {
            Cell::new(text).add_attribute(Attribute::Bold)
        }
    }

    fn colored_cell(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn new_table(&self, headers: &[&str], color: Color) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        let width = self
            .max_width
            .map(|w| if w > 20 { w - 6 } else { w.max(40) })
            .unwrap_or(80);
        table.set_width(width as u16);

        let cells: Vec<Cell> = headers.iter().map(|h| self.bold_header(h, color)).collect();
        table.set_header(cells);
        table
    }

    /// One page of a remote table with a leading `POS` column.
    ///
    /// `first_position` is the 1-based position of the first row across
    /// all pages, i.e. `(page - 1) * page_size + 1`.
    pub fn render_page(&self, page: &Page, first_position: u64) -> String {
        if page.columns.is_empty() {
            return "No columns.".to_string();
        }
        if page.rows.is_empty() {
            return "No rows.".to_string();
        }

        let mut headers = vec!["POS"];
        headers.extend(page.columns.iter().map(String::as_str));
        let mut table = self.new_table(&headers, Color::Green);

        for (index, row) in page.projected_rows().into_iter().enumerate() {
            let position = first_position + index as u64;
            let mut cells = vec![
                self.colored_cell(&position.to_string(), Color::DarkGrey)
                    .set_alignment(CellAlignment::Right),
            ];
            cells.extend(
                row.iter()
                    .map(|text| Cell::new(truncate_text(text, MAX_CELL_WIDTH))),
            );
            table.add_row(cells);
        }

        table.to_string()
    }

    /// Ranked records (leaderboard, constructor standings).
    pub fn render_records<T: Tabular>(&self, records: &[T]) -> String {
        if records.is_empty() {
            return "No results.".to_string();
        }

        let mut headers = vec!["POS"];
        headers.extend(T::headers());
        let mut table = self.new_table(&headers, Color::Cyan);

        for (index, record) in records.iter().enumerate() {
            let mut cells = vec![
                self.colored_cell(&(index + 1).to_string(), Color::DarkGrey)
                    .set_alignment(CellAlignment::Right),
            ];
            cells.extend(record.cells().into_iter().map(Cell::new));
            table.add_row(cells);
        }

        table.to_string()
    }

    /// Two-column label/value table.
    pub fn render_fields(&self, fields: &[(&str, String)]) -> String {
        let mut table = self.new_table(&["Field", "Value"], Color::Cyan);
        for (label, value) in fields {
            table.add_row(vec![
                self.colored_cell(label, Color::Yellow),
                Cell::new(value),
            ]);
        }
        table.to_string()
    }

    /// Saved keys with masked secrets.
    pub fn render_keys(&self, keys: &[ApiKeyEntry]) -> String {
        if keys.is_empty() {
            return "No keys saved yet.".to_string();
        }

        let mut table = self.new_table(&["ID", "Label", "Provider", "Key", "Created"], Color::Cyan);
        for entry in keys {
            table.add_row(vec![
                self.colored_cell(&entry.id, Color::DarkGrey),
                Cell::new(&entry.label),
                Cell::new(&entry.provider),
                Cell::new(entry.masked_key()),
                Cell::new(entry.created_at.format("%Y-%m-%d %H:%M").to_string()),
            ]);
        }
        table.to_string()
    }

    pub fn render_tables(&self, tables: &[String]) -> String {
        if tables.is_empty() {
            return "No tables found.".to_string();
        }

        let mut table = self.new_table(&["#", "Table"], Color::Cyan);
        for (index, name) in tables.iter().enumerate() {
            table.add_row(vec![
                self.colored_cell(&(index + 1).to_string(), Color::DarkGrey),
                Cell::new(name),
            ]);
        }
        table.to_string()
    }
}
