use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque dataset identifier as returned by `/api/tables`.
pub type TableName = String;

/// One row of a remote table, keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// Response of `GET /api/tables`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableList {
    #[serde(default)]
    pub tables: Vec<TableName>,
}

/// Parameters for a single page request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            search: String::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

/// Response of `GET /api/tables/{table}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub total_rows: u64,
}

impl Page {
    /// Project a row onto the page's column list, in column order.
    ///
    /// Keys not listed in `columns` are ignored; missing keys become "".
    pub fn project_row(&self, row: &Row) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| row.get(column).map(cell_text).unwrap_or_default())
            .collect()
    }

    /// All rows projected onto the column list.
    pub fn projected_rows(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| self.project_row(row)).collect()
    }
}

/// Total pages for a result of `total_rows` rows, never less than one.
pub fn total_pages(total_rows: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total_rows.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Render a scalar cell for display. Null renders as the empty string.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Format a points total without a trailing `.0` for whole numbers.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 && points.abs() < 1e15 {
        format!("{}", points as i64)
    } else {
        format!("{}", points)
    }
}

/// Numeric aggregates may arrive as JSON numbers or as decimal strings.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numeric {
        Number(f64),
        Text(String),
        Missing(()),
    }

    match Numeric::deserialize(deserializer)? {
        Numeric::Number(n) => Ok(n),
        Numeric::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
        Numeric::Missing(()) => Ok(0.0),
    }
}

fn count_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = number_or_string(deserializer)?;
    if value < 0.0 {
        return Err(serde::de::Error::custom("count cannot be negative"));
    }
    Ok(value as u64)
}

/// A row-shaped record that can be rendered as a table line.
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

/// Entry of `GET /api/core/leaderboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub driver_id: i64,
    pub driver_name: String,
    #[serde(deserialize_with = "number_or_string")]
    pub total_points: f64,
}

impl Tabular for LeaderboardEntry {
    fn headers() -> Vec<&'static str> {
        vec!["Driver", "Total Points", "Driver ID"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.driver_name.clone(),
            format_points(self.total_points),
            self.driver_id.to_string(),
        ]
    }
}

/// Entry of `GET /api/core/constructors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorStanding {
    pub constructor_id: i64,
    pub constructor_name: String,
    #[serde(deserialize_with = "number_or_string")]
    pub total_points: f64,
}

impl Tabular for ConstructorStanding {
    fn headers() -> Vec<&'static str> {
        vec!["Constructor", "Total Points", "Constructor ID"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.constructor_name.clone(),
            format_points(self.total_points),
            self.constructor_id.to_string(),
        ]
    }
}

/// Response of `GET /api/core/drivers/{id}/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStats {
    pub driver_id: i64,
    pub driver_name: String,
    #[serde(deserialize_with = "count_or_string")]
    pub races: u64,
    #[serde(deserialize_with = "count_or_string")]
    pub wins: u64,
    #[serde(deserialize_with = "count_or_string")]
    pub podiums: u64,
    #[serde(deserialize_with = "number_or_string")]
    pub total_points: f64,
}

impl DriverStats {
    /// Label/value pairs in display order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Driver", self.driver_name.clone()),
            ("Races", self.races.to_string()),
            ("Wins", self.wins.to_string()),
            ("Podiums", self.podiums.to_string()),
            ("Total Points", format_points(self.total_points)),
            ("Driver ID", self.driver_id.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_ignores_extra_keys() {
        let page: Page = serde_json::from_value(json!({
            "schema": "core",
            "table": "drivers",
            "page": 1,
            "page_size": 25,
            "total_pages": 4,
            "total_rows": 80,
            "columns": ["driver_id", "surname"],
            "rows": [{"driver_id": 1, "surname": "Hamilton"}]
        }))
        .expect("page should parse");

        assert_eq!(page.total_rows, 80);
        assert_eq!(page.columns, vec!["driver_id", "surname"]);
        assert_eq!(page.rows.len(), 1);
    }

    #[test]
    fn test_page_defaults_missing_fields() {
        let page: Page = serde_json::from_value(json!({})).expect("empty page should parse");
        assert!(page.columns.is_empty());
        assert!(page.rows.is_empty());
        assert_eq!(page.total_rows, 0);
    }

    #[test]
    fn test_project_row_follows_column_order() {
        let page: Page = serde_json::from_value(json!({
            "columns": ["b", "a", "missing"],
            "rows": [{"a": 1, "b": "x", "unlisted": true}],
            "total_rows": 1
        }))
        .expect("page should parse");

        assert_eq!(page.projected_rows(), vec![vec!["x", "1", ""]]);
    }

    #[test]
    fn test_cell_text_scalars() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&json!(12.5)), "12.5");
        assert_eq!(cell_text(&json!("monza")), "monza");
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 25), 1);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        assert_eq!(total_pages(1000, 25), 40);
        assert_eq!(total_pages(10, 0), 10);
    }

    #[test]
    fn test_points_accept_strings_and_numbers() {
        let entries: Vec<LeaderboardEntry> = serde_json::from_value(json!([
            {"driver_id": 1, "driver_name": "Lewis Hamilton", "total_points": 4639.5},
            {"driver_id": 20, "driver_name": "Sebastian Vettel", "total_points": "3098"}
        ]))
        .expect("leaderboard should parse");

        assert_eq!(entries[0].total_points, 4639.5);
        assert_eq!(entries[1].total_points, 3098.0);
        assert_eq!(entries[1].cells(), vec!["Sebastian Vettel", "3098", "20"]);
    }

    #[test]
    fn test_null_points_read_as_zero() {
        let entry: LeaderboardEntry = serde_json::from_value(json!(
            {"driver_id": 3, "driver_name": "Reserve", "total_points": null}
        ))
        .expect("null points should parse");
        assert_eq!(entry.total_points, 0.0);
    }

    #[test]
    fn test_driver_stats_fields() {
        let stats: DriverStats = serde_json::from_value(json!({
            "driver_id": 1,
            "driver_name": "Lewis Hamilton",
            "races": 356,
            "wins": "105",
            "podiums": 202,
            "total_points": 4639.5
        }))
        .expect("stats should parse");

        let fields = stats.fields();
        assert_eq!(fields[0], ("Driver", "Lewis Hamilton".to_string()));
        assert_eq!(fields[2], ("Wins", "105".to_string()));
        assert_eq!(fields[4], ("Total Points", "4639.5".to_string()));
    }
}
