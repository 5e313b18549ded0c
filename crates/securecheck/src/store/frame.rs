//! In-memory tabular result set.

use std::fmt;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// One value in a [`Frame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// SQL `NULL`.
    Null,
    /// Whole number.
    Integer(i64),
    /// Floating point; every real column in the catalog is a percentage.
    Real(f64),
    /// Text.
    Text(String),
}

impl Cell {
    /// The integer value, if this cell holds one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// A numeric view of the cell, for charting and rate checks.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Check if this cell is `NULL`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v:.2}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Integer(v) => Self::Integer(v),
            Value::Real(v) => Self::Real(v),
            Value::Text(s) => Self::Text(s),
            Value::Blob(bytes) => Self::Text(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Rows plus column names, as materialized from one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Build a frame. Every row must have one cell per column.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// A frame with zero rows and zero columns.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Column names in select order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the frame holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over the cells of the named column. Empty if it doesn't exist.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Cell> + 'a {
        let index = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| index.map(|i| &row[i]))
    }

    /// Rewrite every cell of the named column. No-op if the column is absent.
    pub fn map_column(&mut self, name: &str, f: impl Fn(&Cell) -> Cell) {
        if let Some(i) = self.column_index(name) {
            for row in &mut self.rows {
                row[i] = f(&row[i]);
            }
        }
    }

    /// The first `n` rows as a new frame.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Reduce a stop-time value to its time component for display.
///
/// Keeps the last whitespace-separated token, so `"0 days 14:30:00"` and
/// `"14:30:00"` both show as `14:30:00`. `NULL` becomes an empty string.
#[must_use]
pub fn time_component(cell: &Cell) -> Cell {
    if cell.is_null() {
        return Cell::Text(String::new());
    }
    let text = cell.to_string();
    let last = text.split_whitespace().last().unwrap_or_default();
    Cell::Text(last.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        Frame::new(
            vec!["violation".to_string(), "count".to_string()],
            vec![
                vec![Cell::from("Speeding"), Cell::from(4)],
                vec![Cell::from("Seatbelt"), Cell::from(2)],
            ],
        )
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::empty();
        assert!(frame.is_empty());
        assert!(frame.columns().is_empty());
        assert_eq!(frame.len(), 0);
    }

    #[test]
    fn test_column_lookup() {
        let frame = sample_frame();
        assert_eq!(frame.column_index("count"), Some(1));
        assert_eq!(frame.column_index("missing"), None);

        let counts: Vec<i64> = frame.column("count").filter_map(Cell::as_i64).collect();
        assert_eq!(counts, vec![4, 2]);
        assert_eq!(frame.column("missing").count(), 0);
    }

    #[test]
    fn test_map_column() {
        let mut frame = sample_frame();
        frame.map_column("violation", |c| Cell::Text(c.to_string().to_uppercase()));
        assert_eq!(frame.rows()[0][0], Cell::from("SPEEDING"));

        // Absent column leaves the frame untouched.
        let before = frame.clone();
        frame.map_column("stop_time", time_component);
        assert_eq!(frame, before);
    }

    #[test]
    fn test_head() {
        let frame = sample_frame();
        assert_eq!(frame.head(1).len(), 1);
        assert_eq!(frame.head(10).len(), 2);
        assert_eq!(frame.head(0).columns().len(), 2);
    }

    #[test]
    fn test_time_component() {
        assert_eq!(time_component(&Cell::from("14:30:00")), Cell::from("14:30:00"));
        assert_eq!(
            time_component(&Cell::from("0 days 14:30:00")),
            Cell::from("14:30:00")
        );
        assert_eq!(
            time_component(&Cell::from("2024-01-05 07:15:00")),
            Cell::from("07:15:00")
        );
        assert_eq!(time_component(&Cell::Null), Cell::from(""));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Integer(7).to_string(), "7");
        assert_eq!(Cell::Real(50.0).to_string(), "50.00");
        assert_eq!(Cell::Real(33.33).to_string(), "33.33");
        assert_eq!(Cell::from("Day").to_string(), "Day");
    }

    #[test]
    fn test_cell_from_sql_value() {
        assert_eq!(Cell::from(Value::Null), Cell::Null);
        assert_eq!(Cell::from(Value::Integer(3)), Cell::Integer(3));
        assert_eq!(Cell::from(Value::Real(1.5)), Cell::Real(1.5));
        assert_eq!(Cell::from(Value::Blob(b"abc".to_vec())), Cell::from("abc"));
    }

    #[test]
    fn test_frame_serializes_untagged_cells() {
        let json = serde_json::to_string(&sample_frame()).unwrap();
        assert_eq!(
            json,
            r#"{"columns":["violation","count"],"rows":[["Speeding",4],["Seatbelt",2]]}"#
        );
    }
}
