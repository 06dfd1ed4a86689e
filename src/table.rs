//! Row-oriented table data extracted from a PDF.
//!
//! Extraction yields ragged rows: each detected table has its own column
//! count, and merged or empty cells come back as `None`. [`TableData`] keeps
//! them exactly as found. No schema, no type coercion, no deduplication.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One cell of a detected table; `None` when the cell had no text.
pub type Cell = Option<String>;

/// One line of a detected table.
pub type Row = Vec<Cell>;

/// All rows from all tables on all pages, in page → table → row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    rows: Vec<Row>,
}

impl TableData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every row of one table, preserving order.
    pub fn push_table(&mut self, table: impl IntoIterator<Item = Row>) {
        self.rows.extend(table);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells as JSON values for the Sheets API. An empty cell becomes `""`
    /// so a re-run clears what an earlier run wrote there; Sheets skips
    /// `null` cells and would keep the old value.
    pub fn to_values(&self) -> Vec<Vec<Value>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(text) => Value::String(text.clone()),
                        None => Value::String(String::new()),
                    })
                    .collect()
            })
            .collect()
    }
}

impl From<Vec<Row>> for TableData {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}
