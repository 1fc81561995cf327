// ============================================================
// TABLE TYPES
// ============================================================
// In-memory tabular data: ordered headers + rows of cells.
// No transformation logic lives here.

use serde::{Deserialize, Serialize};

/// A single cell value: either a raw string or an explicit missing marker.
///
/// Absence is never encoded as a sentinel string; transforms that need the
/// broader "missing vocabulary" (`n/a`, `null`, ...) layer that check on top
/// of present values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Value(String),
    Missing,
}

impl Cell {
    /// Build a cell from a raw CSV field. Empty fields become the missing marker.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Cell::Missing
        } else {
            Cell::Value(field.to_string())
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::Missing => None,
        }
    }

    /// The cell's text, with the missing marker rendered as an empty string.
    pub fn text(&self) -> &str {
        self.value().unwrap_or("")
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Missing, empty, or all-whitespace.
    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// JSON rendering used by previews and row-object output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Cell::Value(v) => serde_json::Value::String(v.clone()),
            Cell::Missing => serde_json::Value::Null,
        }
    }
}

impl From<&str> for Cell {
    fn from(field: &str) -> Self {
        Cell::from_field(field)
    }
}

/// Ordered column names plus positionally aligned rows.
///
/// Invariant: every row is at most as long as `headers`; reads treat absent
/// trailing cells as missing. Duplicate header names are tolerated in memory
/// and only disambiguated when writing (see [`Table::write_headers`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

const MISSING: Cell = Cell::Missing;

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cell at (row, column); out-of-range columns read as missing.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&MISSING)
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Iterate one column's cells across all rows.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> {
        self.rows
            .iter()
            .map(move |row| row.get(col).unwrap_or(&MISSING))
    }

    /// Header names disambiguated for write boundaries: the second occurrence
    /// of `name` becomes `name_2`, then `name_3`, skipping names already taken.
    pub fn write_headers(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::with_capacity(self.headers.len());
        for header in &self.headers {
            if !seen.contains(header) {
                seen.push(header.clone());
                continue;
            }
            let mut suffix = 2;
            loop {
                let candidate = format!("{}_{}", header, suffix);
                if !seen.contains(&candidate) {
                    seen.push(candidate);
                    break;
                }
                suffix += 1;
            }
        }
        seen
    }
}
