// ============================================================
// TYPE & JSON DETECTOR
// ============================================================
// Classify columns as numeric or text and spot JSON-object-bearing columns
// from a bounded row sample. Pure read of the table; individual cell parse
// failures are an explicit not-applicable branch, never an error.

use crate::domain::{Cell, Table};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Rows sampled per column for detection; keeps the pass cheap on large tables.
pub const SAMPLE_ROW_LIMIT: usize = 100;

/// A column is numeric when more than this fraction of present sampled cells parse.
const NUMERIC_THRESHOLD: f64 = 0.8;

/// A column is JSON-bearing when more than this fraction of sampled rows hold objects.
const JSON_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
}

/// Header -> inferred type. Derived and advisory: never rewrites stored cells.
pub type ColumnTypeMap = HashMap<String, ColumnType>;

/// JSON-bearing columns, in header order, plus the object keys observed in each.
#[derive(Debug, Clone, Default)]
pub struct JsonColumnInfo {
    pub columns: Vec<String>,
    pub fields: BTreeMap<String, BTreeSet<String>>,
}

impl JsonColumnInfo {
    pub fn is_json_column(&self, header: &str) -> bool {
        self.columns.iter().any(|c| c == header)
    }
}

/// Whether a cell's text parses as a real number.
pub fn is_numeric_string(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}

/// Parse a cell into a JSON object, or report it not applicable.
///
/// Only values that start with `{` after trimming are attempted, and only a
/// top-level object counts; arrays and scalars are not flatten candidates.
fn parse_json_object(cell: &Cell) -> Option<Map<String, Value>> {
    let text = cell.value()?.trim();
    if !text.starts_with('{') {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) | Err(_) => None,
    }
}

pub(crate) fn cell_as_json_object(cell: &Cell) -> Option<Map<String, Value>> {
    parse_json_object(cell)
}

/// Infer numeric/text per column from up to [`SAMPLE_ROW_LIMIT`] rows.
pub fn detect_column_types(table: &Table) -> ColumnTypeMap {
    let sample_size = table.row_count().min(SAMPLE_ROW_LIMIT);
    let mut types = ColumnTypeMap::new();

    for (col, header) in table.headers.iter().enumerate() {
        let mut present = 0usize;
        let mut numeric = 0usize;

        for row in 0..sample_size {
            let cell = table.cell(row, col);
            if cell.is_blank() {
                continue;
            }
            present += 1;
            if is_numeric_string(cell.text()) {
                numeric += 1;
            }
        }

        let column_type = if present > 0 && (numeric as f64) / (present as f64) > NUMERIC_THRESHOLD
        {
            ColumnType::Numeric
        } else {
            ColumnType::Text
        };
        types.insert(header.clone(), column_type);
    }

    types
}

/// Find JSON-object-bearing columns and the keys they expose.
pub fn detect_json_columns(table: &Table) -> JsonColumnInfo {
    let sample_size = table.row_count().min(SAMPLE_ROW_LIMIT);
    let mut info = JsonColumnInfo::default();

    for (col, header) in table.headers.iter().enumerate() {
        let mut json_count = 0usize;
        let mut keys = BTreeSet::new();

        for row in 0..sample_size {
            if let Some(object) = parse_json_object(table.cell(row, col)) {
                json_count += 1;
                keys.extend(object.keys().cloned());
            }
        }

        // Strict >: a column exactly at the threshold does not qualify.
        if (json_count as f64) > (sample_size as f64) * JSON_THRESHOLD {
            info.columns.push(header.clone());
            info.fields.insert(header.clone(), keys);
        }
    }

    info
}
