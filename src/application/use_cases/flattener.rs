// ============================================================
// JSON FLATTENER
// ============================================================
// Append columns extracted from JSON-object cells, per the configured
// per-column field selection. Purely additive: source columns are never
// mutated or removed, and generated names that already exist are skipped,
// so re-running with the same config is a no-op.

use super::detector::cell_as_json_object;
use crate::domain::options::FlattenConfig;
use crate::domain::{Cell, Table};
use serde_json::Value;

/// Flatten configured JSON columns, returning the new table and the number
/// of columns appended.
pub fn flatten(table: &Table, config: &FlattenConfig) -> (Table, usize) {
    // (source column index, enabled field) for every column we will append.
    let mut appended: Vec<(usize, String)> = Vec::new();
    let mut new_headers = table.headers.clone();

    for (column_name, column_config) in &config.columns {
        if !column_config.enabled {
            continue;
        }
        let Some(source_index) = table.column_index(column_name) else {
            // Unknown configured columns are ignored, never an error.
            continue;
        };

        for (field, enabled) in &column_config.fields {
            if !enabled {
                continue;
            }
            let generated = format!("{}_{}", column_name, field);
            if new_headers.contains(&generated) {
                continue;
            }
            new_headers.push(generated);
            appended.push((source_index, field.clone()));
        }
    }

    if appended.is_empty() {
        return (table.clone(), 0);
    }

    let original_width = table.headers.len();
    let mut new_rows = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let mut new_row = row.clone();
        new_row.resize(original_width, Cell::Missing);

        for (source_index, field) in &appended {
            let source = new_row
                .get(*source_index)
                .cloned()
                .unwrap_or(Cell::Missing);
            new_row.push(extract_field(&source, field));
        }
        new_rows.push(new_row);
    }

    let added = appended.len();
    (Table::new(new_headers, new_rows), added)
}

/// Pull one field out of a JSON-object cell. Missing source, parse failure,
/// absent key and JSON null all land on the missing marker.
fn extract_field(source: &Cell, field: &str) -> Cell {
    if source.is_blank() {
        return Cell::Missing;
    }
    let Some(object) = cell_as_json_object(source) else {
        return Cell::Missing;
    };
    match object.get(field) {
        None | Some(Value::Null) => Cell::Missing,
        Some(Value::String(s)) => Cell::from_field(s),
        Some(other) => Cell::Value(other.to_string()),
    }
}
