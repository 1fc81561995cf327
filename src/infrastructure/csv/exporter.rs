// ============================================================
// TABLE EXPORTER
// ============================================================
// Serialize a table to one of the supported output formats.

use crate::domain::error::{AppError, Result};
use crate::domain::Table;
use serde_json::{Map, Value};
use tracing::warn;

/// Serialize the table as `format`. Duplicate headers get the same
/// positional suffixes the rest of the output surfaces use.
pub fn export_table(table: &Table, format: &str, include_headers: bool) -> Result<String> {
    match format {
        "csv" => export_csv(table, include_headers),
        "json" => export_json(table),
        "xlsx" => {
            // No spreadsheet writer in the stack; emit CSV, which the
            // caller can open in any spreadsheet tool.
            warn!("xlsx export not available, falling back to CSV");
            export_csv(table, include_headers)
        }
        other => Err(AppError::ExportError(format!(
            "Unsupported export format: {}",
            other
        ))),
    }
}

fn export_csv(table: &Table, include_headers: bool) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if include_headers {
        writer
            .write_record(table.write_headers())
            .map_err(|e| AppError::ExportError(format!("Failed to write headers: {}", e)))?;
    }

    let width = table.column_count();
    for row in &table.rows {
        let record: Vec<&str> = (0..width)
            .map(|idx| row.get(idx).map_or("", |cell| cell.text()))
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| AppError::ExportError(format!("Failed to write row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::ExportError(format!("Failed to flush CSV output: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::ExportError(format!("CSV output was not valid UTF-8: {}", e)))
}

fn export_json(table: &Table) -> Result<String> {
    let headers = table.write_headers();
    let objects: Vec<Value> = (0..table.row_count())
        .map(|row_idx| {
            let mut object = Map::new();
            for (col_idx, header) in headers.iter().enumerate() {
                object.insert(header.clone(), table.cell(row_idx, col_idx).to_json());
            }
            Value::Object(object)
        })
        .collect();

    serde_json::to_string_pretty(&objects)
        .map_err(|e| AppError::ExportError(format!("Failed to serialize JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cell;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| Cell::from_field(v)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_export_csv_with_headers() {
        let t = table(&["a", "b"], &[&["1", "2"], &["3", "4"]]);
        let out = export_table(&t, "csv", true).unwrap();
        assert_eq!(out, "a,b\n1,2\n3,4\n");
    }

    #[test]
    fn test_export_csv_without_headers() {
        let t = table(&["a", "b"], &[&["1", "2"]]);
        let out = export_table(&t, "csv", false).unwrap();
        assert_eq!(out, "1,2\n");
    }

    #[test]
    fn test_missing_cells_export_as_empty_fields() {
        let t = table(&["a", "b"], &[&["1", ""]]);
        let out = export_table(&t, "csv", true).unwrap();
        assert_eq!(out, "a,b\n1,\n");
    }

    #[test]
    fn test_duplicate_headers_get_suffixes() {
        let t = table(&["name", "name"], &[&["x", "y"]]);
        let out = export_table(&t, "csv", true).unwrap();
        assert_eq!(out, "name,name_2\nx,y\n");
    }

    #[test]
    fn test_export_json() {
        let t = table(&["a", "b"], &[&["1", ""]]);
        let out = export_table(&t, "json", true).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["a"], serde_json::json!("1"));
        assert_eq!(parsed[0]["b"], serde_json::Value::Null);
    }

    #[test]
    fn test_xlsx_falls_back_to_csv() {
        let t = table(&["a"], &[&["1"]]);
        let out = export_table(&t, "xlsx", true).unwrap();
        assert_eq!(out, "a\n1\n");
    }

    #[test]
    fn test_unsupported_format() {
        let t = table(&["a"], &[&["1"]]);
        let err = export_table(&t, "parquet", true).unwrap_err();
        assert!(matches!(err, AppError::ExportError(_)));
    }
}
