// ============================================================
// TABLE ANALYZER
// ============================================================
// Read-only views over a table: bounded preview, summary statistics and
// per-column value distributions. Shared by every operation's result.

use super::detector::{ColumnType, ColumnTypeMap, JsonColumnInfo};
use crate::domain::Table;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Rows included in result previews.
pub const PREVIEW_ROW_LIMIT: usize = 20;

/// Distinct values reported per column distribution.
pub const DISTRIBUTION_VALUE_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ColumnTypeCounts {
    pub text: usize,
    pub numeric: usize,
    pub json: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_rows: usize,
    pub total_columns: usize,
    pub missing_data_percentage: f64,
    pub column_types: ColumnTypeCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    pub values: Vec<String>,
    pub counts: Vec<usize>,
}

/// First [`PREVIEW_ROW_LIMIT`] rows as header-keyed objects, missing as null.
pub fn preview(table: &Table) -> Vec<Value> {
    row_objects(table, PREVIEW_ROW_LIMIT)
}

/// All rows as header-keyed objects (the `processedData` payload).
pub fn all_row_objects(table: &Table) -> Vec<Value> {
    row_objects(table, table.row_count())
}

fn row_objects(table: &Table, limit: usize) -> Vec<Value> {
    let headers = table.write_headers();
    table
        .rows
        .iter()
        .take(limit)
        .map(|row| {
            let object: serde_json::Map<String, Value> = headers
                .iter()
                .enumerate()
                .map(|(col, header)| {
                    let value = row.get(col).map_or(Value::Null, |cell| cell.to_json());
                    (header.clone(), value)
                })
                .collect();
            Value::Object(object)
        })
        .collect()
}

/// Summary statistics over the current table shape.
pub fn summary_stats(
    table: &Table,
    column_types: &ColumnTypeMap,
    json_info: &JsonColumnInfo,
) -> SummaryStats {
    let total_rows = table.row_count();
    let total_columns = table.column_count();

    let total_cells = total_rows * total_columns;
    let missing_cells: usize = (0..total_columns)
        .map(|col| table.column(col).filter(|cell| cell.is_missing()).count())
        .sum();
    let missing_data_percentage = if total_cells > 0 {
        (missing_cells as f64 / total_cells as f64) * 100.0
    } else {
        0.0
    };

    let json = json_info.columns.len();
    let numeric = table
        .headers
        .iter()
        .filter(|header| !json_info.is_json_column(header))
        .filter(|header| column_types.get(header.as_str()) == Some(&ColumnType::Numeric))
        .count();
    let text = total_columns - json - numeric;

    SummaryStats {
        total_rows,
        total_columns,
        missing_data_percentage,
        column_types: ColumnTypeCounts {
            text,
            numeric,
            json,
        },
    }
}

/// Top-N value distributions for non-JSON columns, counted by descending
/// frequency with ties broken by first appearance. Columns with no present
/// values are omitted.
pub fn distributions(table: &Table, json_info: &JsonColumnInfo) -> BTreeMap<String, Distribution> {
    let mut result = BTreeMap::new();

    for (col, header) in table.headers.iter().enumerate() {
        if json_info.is_json_column(header) {
            continue;
        }

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for cell in table.column(col) {
            let Some(value) = cell.value() else { continue };
            if !counts.contains_key(value) {
                order.push(value.to_string());
            }
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        if order.is_empty() {
            continue;
        }

        let mut ranked: Vec<(String, usize)> = order
            .into_iter()
            .map(|value| {
                let count = counts[&value];
                (value, count)
            })
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(DISTRIBUTION_VALUE_LIMIT);

        result.insert(
            header.clone(),
            Distribution {
                values: ranked.iter().map(|(v, _)| v.clone()).collect(),
                counts: ranked.iter().map(|(_, c)| *c).collect(),
            },
        );
    }

    result
}
