// ============================================================
// MISSING-DATA IMPUTER
// ============================================================
// Classify cells against the canonical missing vocabulary, then remove or
// fill per the configured strategy. Fill statistics are computed once per
// column from the pre-fill table, not per cell.

use super::detector::{ColumnType, ColumnTypeMap};
use super::statistics::{column_statistics, ColumnStatistics};
use crate::domain::options::{FillMethod, MissingDataOptions, MissingStrategy};
use crate::domain::report::MissingDataReport;
use crate::domain::{Cell, Table};
use std::collections::HashMap;

/// Tokens treated as missing after trimming and lowercasing, in addition to
/// the explicit missing marker and blank values.
pub const MISSING_TOKENS: [&str; 10] = [
    "null", "none", "nan", "na", "n/a", "#n/a", "nil", "missing", "?", "-",
];

/// Whether a cell is missing under the canonical vocabulary.
pub fn is_missing_cell(cell: &Cell) -> bool {
    match cell.value() {
        None => true,
        Some(text) => {
            let trimmed = text.trim();
            trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed.to_lowercase().as_str())
        }
    }
}

/// Apply the configured missing-data strategy.
pub fn impute(
    table: &Table,
    options: &MissingDataOptions,
    column_types: &ColumnTypeMap,
) -> (Table, MissingDataReport) {
    let mut report = MissingDataReport::default();

    match options.strategy {
        MissingStrategy::Keep | MissingStrategy::Unknown => (table.clone(), report),

        MissingStrategy::Remove => {
            let rows: Vec<Vec<Cell>> = table
                .rows
                .iter()
                .filter(|row| !row.iter().any(is_missing_cell))
                .cloned()
                .collect();
            report.rows_removed = table.row_count() - rows.len();
            (Table::new(table.headers.clone(), rows), report)
        }

        MissingStrategy::RemoveSpecific => {
            let indices: Vec<usize> = options
                .specific_columns
                .iter()
                .filter_map(|name| table.column_index(name))
                .collect();
            // No columns selected behaves like keep.
            if indices.is_empty() {
                return (table.clone(), report);
            }

            let rows: Vec<Vec<Cell>> = table
                .rows
                .iter()
                .filter(|row| {
                    !indices
                        .iter()
                        .any(|&i| is_missing_cell(row.get(i).unwrap_or(&Cell::Missing)))
                })
                .cloned()
                .collect();
            report.rows_removed = table.row_count() - rows.len();
            (Table::new(table.headers.clone(), rows), report)
        }

        MissingStrategy::Fill | MissingStrategy::SmartFill => {
            let rows = filled_rows(table, options, column_types, &mut report);
            (Table::new(table.headers.clone(), rows), report)
        }
    }
}

/// Pre-compute per-column statistics when the fill path needs them.
fn fill_statistics(
    table: &Table,
    options: &MissingDataOptions,
) -> HashMap<usize, ColumnStatistics> {
    let needs_stats = options.strategy == MissingStrategy::SmartFill
        || matches!(
            options.fill_method,
            FillMethod::Mean | FillMethod::Median | FillMethod::Mode
        );
    if !needs_stats {
        return HashMap::new();
    }

    (0..table.column_count())
        .map(|col| (col, column_statistics(table.column(col))))
        .collect()
}

fn filled_rows(
    table: &Table,
    options: &MissingDataOptions,
    column_types: &ColumnTypeMap,
    report: &mut MissingDataReport,
) -> Vec<Vec<Cell>> {
    let stats = fill_statistics(table, options);

    table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    if !is_missing_cell(cell) {
                        return cell.clone();
                    }
                    let header = table.headers.get(col).cloned().unwrap_or_default();
                    let (value, method) =
                        fill_value_for(col, &header, options, column_types, &stats);
                    report.cells_filled += 1;
                    report.fill_methods_used.insert(header, method.to_string());
                    Cell::Value(value)
                })
                .collect()
        })
        .collect()
}

/// Pick the replacement value and the method label recorded for the column.
fn fill_value_for(
    col: usize,
    header: &str,
    options: &MissingDataOptions,
    column_types: &ColumnTypeMap,
    stats: &HashMap<usize, ColumnStatistics>,
) -> (String, &'static str) {
    if options.strategy == MissingStrategy::SmartFill {
        if column_types.get(header) == Some(&ColumnType::Numeric) {
            return match stats.get(&col).and_then(|s| s.mean) {
                Some(mean) => (format_statistic(mean), "mean"),
                None => ("0".to_string(), "zero"),
            };
        }
        return (options.fill_value.clone(), "default");
    }

    match options.fill_method {
        FillMethod::Zero => ("0".to_string(), "zero"),
        FillMethod::Mean => statistic_or_fallback(stats.get(&col).and_then(|s| s.mean), options, "mean"),
        FillMethod::Median => {
            statistic_or_fallback(stats.get(&col).and_then(|s| s.median), options, "median")
        }
        FillMethod::Mode => statistic_or_fallback(stats.get(&col).and_then(|s| s.mode), options, "mode"),
        FillMethod::Custom | FillMethod::Unknown => (options.fill_value.clone(), "custom"),
    }
}

fn statistic_or_fallback(
    statistic: Option<f64>,
    options: &MissingDataOptions,
    method: &'static str,
) -> (String, &'static str) {
    match statistic {
        Some(value) => (format_statistic(value), method),
        None => (options.fill_value.clone(), method),
    }
}

fn format_statistic(value: f64) -> String {
    value.to_string()
}
