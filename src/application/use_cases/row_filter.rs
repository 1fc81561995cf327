// ============================================================
// ROW FILTER
// ============================================================
// Two independent sub-filters: drop fully blank rows, then apply a
// single-column predicate. Unknown columns or operators skip the predicate
// entirely rather than dropping rows.

use crate::domain::options::{ColumnFilter, FilterOperator, FilterOptions};
use crate::domain::{Cell, Table};
use tracing::warn;

/// Filter rows, returning the new table and the number of rows dropped.
pub fn filter_rows(table: &Table, options: &FilterOptions) -> (Table, usize) {
    let mut rows: Vec<Vec<Cell>> = table.rows.clone();

    if options.remove_empty_rows {
        rows.retain(|row| row.iter().any(|cell| !cell.is_blank()));
    }

    if let Some(column_filter) = &options.column_filter {
        rows = apply_column_filter(table, rows, column_filter);
    }

    let removed = table.row_count() - rows.len();
    (Table::new(table.headers.clone(), rows), removed)
}

fn apply_column_filter(
    table: &Table,
    rows: Vec<Vec<Cell>>,
    filter: &ColumnFilter,
) -> Vec<Vec<Cell>> {
    if !filter.enabled || filter.column.is_empty() || filter.value.is_empty() {
        return rows;
    }

    let Some(col) = table.column_index(&filter.column) else {
        warn!(column = %filter.column, "Column filter references an unknown column, skipping");
        return rows;
    };
    if filter.operator == FilterOperator::Unknown {
        warn!("Column filter uses an unknown operator, skipping");
        return rows;
    }

    let wanted = filter.value.to_lowercase();
    rows.into_iter()
        .filter(|row| {
            let cell_value = row
                .get(col)
                .map(|cell| cell.text().to_lowercase())
                .unwrap_or_default();
            match filter.operator {
                FilterOperator::Equals => cell_value == wanted,
                FilterOperator::Contains => cell_value.contains(&wanted),
                FilterOperator::NotEqual => cell_value != wanted,
                FilterOperator::Unknown => true,
            }
        })
        .collect()
}
