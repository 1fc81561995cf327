// ============================================================
// STRING CLEANER
// ============================================================
// Trim/case/punctuation rules applied to string cells in the selected
// columns. A cell counts as cleaned only when its value actually changed;
// missing cells pass through untouched.

use crate::domain::options::StringCleaningOptions;
use crate::domain::report::StringCleaningReport;
use crate::domain::{Cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;

// Punctuation at the end of the string only, never mid-string.
static TRAILING_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]+$").expect("valid regex"));

pub fn clean_strings(
    table: &Table,
    options: &StringCleaningOptions,
) -> (Table, StringCleaningReport) {
    let mut report = StringCleaningReport::default();
    if !options.enabled {
        return (table.clone(), report);
    }

    let target_columns: Vec<bool> = table
        .headers
        .iter()
        .map(|header| {
            options.specific_columns.is_empty() || options.specific_columns.contains(header)
        })
        .collect();

    let rows: Vec<Vec<Cell>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    if !target_columns.get(col).copied().unwrap_or(false) {
                        return cell.clone();
                    }
                    let Some(original) = cell.value() else {
                        return cell.clone();
                    };
                    let cleaned = clean_value(original, options);
                    if cleaned != original {
                        report.fields_cleaned += 1;
                        Cell::from_field(&cleaned)
                    } else {
                        cell.clone()
                    }
                })
                .collect()
        })
        .collect();

    if options.trim_whitespace {
        report.operations_applied.push("trim_whitespace".to_string());
    }
    if options.lowercase {
        report.operations_applied.push("lowercase".to_string());
    }
    if options.remove_punctuation {
        report
            .operations_applied
            .push("remove_punctuation".to_string());
    }

    (Table::new(table.headers.clone(), rows), report)
}

fn clean_value(value: &str, options: &StringCleaningOptions) -> String {
    let mut cleaned = value.to_string();

    if options.trim_whitespace {
        cleaned = cleaned.trim().to_string();
    }
    if options.lowercase {
        cleaned = cleaned.to_lowercase();
    }
    if options.remove_punctuation {
        cleaned = TRAILING_PUNCTUATION.replace(&cleaned, "").into_owned();
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| Cell::from_field(v)).collect())
                .collect(),
        )
    }

    fn enabled_options() -> StringCleaningOptions {
        StringCleaningOptions {
            enabled: true,
            ..StringCleaningOptions::default()
        }
    }

    #[test]
    fn test_disabled_is_identity() {
        let input = table(&["a"], &[&["  messy  "]]);
        let (output, report) = clean_strings(&input, &StringCleaningOptions::default());
        assert_eq!(output, input);
        assert_eq!(report.fields_cleaned, 0);
        assert!(report.operations_applied.is_empty());
    }

    #[test]
    fn test_trim_counts_only_changed_cells() {
        let input = table(&["a", "b"], &[&["  x  ", "y"], &["z", "  w"]]);
        let (output, report) = clean_strings(&input, &enabled_options());
        assert_eq!(output.cell(0, 0).text(), "x");
        assert_eq!(output.cell(1, 1).text(), "w");
        assert_eq!(report.fields_cleaned, 2);
        assert_eq!(report.operations_applied, vec!["trim_whitespace"]);
    }

    #[test]
    fn test_trailing_punctuation_run_only() {
        let options = StringCleaningOptions {
            remove_punctuation: true,
            ..enabled_options()
        };
        let input = table(&["a"], &[&["keep-dash inside!!?"], &["no.dots.here"]]);
        let (output, report) = clean_strings(&input, &options);
        assert_eq!(output.cell(0, 0).text(), "keep-dash inside");
        assert_eq!(output.cell(1, 0).text(), "no.dots.here");
        assert_eq!(report.fields_cleaned, 1);
    }

    #[test]
    fn test_specific_columns_scope() {
        let options = StringCleaningOptions {
            lowercase: true,
            specific_columns: vec!["b".to_string()],
            ..enabled_options()
        };
        let input = table(&["a", "b"], &[&["LOUD", "ALSO LOUD"]]);
        let (output, _) = clean_strings(&input, &options);
        assert_eq!(output.cell(0, 0).text(), "LOUD");
        assert_eq!(output.cell(0, 1).text(), "also loud");
    }

    #[test]
    fn test_missing_cells_pass_through() {
        let input = Table::new(
            vec!["a".to_string()],
            vec![vec![Cell::Missing]],
        );
        let (output, report) = clean_strings(&input, &enabled_options());
        assert!(output.cell(0, 0).is_missing());
        assert_eq!(report.fields_cleaned, 0);
    }
}
