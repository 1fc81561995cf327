// ============================================================
// PIPELINE ORCHESTRATOR
// ============================================================
// Sequence the transforms for the requested operation and assemble the
// result envelope. This is the only component aware of operation semantics;
// every stage it calls is a pure table-to-table (or table-to-report)
// transform. Each invocation builds everything fresh; nothing persists
// across calls.

use super::analyzer::{all_row_objects, distributions, preview, summary_stats, Distribution, SummaryStats};
use super::detector::{detect_column_types, detect_json_columns};
use super::flattener::flatten;
use super::imputer::impute;
use super::normalizer::normalize_headers;
use super::row_filter::filter_rows;
use super::string_cleaner::clean_strings;
use crate::domain::error::{AppError, Result};
use crate::domain::options::ProcessOptions;
use crate::domain::report::CleaningReport;
use crate::domain::Table;
use crate::infrastructure::csv::export_table;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analyze,
    Flatten,
    Clean,
    Export,
}

impl FromStr for Operation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "analyze" => Ok(Operation::Analyze),
            "flatten" => Ok(Operation::Flatten),
            "clean" => Ok(Operation::Clean),
            "export" => Ok(Operation::Export),
            other => Err(AppError::ValidationError(format!(
                "Unknown operation: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    pub rows: usize,
    pub columns: usize,
    pub json_columns: Vec<String>,
    pub json_fields: BTreeMap<String, Vec<String>>,
    pub preview: Vec<Value>,
    pub stats: SummaryStats,
    pub distributions: BTreeMap<String, Distribution>,
    pub column_names: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedResult {
    pub processed_data: Vec<Value>,
    pub preview: Vec<Value>,
    pub stats: SummaryStats,
    pub column_names: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaning_report: Option<CleaningReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub export_data: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PipelineOutcome {
    Analysis(AnalyzeResult),
    Processed(ProcessedResult),
    Export(ExportResult),
}

/// Run one operation end-to-end over an already-parsed table.
pub fn process(table: Table, operation: Operation, options: &ProcessOptions) -> Result<PipelineOutcome> {
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        operation = ?operation,
        "Starting pipeline run"
    );

    match operation {
        Operation::Analyze => Ok(PipelineOutcome::Analysis(analyze(&table))),

        Operation::Flatten => {
            let flattened = match &options.config {
                Some(config) => {
                    let (flattened, added) = flatten(&table, config);
                    debug!(columns_added = added, "Flatten operation complete");
                    flattened
                }
                None => table,
            };
            Ok(PipelineOutcome::Processed(processed_result(&flattened, None)))
        }

        Operation::Clean => {
            let mut report = CleaningReport::new(table.row_count(), table.column_count());
            let cleaned = run_transforms(table, options, Some(&mut report));
            report.finish(cleaned.row_count(), cleaned.column_count());
            info!(
                operations = ?report.operations_performed,
                final_rows = cleaned.row_count(),
                "Clean operation complete"
            );
            Ok(PipelineOutcome::Processed(processed_result(&cleaned, Some(report))))
        }

        Operation::Export => {
            // Fail fast: an unsupported format aborts before any transform.
            options.validate_export_format()?;
            let transformed = run_transforms(table, options, None);
            let export_data =
                export_table(&transformed, &options.format, options.include_headers)?;
            info!(
                format = %options.format,
                bytes = export_data.len(),
                "Export operation complete"
            );
            Ok(PipelineOutcome::Export(ExportResult { export_data }))
        }
    }
}

/// The shared clean/export transform sequence: flatten -> normalize ->
/// string clean -> impute -> filter. The report, when given, records only
/// stages that observably changed the table.
fn run_transforms(
    mut table: Table,
    options: &ProcessOptions,
    mut report: Option<&mut CleaningReport>,
) -> Table {
    if let Some(config) = &options.json_config {
        let (flattened, added) = flatten(&table, config);
        debug!(columns_added = added, "Applied JSON flattening");
        table = flattened;
        if let Some(r) = report.as_deref_mut() {
            r.record_flattening(added);
        }
    }

    let Some(cleaning) = &options.cleaning_options else {
        return table;
    };

    if let Some(normalize) = &cleaning.normalize_columns {
        let (headers, renames) = normalize_headers(&table.headers, normalize);
        debug!(renamed = renames.len(), "Applied column normalization");
        table.headers = headers;
        if let Some(r) = report.as_deref_mut() {
            r.record_normalization(renames);
        }
    }

    if let Some(string_options) = &cleaning.string_cleaning {
        if string_options.enabled {
            let (cleaned, string_report) = clean_strings(&table, string_options);
            debug!(
                fields_cleaned = string_report.fields_cleaned,
                "Applied string cleaning"
            );
            table = cleaned;
            if let Some(r) = report.as_deref_mut() {
                r.record_string_cleaning(string_report);
            }
        }
    }

    if let Some(missing) = &cleaning.missing_data {
        // Types are derived and cheap: recompute against the current headers
        // so smart fill sees post-flatten, post-rename columns.
        let column_types = detect_column_types(&table);
        let (imputed, missing_report) = impute(&table, missing, &column_types);
        debug!(
            rows_removed = missing_report.rows_removed,
            cells_filled = missing_report.cells_filled,
            "Applied missing-data handling"
        );
        table = imputed;
        if let Some(r) = report.as_deref_mut() {
            r.record_missing_data(missing_report);
        }
    }

    if let Some(filtering) = &cleaning.filtering {
        let (filtered, rows_filtered) = filter_rows(&table, filtering);
        debug!(rows_filtered, "Applied row filtering");
        table = filtered;
        if let Some(r) = report.as_deref_mut() {
            r.record_filtering(rows_filtered);
        }
    }

    table
}

fn analyze(table: &Table) -> AnalyzeResult {
    let column_types = detect_column_types(table);
    let json_info = detect_json_columns(table);

    AnalyzeResult {
        rows: table.row_count(),
        columns: table.column_count(),
        json_columns: json_info.columns.clone(),
        json_fields: json_info
            .fields
            .iter()
            .map(|(header, keys)| (header.clone(), keys.iter().cloned().collect()))
            .collect(),
        preview: preview(table),
        stats: summary_stats(table, &column_types, &json_info),
        distributions: distributions(table, &json_info),
        column_names: table.write_headers(),
    }
}

/// Default result shape: full row objects plus recomputed preview and stats.
fn processed_result(table: &Table, cleaning_report: Option<CleaningReport>) -> ProcessedResult {
    let column_types = detect_column_types(table);
    let json_info = detect_json_columns(table);

    ProcessedResult {
        processed_data: all_row_objects(table),
        preview: preview(table),
        stats: summary_stats(table, &column_types, &json_info),
        column_names: table.write_headers(),
        cleaning_report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options::{
        CleaningOptions, ColumnFilter, ColumnFlattenConfig, FilterOperator, FilterOptions,
        FlattenConfig, MissingDataOptions, MissingStrategy, NormalizeOptions,
    };
    use crate::domain::Cell;
    use serde_json::json;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| Cell::from_field(v)).collect())
                .collect(),
        )
    }

    fn flatten_config(column: &str, field: &str) -> FlattenConfig {
        FlattenConfig {
            columns: BTreeMap::from([(
                column.to_string(),
                ColumnFlattenConfig {
                    enabled: true,
                    fields: BTreeMap::from([(field.to_string(), true)]),
                },
            )]),
        }
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        let err = Operation::from_str("explode").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_flatten_operation_end_to_end() {
        let input = table(
            &["UserID", "metaJSON"],
            &[&["1", r#"{"age":30}"#], &["2", ""]],
        );
        let options = ProcessOptions {
            config: Some(flatten_config("metaJSON", "age")),
            ..ProcessOptions::default()
        };

        let outcome = process(input, Operation::Flatten, &options).unwrap();
        let PipelineOutcome::Processed(result) = outcome else {
            panic!("expected processed result");
        };
        assert_eq!(result.column_names, vec!["UserID", "metaJSON", "metaJSON_age"]);
        assert_eq!(result.processed_data[0]["metaJSON_age"], json!("30"));
        assert_eq!(result.processed_data[1]["metaJSON_age"], Value::Null);
        assert!(result.cleaning_report.is_none());
    }

    #[test]
    fn test_clean_fill_reports_cells_filled() {
        let input = table(&["a", "b"], &[&["1", ""], &["2", "x"]]);
        let options = ProcessOptions {
            cleaning_options: Some(CleaningOptions {
                missing_data: Some(MissingDataOptions {
                    strategy: MissingStrategy::Fill,
                    fill_value: "N/A".to_string(),
                    ..MissingDataOptions::default()
                }),
                ..CleaningOptions::default()
            }),
            ..ProcessOptions::default()
        };

        let outcome = process(input, Operation::Clean, &options).unwrap();
        let PipelineOutcome::Processed(result) = outcome else {
            panic!("expected processed result");
        };
        let report = result.cleaning_report.unwrap();
        assert_eq!(report.missing_data_report.unwrap().cells_filled, 1);
        assert_eq!(report.operations_performed, vec!["missing_data_handling"]);
        assert_eq!(result.processed_data[0]["b"], json!("N/A"));
    }

    #[test]
    fn test_clean_contains_filter_keeps_matching_rows() {
        let input = table(
            &["level", "message"],
            &[
                &["ERROR", "disk full"],
                &["info", "started"],
                &["Error", "timeout"],
            ],
        );
        let options = ProcessOptions {
            cleaning_options: Some(CleaningOptions {
                filtering: Some(FilterOptions {
                    remove_empty_rows: false,
                    column_filter: Some(ColumnFilter {
                        enabled: true,
                        column: "level".to_string(),
                        operator: FilterOperator::Contains,
                        value: "err".to_string(),
                    }),
                }),
                ..CleaningOptions::default()
            }),
            ..ProcessOptions::default()
        };

        let outcome = process(input, Operation::Clean, &options).unwrap();
        let PipelineOutcome::Processed(result) = outcome else {
            panic!("expected processed result");
        };
        assert_eq!(result.stats.total_rows, 2);
        let report = result.cleaning_report.unwrap();
        assert_eq!(report.filtering_report.unwrap().rows_filtered, 1);
    }

    #[test]
    fn test_clean_full_stage_order_and_report() {
        let input = table(
            &["User Name", "metaJSON"],
            &[
                &["  Alice  ", r#"{"age":30}"#],
                &["", r#"{"age":50}"#],
            ],
        );
        let options = ProcessOptions {
            json_config: Some(flatten_config("metaJSON", "age")),
            cleaning_options: Some(CleaningOptions {
                normalize_columns: Some(NormalizeOptions {
                    lowercase: true,
                    ..NormalizeOptions::default()
                }),
                string_cleaning: Some(crate::domain::options::StringCleaningOptions {
                    enabled: true,
                    ..Default::default()
                }),
                missing_data: Some(MissingDataOptions {
                    strategy: MissingStrategy::SmartFill,
                    fill_value: "N/A".to_string(),
                    ..MissingDataOptions::default()
                }),
                filtering: None,
            }),
            ..ProcessOptions::default()
        };

        let outcome = process(input, Operation::Clean, &options).unwrap();
        let PipelineOutcome::Processed(result) = outcome else {
            panic!("expected processed result");
        };

        // Flattened column, normalized headers, trimmed string, smart fill.
        assert_eq!(
            result.column_names,
            vec!["user_name", "meta_json", "meta_json_age"]
        );
        assert_eq!(result.processed_data[0]["user_name"], json!("Alice"));
        // meta_json_age is numeric after flattening: mean of 30 and 50.
        assert_eq!(result.processed_data[0]["meta_json_age"], json!("30"));
        assert_eq!(result.processed_data[1]["user_name"], json!("N/A"));

        let report = result.cleaning_report.unwrap();
        assert_eq!(
            report.operations_performed,
            vec![
                "json_flattening",
                "column_normalization",
                "string_cleaning",
                "missing_data_handling"
            ]
        );
        assert_eq!(report.summary.original_rows, 2);
        assert_eq!(report.summary.original_columns, 2);
        assert_eq!(report.summary.final_columns, 3);
        assert!(!report.readable_summary.is_empty());
    }

    #[test]
    fn test_keep_strategy_leaves_table_unchanged() {
        let input = table(&["a"], &[&["1"], &[""], &["n/a"]]);
        let options = ProcessOptions {
            cleaning_options: Some(CleaningOptions {
                missing_data: Some(MissingDataOptions::default()),
                ..CleaningOptions::default()
            }),
            ..ProcessOptions::default()
        };

        let outcome = process(input.clone(), Operation::Clean, &options).unwrap();
        let PipelineOutcome::Processed(result) = outcome else {
            panic!("expected processed result");
        };
        assert_eq!(result.stats.total_rows, 3);
        let report = result.cleaning_report.unwrap();
        assert!(report.operations_performed.is_empty());
        assert!(report.missing_data_report.is_none());
    }

    #[test]
    fn test_export_unsupported_format_is_fatal() {
        let input = table(&["a"], &[&["1"]]);
        let options = ProcessOptions {
            format: "parquet".to_string(),
            ..ProcessOptions::default()
        };
        let err = process(input, Operation::Export, &options).unwrap_err();
        assert!(matches!(err, AppError::ExportError(_)));
    }

    #[test]
    fn test_export_applies_transforms() {
        let input = table(&["Col A", "b"], &[&["1", "x"], &["", "y"]]);
        let options = ProcessOptions {
            cleaning_options: Some(CleaningOptions {
                normalize_columns: Some(NormalizeOptions::default()),
                missing_data: Some(MissingDataOptions {
                    strategy: MissingStrategy::Remove,
                    ..MissingDataOptions::default()
                }),
                ..CleaningOptions::default()
            }),
            format: "csv".to_string(),
            ..ProcessOptions::default()
        };

        let outcome = process(input, Operation::Export, &options).unwrap();
        let PipelineOutcome::Export(result) = outcome else {
            panic!("expected export result");
        };
        assert_eq!(result.export_data, "Col_A,b\n1,x\n");
    }

    #[test]
    fn test_analyze_result_shape() {
        let input = table(
            &["id", "meta"],
            &[
                &["1", r#"{"k":1,"j":2}"#],
                &["2", r#"{"k":3}"#],
                &["3", "plain"],
            ],
        );
        let outcome = process(input, Operation::Analyze, &ProcessOptions::default()).unwrap();
        let PipelineOutcome::Analysis(result) = outcome else {
            panic!("expected analysis result");
        };

        assert_eq!(result.rows, 3);
        assert_eq!(result.columns, 2);
        assert_eq!(result.json_columns, vec!["meta"]);
        assert_eq!(result.json_fields["meta"], vec!["j", "k"]);
        assert_eq!(result.preview.len(), 3);
        assert_eq!(result.stats.column_types.json, 1);
        assert_eq!(result.stats.column_types.numeric, 1);
        assert!(result.distributions.contains_key("id"));
        assert!(!result.distributions.contains_key("meta"));
    }
}
