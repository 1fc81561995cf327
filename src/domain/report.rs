// ============================================================
// CLEANING REPORT
// ============================================================
// Accumulator describing what the clean operation changed. Stages merge
// their sub-reports in explicitly; a stage that changed nothing leaves no
// trace, so re-running a clean of an already-clean table reports nothing.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    pub original_rows: usize,
    pub original_columns: usize,
    pub final_rows: usize,
    pub final_columns: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MissingDataReport {
    pub rows_removed: usize,
    pub cells_filled: usize,

    /// Column name -> fill method actually used for it.
    pub fill_methods_used: BTreeMap<String, String>,
}

impl MissingDataReport {
    pub fn changed_anything(&self) -> bool {
        self.rows_removed > 0 || self.cells_filled > 0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StringCleaningReport {
    pub fields_cleaned: usize,
    pub operations_applied: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FilteringReport {
    pub rows_filtered: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct JsonFlatteningReport {
    pub columns_added: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub summary: ReportSummary,

    /// Stage names, in execution order, that produced an observable change.
    pub operations_performed: Vec<String>,

    /// Old header -> new header, for headers the normalizer renamed.
    pub column_changes: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_data_report: Option<MissingDataReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_cleaning_report: Option<StringCleaningReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtering_report: Option<FilteringReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_flattening_report: Option<JsonFlatteningReport>,

    pub readable_summary: Vec<String>,
}

impl CleaningReport {
    pub fn new(original_rows: usize, original_columns: usize) -> Self {
        Self {
            summary: ReportSummary {
                original_rows,
                original_columns,
                ..ReportSummary::default()
            },
            ..Self::default()
        }
    }

    pub fn record_flattening(&mut self, columns_added: usize) {
        if columns_added == 0 {
            return;
        }
        self.operations_performed.push("json_flattening".to_string());
        self.json_flattening_report = Some(JsonFlatteningReport { columns_added });
    }

    pub fn record_normalization(&mut self, column_changes: BTreeMap<String, String>) {
        if column_changes.is_empty() {
            return;
        }
        self.operations_performed
            .push("column_normalization".to_string());
        self.column_changes = column_changes;
    }

    pub fn record_string_cleaning(&mut self, report: StringCleaningReport) {
        if report.fields_cleaned == 0 {
            return;
        }
        self.operations_performed.push("string_cleaning".to_string());
        self.string_cleaning_report = Some(report);
    }

    pub fn record_missing_data(&mut self, report: MissingDataReport) {
        if !report.changed_anything() {
            return;
        }
        self.operations_performed
            .push("missing_data_handling".to_string());
        self.missing_data_report = Some(report);
    }

    pub fn record_filtering(&mut self, rows_filtered: usize) {
        if rows_filtered == 0 {
            return;
        }
        self.operations_performed.push("row_filtering".to_string());
        self.filtering_report = Some(FilteringReport { rows_filtered });
    }

    /// Set final shape counts and build the human-readable digest.
    pub fn finish(&mut self, final_rows: usize, final_columns: usize) {
        self.summary.final_rows = final_rows;
        self.summary.final_columns = final_columns;
        self.readable_summary = self.build_readable_summary();
    }

    fn build_readable_summary(&self) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push(format!(
            "Data processed: {} → {} rows, {} → {} columns",
            self.summary.original_rows,
            self.summary.final_rows,
            self.summary.original_columns,
            self.summary.final_columns
        ));

        if !self.operations_performed.is_empty() {
            lines.push(format!(
                "Operations applied: {}",
                self.operations_performed.join(", ")
            ));
        }

        if !self.column_changes.is_empty() {
            lines.push(format!(
                "Column names normalized: {} columns renamed",
                self.column_changes.len()
            ));
        }

        if let Some(missing) = &self.missing_data_report {
            if missing.rows_removed > 0 {
                lines.push(format!(
                    "Rows removed due to missing data: {}",
                    missing.rows_removed
                ));
            }
            if missing.cells_filled > 0 {
                lines.push(format!("Missing values filled: {}", missing.cells_filled));
            }
        }

        if let Some(string_cleaning) = &self.string_cleaning_report {
            if string_cleaning.fields_cleaned > 0 {
                lines.push(format!(
                    "String fields cleaned: {}",
                    string_cleaning.fields_cleaned
                ));
            }
        }

        if let Some(filtering) = &self.filtering_report {
            if filtering.rows_filtered > 0 {
                lines.push(format!("Rows filtered out: {}", filtering.rows_filtered));
            }
        }

        lines
    }
}
