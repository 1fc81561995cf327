// ============================================================
// PIPELINE CONFIGURATION
// ============================================================
// Declarative option structs deserialized from the caller's JSON blob.
// Wire keys are camelCase; every field has a documented default so partial
// blobs stay valid. Unknown enum values degrade to explicit no-op variants
// instead of failing deserialization.

use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level options blob, shape depends on the requested operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessOptions {
    /// Cleaning stage configuration (`clean` and `export`).
    pub cleaning_options: Option<CleaningOptions>,

    /// JSON flattening applied ahead of cleaning (`clean` and `export`).
    pub json_config: Option<FlattenConfig>,

    /// JSON flattening configuration for the standalone `flatten` operation.
    pub config: Option<FlattenConfig>,

    /// Export container format: csv, json or xlsx.
    pub format: String,

    /// Whether the export includes a header record.
    pub include_headers: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            cleaning_options: None,
            json_config: None,
            config: None,
            format: "csv".to_string(),
            include_headers: true,
        }
    }
}

pub const SUPPORTED_EXPORT_FORMATS: [&str; 3] = ["csv", "json", "xlsx"];

impl ProcessOptions {
    /// Validate the blob at the pipeline boundary. Only the export format can
    /// make a configuration fatal; everything else degrades to a no-op.
    pub fn validate_export_format(&self) -> Result<()> {
        if SUPPORTED_EXPORT_FORMATS.contains(&self.format.as_str()) {
            Ok(())
        } else {
            Err(AppError::ExportError(format!(
                "Unsupported export format: {}",
                self.format
            )))
        }
    }
}

/// Per-stage cleaning configuration. A stage whose entry is absent does not run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleaningOptions {
    pub normalize_columns: Option<NormalizeOptions>,
    pub missing_data: Option<MissingDataOptions>,
    pub string_cleaning: Option<StringCleaningOptions>,
    pub filtering: Option<FilterOptions>,
}

/// Column-name normalization flags, applied in a fixed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizeOptions {
    pub trim_whitespace: bool,
    pub remove_special_chars: bool,
    pub snake_case: bool,
    pub lowercase: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
            remove_special_chars: true,
            snake_case: true,
            lowercase: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    #[default]
    Keep,
    Remove,
    RemoveSpecific,
    Fill,
    SmartFill,
    /// Unrecognized strategies behave like `keep`.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    #[default]
    Custom,
    Zero,
    Mean,
    Median,
    Mode,
    /// Unrecognized methods behave like `custom`.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissingDataOptions {
    pub strategy: MissingStrategy,
    pub fill_value: String,
    pub fill_method: FillMethod,
    pub specific_columns: Vec<String>,
}

impl Default for MissingDataOptions {
    fn default() -> Self {
        Self {
            strategy: MissingStrategy::Keep,
            fill_value: "N/A".to_string(),
            fill_method: FillMethod::Custom,
            specific_columns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StringCleaningOptions {
    pub enabled: bool,
    pub trim_whitespace: bool,
    pub lowercase: bool,
    pub remove_punctuation: bool,

    /// Columns to clean; empty means every column.
    pub specific_columns: Vec<String>,
}

impl Default for StringCleaningOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            trim_whitespace: true,
            lowercase: false,
            remove_punctuation: false,
            specific_columns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    #[default]
    Equals,
    Contains,
    NotEqual,
    /// Unrecognized operators skip the column sub-filter.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnFilter {
    pub enabled: bool,
    pub column: String,
    pub operator: FilterOperator,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    pub remove_empty_rows: bool,
    pub column_filter: Option<ColumnFilter>,
}

/// Per-column field selection driving the JSON flattener.
///
/// Keyed by source column name; `BTreeMap` keeps the appended column order
/// deterministic across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    pub columns: BTreeMap<String, ColumnFlattenConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFlattenConfig {
    pub enabled: bool,
    pub fields: BTreeMap<String, bool>,
}
