// ============================================================
// COMMAND-LINE INTERFACE
// ============================================================
// Parse arguments, run one pipeline operation, and print the JSON
// result envelope to stdout.

use crate::application::use_cases::pipeline::{self, Operation, PipelineOutcome};
use crate::domain::error::{AppError, Result};
use crate::domain::options::ProcessOptions;
use crate::infrastructure::csv::CsvParser;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rujak", about = "CSV cleaning and analysis tool")]
pub struct Cli {
    /// Path to the CSV file to process
    pub file_path: PathBuf,

    /// Operation to run: analyze, flatten, clean, or export
    pub operation: String,

    /// Operation options as a JSON object
    pub options: Option<String>,
}

/// Run the CLI end to end and return the result envelope.
pub fn run(cli: Cli) -> Result<PipelineOutcome> {
    let operation: Operation = cli.operation.parse()?;
    let options = parse_options(cli.options.as_deref())?;

    info!(path = %cli.file_path.display(), operation = %cli.operation, "Processing file");

    let table = CsvParser::parse_file_auto_detect(&cli.file_path)?;
    pipeline::process(table, operation, &options)
}

fn parse_options(raw: Option<&str>) -> Result<ProcessOptions> {
    match raw {
        None => Ok(ProcessOptions::default()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::ValidationError(format!("Invalid options JSON: {}", e))),
    }
}
