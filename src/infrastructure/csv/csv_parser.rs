// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV files into the in-memory table with encoding and
// delimiter detection.

use crate::domain::error::{AppError, Result};
use crate::domain::{Cell, Table};
use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;
use std::path::Path;

/// CSV parser with encoding detection.
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values. Off by default so the
    /// string-cleaning stage sees the original whitespace.
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse a CSV file into a table.
    pub fn parse_file(&self, path: &Path) -> Result<Table> {
        let content = read_with_encoding_detection(path)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string. The first record is the header row;
    /// short rows are padded with missing cells.
    pub fn parse_content(&self, content: &str) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(parse_row(headers.len(), &record));
        }

        Ok(Table::new(headers, rows))
    }

    /// Parse CSV file with automatic delimiter detection.
    pub fn parse_file_auto_detect(path: &Path) -> Result<Table> {
        // Read a sample for delimiter detection
        let content_sample = {
            use std::fs::File;
            use std::io::Read;

            let mut file = File::open(path)
                .map_err(|e| AppError::IoError(format!("Failed to open file: {}", e)))?;

            let mut buffer = vec![0u8; 4096];
            let read = file.read(&mut buffer).unwrap_or(0);
            buffer.truncate(read);
            String::from_utf8_lossy(&buffer).to_string()
        };

        let delimiter = detect_delimiter(&content_sample);
        Self::default().with_delimiter(delimiter).parse_file(path)
    }
}

fn parse_row(width: usize, record: &StringRecord) -> Vec<Cell> {
    (0..width)
        .map(|idx| Cell::from_field(record.get(idx).unwrap_or("")))
        .collect()
}

/// Read file bytes as UTF-8, falling back to Windows-1252, then to lossy
/// UTF-8 replacement.
fn read_with_encoding_detection(path: &Path) -> Result<String> {
    let buffer = std::fs::read(path)
        .map_err(|e| AppError::IoError(format!("Failed to read file: {}", e)))?;

    if let Ok(content) = std::str::from_utf8(&buffer) {
        return Ok(content.to_string());
    }

    let (content, _, had_errors) = WINDOWS_1252.decode(&buffer);
    if !had_errors {
        return Ok(content.into_owned());
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Detect delimiter from content (comma, semicolon, tab, pipe).
pub fn detect_delimiter(content: &str) -> u8 {
    let candidates = [b',', b';', b'\t', b'|'];
    let sample_lines: Vec<_> = content.lines().take(10).collect();

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    for &delimiter in &candidates {
        if sample_lines.is_empty() {
            continue;
        }

        let field_counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        // Score by consistency (low standard deviation) and frequency
        let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
        let variance = field_counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / field_counts.len() as f32;

        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}
