pub mod csv_parser;
pub mod exporter;

pub use csv_parser::CsvParser;
pub use exporter::export_table;
