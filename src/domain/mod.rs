// ============================================================
// DOMAIN LAYER
// ============================================================
// Core types for the cleaning pipeline: table, options, report, errors.
// No I/O, no async, no external dependencies beyond serde.

pub mod error;
pub mod options;
pub mod report;
pub mod table;

pub use error::{AppError, Result};
pub use table::{Cell, Table};
