pub mod analyzer;
pub mod detector;
pub mod flattener;
pub mod imputer;
pub mod normalizer;
pub mod pipeline;
pub mod row_filter;
pub mod statistics;
pub mod string_cleaner;
