pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use crate::domain::error::{AppError, Result};
pub use crate::domain::{Cell, Table};
