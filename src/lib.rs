// src/lib.rs - Library interface

pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod data_output;
pub mod error;
pub mod expression;
pub mod table;
pub mod types;

pub use data_analysis::evaluate::EvalOptions;
pub use data_analysis::metrics::{Comparison, Metrics};
pub use data_analysis::resample::{AddTimesOptions, ResampleOptions};
pub use data_input::builder::TableBuilder;
pub use data_output::csv_writer::CsvWriteOptions;
pub use error::{ExpressionError, Result, TableError};
pub use table::{CellValue, Column, ColumnType, Table};

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// src/lib.rs
