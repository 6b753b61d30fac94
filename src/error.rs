// src/error.rs

use thiserror::Error;

/// Errors raised by the table engine.
///
/// Every error is detected synchronously by the call that receives the bad
/// input; nothing is retried and no partially built table escapes.
#[derive(Debug, Error)]
pub enum TableError {
    // ── construction contract ───────────────────────────────────────────────
    #[error("a table is built from exactly one source, got {0}")]
    AmbiguousSource(String),
    #[error("no data source given")]
    MissingSource,
    #[error("data given without column names")]
    MissingNames,
    #[error("time column '{name}' not in {available:?}")]
    UnknownTimeColumn { name: String, available: Vec<String> },
    #[error("names {names:?} do not fit {columns} columns: expected {scalar} for scalars or {vector} for vectors")]
    SampleColumnMismatch {
        names: Vec<String>,
        columns: usize,
        scalar: usize,
        vector: usize,
    },
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },
    #[error("input contains no header or data")]
    EmptyInput,

    // ── shape mismatches ────────────────────────────────────────────────────
    #[error("{0}")]
    WrongDataSize(String),
    #[error("column '{name}' has {actual} values, table has {expected} rows")]
    LengthMismatch { name: String, expected: usize, actual: usize },

    // ── lookup / reference ──────────────────────────────────────────────────
    #[error("column '{0}' not found")]
    UnknownColumn(String),
    #[error("column '{0}' already exists")]
    DuplicateName(String),
    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),
    #[error("time column '{0}' is not numeric")]
    NonNumericTime(String),
    #[error("time column '{name}' is not ascending at row {row}")]
    UnsortedTime { name: String, row: usize },
    #[error("invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // ── expressions ─────────────────────────────────────────────────────────
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    // ── I/O ─────────────────────────────────────────────────────────────────
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

/// Errors of the embedded arithmetic expression language.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("syntax error at offset {pos}: {message}")]
    Syntax { pos: usize, message: String },
    #[error("expression references undefined column '{0}'")]
    UnknownColumn(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("function '{name}' takes {expected} argument(s), got {actual}")]
    WrongArity { name: String, expected: usize, actual: usize },
    #[error("column '{0}' is not numeric and cannot be used in an expression")]
    NonNumericColumn(String),
    #[error("'this' is only defined when recalculating an existing column")]
    ThisUndefined,
}

pub type Result<T> = std::result::Result<T, TableError>;

// src/error.rs
