// src/types.rs
// Type aliases shared across modules

use crate::table::CellValue;

/// Column name and value pairs in column order, as returned by `Table::evaluate_all`.
pub type NamedValues = Vec<(String, CellValue)>;

// src/types.rs
