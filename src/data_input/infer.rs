// src/data_input/infer.rs

use crate::error::{Result, TableError};
use crate::table::{Column, ColumnStore};

/// Parses one cell as a number. Blank cells count as NaN.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

/// A column is `Float64` if every cell is numeric, otherwise text.
pub fn infer_column(cells: Vec<String>) -> Column {
    let numbers: Option<Vec<f64>> = cells.iter().map(|c| parse_number(c)).collect();
    match numbers {
        Some(values) => Column::F64(values),
        None => Column::Str(cells),
    }
}

/// Transposes row-major string cells into typed columns.
///
/// Every row must have exactly one cell per name.
pub fn columns_from_rows(names: Vec<String>, rows: Vec<Vec<String>>) -> Result<ColumnStore> {
    let width = names.len();
    let mut cells: Vec<Vec<String>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
    for (row, record) in rows.into_iter().enumerate() {
        if record.len() != width {
            return Err(TableError::RaggedRow { row, expected: width, actual: record.len() });
        }
        for (column, cell) in cells.iter_mut().zip(record) {
            column.push(cell);
        }
    }
    ColumnStore::from_columns(names, cells.into_iter().map(infer_column).collect())
}


// src/data_input/infer.rs
