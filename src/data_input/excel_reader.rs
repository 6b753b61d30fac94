// src/data_input/excel_reader.rs

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::data_input::infer::columns_from_rows;
use crate::error::{Result, TableError};
use crate::table::ColumnStore;

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Reads the first sheet of a workbook. The first row holds the names.
pub fn read_excel(path: &Path) -> Result<ColumnStore> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(TableError::EmptyInput)??;

    let mut rows = range.rows();
    let header = rows.next().ok_or(TableError::EmptyInput)?;
    let names: Vec<String> = header.iter().map(cell_text).collect();
    let data: Vec<Vec<String>> = rows.map(|row| row.iter().map(cell_text).collect()).collect();
    log::debug!("Spreadsheet {}: {} columns, {} rows", path.display(), names.len(), data.len());
    columns_from_rows(names, data)
}


// src/data_input/excel_reader.rs
