// src/data_input/csv_reader.rs

use csv::ReaderBuilder;
use std::io::Read;

use crate::data_input::infer::columns_from_rows;
use crate::error::{Result, TableError};
use crate::table::ColumnStore;

/// Reads delimited text into typed columns.
///
/// Without `names` the first record is the header. With `names` every record
/// is data. Cells are trimmed and empty lines are ignored.
pub fn read_csv<R: Read>(input: R, names: Option<&[String]>, delimiter: u8) -> Result<ColumnStore> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(names.is_none())
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let names: Vec<String> = match names {
        Some(names) => names.to_vec(),
        None => reader.headers()?.iter().map(str::to_string).collect(),
    };
    if names.is_empty() {
        return Err(TableError::EmptyInput);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    log::debug!("CSV: {} columns, {} rows", names.len(), rows.len());
    columns_from_rows(names, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn test_header_and_rows() {
        let store = read_csv("t,a,b\n0,1,2\n1,3,4\n".as_bytes(), None, b',').unwrap();
        assert_eq!(store.names(), &["t", "a", "b"]);
        assert_eq!(store.rows(), 2);
        assert_eq!(store.column(2), &Column::F64(vec![2.0, 4.0]));
    }

    #[test]
    fn test_explicit_names_read_every_line() {
        let names = vec!["x".to_string(), "y".to_string()];
        let store = read_csv("0;1\n2;3\n".as_bytes(), Some(&names), b';').unwrap();
        assert_eq!(store.names(), &["x", "y"]);
        assert_eq!(store.rows(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(read_csv("".as_bytes(), None, b','), Err(TableError::EmptyInput)));
    }
}

// src/data_input/csv_reader.rs
