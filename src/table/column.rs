// src/table/column.rs

use std::fmt;

use crate::constants::NAN_TEXT;
use crate::error::{Result, TableError};

/// Type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Float64,
    /// Text column; `width` is the widest cell in characters.
    Text { width: usize },
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Float64)
    }
}

/// Column-major storage for one named column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    F64(Vec<f64>),
    Str(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::F64(v) => v.len(),
            Column::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::F64(_) => ColumnType::Float64,
            Column::Str(v) => ColumnType::Text {
                width: v.iter().map(|s| s.chars().count()).max().unwrap_or(0),
            },
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::F64(_))
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Column::F64(v) => Some(v),
            Column::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&[String]> {
        match self {
            Column::Str(v) => Some(v),
            Column::F64(_) => None,
        }
    }

    /// A column of `len` "no value" cells of the same kind as `self`.
    pub fn missing_like(&self, len: usize) -> Column {
        match self {
            Column::F64(_) => Column::F64(vec![f64::NAN; len]),
            Column::Str(_) => Column::Str(vec![String::new(); len]),
        }
    }

    /// An empty column of the same kind as `self` with room for `capacity` cells.
    pub fn empty_like(&self, capacity: usize) -> Column {
        match self {
            Column::F64(_) => Column::F64(Vec::with_capacity(capacity)),
            Column::Str(_) => Column::Str(Vec::with_capacity(capacity)),
        }
    }

    pub fn value(&self, row: usize) -> CellValue {
        match self {
            Column::F64(v) => CellValue::Number(v[row]),
            Column::Str(v) => CellValue::Text(v[row].clone()),
        }
    }

    pub fn missing_value(&self) -> CellValue {
        match self {
            Column::F64(_) => CellValue::Number(f64::NAN),
            Column::Str(_) => CellValue::Text(String::new()),
        }
    }

    /// Copies `src[row]` onto the end of this column.
    pub(crate) fn push_row_from(&mut self, src: &Column, row: usize) {
        self.push_value(src.value(row));
    }

    pub(crate) fn push_missing(&mut self) {
        match self {
            Column::F64(v) => v.push(f64::NAN),
            Column::Str(v) => v.push(String::new()),
        }
    }

    /// Appends a cell, converting between numbers and text if the kinds differ.
    pub(crate) fn push_value(&mut self, value: CellValue) {
        match (self, value) {
            (Column::F64(v), CellValue::Number(x)) => v.push(x),
            (Column::F64(v), CellValue::Text(s)) => v.push(s.trim().parse().unwrap_or(f64::NAN)),
            (Column::Str(v), CellValue::Text(s)) => v.push(s),
            (Column::Str(v), CellValue::Number(x)) => v.push(format_number(x)),
        }
    }

    pub(crate) fn extend_missing(&mut self, count: usize) {
        match self {
            Column::F64(v) => v.extend(std::iter::repeat(f64::NAN).take(count)),
            Column::Str(v) => v.extend(std::iter::repeat(String::new()).take(count)),
        }
    }

    /// Appends every cell of `other`.
    pub(crate) fn extend_from(&mut self, other: &Column) {
        match (self, other) {
            (Column::F64(v), Column::F64(o)) => v.extend_from_slice(o),
            (Column::Str(v), Column::Str(o)) => v.extend(o.iter().cloned()),
            (this, other) => {
                for row in 0..other.len() {
                    this.push_row_from(other, row);
                }
            }
        }
    }

    /// Text rendering of one cell, as written to CSV.
    pub fn cell_text(&self, row: usize) -> String {
        match self {
            Column::F64(v) => format_number(v[row]),
            Column::Str(v) => v[row].clone(),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::F64(values)
    }
}

impl From<Vec<String>> for Column {
    fn from(values: Vec<String>) -> Self {
        Column::Str(values)
    }
}

impl From<ndarray::Array1<f64>> for Column {
    fn from(values: ndarray::Array1<f64>) -> Self {
        Column::F64(values.to_vec())
    }
}

/// Decimal text for a number; NaN becomes `nan`.
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        NAN_TEXT.to_string()
    } else {
        format!("{}", x)
    }
}

/// A single cell as returned by point evaluation.
///
/// The "no value" sentinel is `Number(NaN)` for numeric columns and
/// `Text("")` for text columns.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Number(x) => x.is_nan(),
            CellValue::Text(s) => s.is_empty(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(x) => Some(*x),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(x) => write!(f, "{}", format_number(*x)),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Ordered, uniquely named columns of identical length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStore {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl ColumnStore {
    /// Builds a store, checking name uniqueness and equal column lengths.
    pub fn from_columns(names: Vec<String>, columns: Vec<Column>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(TableError::WrongDataSize(format!(
                "{} names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let rows = columns.first().map(Column::len).unwrap_or(0);
        for (name, column) in names.iter().zip(&columns) {
            if column.len() != rows {
                return Err(TableError::LengthMismatch {
                    name: name.clone(),
                    expected: rows,
                    actual: column.len(),
                });
            }
        }
        check_unique(&names)?;
        Ok(Self { names, columns, rows })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Adds a column at the end. The column must have exactly `rows()` cells.
    pub fn push_column(&mut self, name: String, column: Column) -> Result<()> {
        if self.contains(&name) {
            return Err(TableError::DuplicateName(name));
        }
        if !self.columns.is_empty() && column.len() != self.rows {
            return Err(TableError::LengthMismatch {
                name,
                expected: self.rows,
                actual: column.len(),
            });
        }
        self.rows = column.len();
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Overwrites the cells of an existing column, keeping its name and position.
    pub fn replace_column(&mut self, index: usize, column: Column) -> Result<()> {
        if column.len() != self.rows {
            return Err(TableError::LengthMismatch {
                name: self.names[index].clone(),
                expected: self.rows,
                actual: column.len(),
            });
        }
        self.columns[index] = column;
        Ok(())
    }

    /// Replaces every column at once (row insertion). Names are unchanged.
    pub(crate) fn replace_all(&mut self, columns: Vec<Column>) -> Result<()> {
        let store = Self::from_columns(self.names.clone(), columns)?;
        *self = store;
        Ok(())
    }

    /// Appends `count` rows whose cells are all "no value".
    pub(crate) fn extend_missing_rows(&mut self, count: usize) {
        for column in &mut self.columns {
            column.extend_missing(count);
        }
        self.rows += count;
    }

    /// Appends one row per key: `keys` go into column `key`, every other cell is "no value".
    pub(crate) fn append_rows(&mut self, key: usize, keys: &[f64]) {
        for (i, column) in self.columns.iter_mut().enumerate() {
            if i == key {
                for &k in keys {
                    column.push_value(CellValue::Number(k));
                }
            } else {
                column.extend_missing(keys.len());
            }
        }
        self.rows += keys.len();
    }

    /// Like [`append_rows`](Self::append_rows) but inserts the rows at the top.
    pub(crate) fn prepend_rows(&mut self, key: usize, keys: &[f64]) {
        let capacity = self.rows + keys.len();
        for (i, column) in self.columns.iter_mut().enumerate() {
            let mut grown = column.empty_like(capacity);
            if i == key {
                for &k in keys {
                    grown.push_value(CellValue::Number(k));
                }
            } else {
                grown.extend_missing(keys.len());
            }
            grown.extend_from(column);
            *column = grown;
        }
        self.rows += keys.len();
    }

    pub(crate) fn column_mut(&mut self, index: usize) -> &mut Column {
        &mut self.columns[index]
    }

    pub fn set_names(&mut self, names: Vec<String>) -> Result<()> {
        if names.len() != self.names.len() {
            return Err(TableError::WrongDataSize(format!(
                "{} names for {} columns",
                names.len(),
                self.names.len()
            )));
        }
        check_unique(&names)?;
        self.names = names;
        Ok(())
    }

    /// Drops every column for which `keep` is false and returns the dropped names.
    pub fn retain(&mut self, mut keep: impl FnMut(usize, &str) -> bool) -> Vec<String> {
        let mut dropped = Vec::new();
        let mut names = Vec::with_capacity(self.names.len());
        let mut columns = Vec::with_capacity(self.columns.len());
        for (i, (name, column)) in self.names.drain(..).zip(self.columns.drain(..)).enumerate() {
            if keep(i, &name) {
                names.push(name);
                columns.push(column);
            } else {
                dropped.push(name);
            }
        }
        self.names = names;
        self.columns = columns;
        dropped
    }

    /// `base` if it is free, else the first free `base_1`, `base_2`, ...
    pub fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        let mut counter = 1;
        loop {
            let candidate = format!("{}_{}", base, counter);
            if !self.contains(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn check_unique(names: &[String]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(TableError::DuplicateName(name.clone()));
        }
    }
    Ok(())
}


// src/table/column.rs
