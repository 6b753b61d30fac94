// src/table/mod.rs

pub mod column;

use std::collections::BTreeSet;

use ndarray::ArrayView1;
use regex::Regex;

use crate::constants::THIS_VARIABLE;
use crate::data_input::builder::TableBuilder;
use crate::error::{ExpressionError, Result, TableError};
use crate::expression::{Expr, Variables};

pub use column::{CellValue, Column, ColumnStore, ColumnType};

/// A named, time-indexed table.
///
/// Exactly one numeric column is the time axis. Its values are non-decreasing;
/// this is checked whenever the table is built and whenever time values change.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    store: ColumnStore,
    time: usize,
    title: Option<String>,
    eliminated: BTreeSet<String>,
}

impl Table {
    /// Starts building a table from a file or from raw data.
    pub fn builder() -> TableBuilder {
        TableBuilder::new()
    }

    /// Creates a table from typed columns. Without `time_name` the first column is the time.
    pub fn from_columns(
        names: Vec<String>,
        columns: Vec<Column>,
        time_name: Option<&str>,
    ) -> Result<Self> {
        let store = ColumnStore::from_columns(names, columns)?;
        let time = match time_name {
            Some(name) => store.position(name).ok_or_else(|| TableError::UnknownTimeColumn {
                name: name.to_string(),
                available: store.names().to_vec(),
            })?,
            None => 0,
        };
        Self::from_parts(store, time, None, BTreeSet::new())
    }

    pub(crate) fn from_parts(
        store: ColumnStore,
        time: usize,
        title: Option<String>,
        eliminated: BTreeSet<String>,
    ) -> Result<Self> {
        if store.width() == 0 {
            return Err(TableError::EmptyInput);
        }
        let table = Self { store, time, title, eliminated };
        table.validate_time()?;
        Ok(table)
    }

    /// The time column must be numeric, free of NaN and non-decreasing.
    fn validate_time(&self) -> Result<()> {
        let name = self.time_name();
        let times = self
            .store
            .column(self.time)
            .as_f64()
            .ok_or_else(|| TableError::NonNumericTime(name.to_string()))?;
        for (row, t) in times.iter().enumerate() {
            if t.is_nan() || (row > 0 && *t < times[row - 1]) {
                return Err(TableError::UnsortedTime { name: name.to_string(), row });
            }
        }
        Ok(())
    }

    // ── accessors ───────────────────────────────────────────────────────────

    /// All column names in output order, time column included.
    pub fn names(&self) -> &[String] {
        self.store.names()
    }

    /// Column names without the time column.
    pub fn value_names(&self) -> Vec<String> {
        self.names()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.time)
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn time_name(&self) -> &str {
        &self.store.names()[self.time]
    }

    pub(crate) fn time_index(&self) -> usize {
        self.time
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Columns dropped by the name filter at construction.
    pub fn eliminated_names(&self) -> &BTreeSet<String> {
        &self.eliminated
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.store.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns, time included.
    pub fn width(&self) -> usize {
        self.store.width()
    }

    pub fn times(&self) -> &[f64] {
        self.store.column(self.time).as_f64().unwrap_or(&[])
    }

    /// First and last time, `None` for an empty table.
    pub fn t_range(&self) -> Option<(f64, f64)> {
        let times = self.times();
        Some((*times.first()?, *times.last()?))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        Ok(self.store.column(self.index_of(name)?))
    }

    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        Ok(self.column(name)?.column_type())
    }

    /// Values of a numeric column.
    pub fn f64_column(&self, name: &str) -> Result<&[f64]> {
        self.column(name)?
            .as_f64()
            .ok_or_else(|| TableError::NonNumericColumn(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Result<usize> {
        self.store
            .position(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    pub(crate) fn store(&self) -> &ColumnStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut ColumnStore {
        &mut self.store
    }

    // ── mutation ────────────────────────────────────────────────────────────

    /// Renames every column through `f`. The time column is only renamed when
    /// `rename_time` is set. Fails without changes if the new names collide.
    pub fn rename<F>(&mut self, mut f: F, rename_time: bool) -> Result<()>
    where
        F: FnMut(&str) -> String,
    {
        let names = self
            .names()
            .iter()
            .enumerate()
            .map(|(i, n)| if i == self.time && !rename_time { n.clone() } else { f(n) })
            .collect();
        self.store.set_names(names)
    }

    /// Adds a column that must have exactly `len()` values.
    ///
    /// With `allow_duplicates` a taken name is made unique by appending `_1`,
    /// `_2`, ...; otherwise a taken name is an error. Returns the name used.
    pub fn append(
        &mut self,
        name: &str,
        column: impl Into<Column>,
        allow_duplicates: bool,
    ) -> Result<String> {
        let column = column.into();
        let final_name = if allow_duplicates {
            self.store.unique_name(name)
        } else {
            name.to_string()
        };
        if final_name != name {
            log::warn!(
                "Changing name {} to {} because it already exists in the data",
                name,
                final_name
            );
        }
        self.store.push_column(final_name.clone(), column)?;
        Ok(final_name)
    }

    /// Overwrites an existing column with the result of `expr`.
    ///
    /// Every numeric column is a variable of the expression; `this` aliases the
    /// column being recalculated and `data['some name']` reaches names that are
    /// not identifiers.
    pub fn recalc(&mut self, name: &str, expr: &str) -> Result<()> {
        let index = self.index_of(name)?;
        let parsed = Expr::parse(expr)?;
        let values = parsed.evaluate(&TableVariables { table: self, this: Some(index) })?;
        self.commit_columns(vec![(index, values)])
    }

    /// Recalculates every column whose name matches the regular expression `pattern`.
    /// Returns the names that were recalculated.
    ///
    /// All targets are evaluated against the table as it was before the call.
    /// On any error no column is changed.
    pub fn recalc_matching(&mut self, pattern: &str, expr: &str) -> Result<Vec<String>> {
        let regex = Regex::new(pattern).map_err(|source| TableError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let targets: Vec<String> = self
            .names()
            .iter()
            .filter(|n| regex.is_match(n))
            .cloned()
            .collect();
        let parsed = Expr::parse(expr)?;
        let mut updates = Vec::with_capacity(targets.len());
        for name in &targets {
            let index = self.index_of(name)?;
            let values = parsed.evaluate(&TableVariables { table: self, this: Some(index) })?;
            updates.push((index, values));
        }
        self.commit_columns(updates)?;
        Ok(targets)
    }

    /// Swaps in new numeric columns. If the time column is among them and is
    /// no longer sorted, every column is restored and the error returned.
    fn commit_columns(&mut self, updates: Vec<(usize, Vec<f64>)>) -> Result<()> {
        let touches_time = updates.iter().any(|(index, _)| *index == self.time);
        let previous: Vec<(usize, Column)> = updates
            .into_iter()
            .map(|(index, values)| {
                (index, std::mem::replace(self.store.column_mut(index), Column::F64(values)))
            })
            .collect();
        if touches_time {
            if let Err(e) = self.validate_time() {
                for (index, column) in previous {
                    *self.store.column_mut(index) = column;
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Adds a new column computed from `expr`. The name must not exist yet.
    pub fn append_expression(&mut self, name: &str, expr: &str) -> Result<()> {
        if self.contains(name) {
            return Err(TableError::DuplicateName(name.to_string()));
        }
        let parsed = Expr::parse(expr)?;
        let values = parsed.evaluate(&TableVariables { table: self, this: None })?;
        self.append(name, Column::F64(values), false)?;
        Ok(())
    }
}

/// Exposes the numeric columns of a table to the expression language.
struct TableVariables<'a> {
    table: &'a Table,
    this: Option<usize>,
}

impl Variables for TableVariables<'_> {
    fn rows(&self) -> usize {
        self.table.len()
    }

    fn lookup(&self, name: &str) -> std::result::Result<ArrayView1<'_, f64>, ExpressionError> {
        let index = match self.table.store.position(name) {
            Some(i) => i,
            None if name == THIS_VARIABLE => self.this.ok_or(ExpressionError::ThisUndefined)?,
            None => return Err(ExpressionError::UnknownColumn(name.to_string())),
        };
        self.table
            .store
            .column(index)
            .as_f64()
            .map(ArrayView1::from)
            .ok_or_else(|| ExpressionError::NonNumericColumn(self.table.store.names()[index].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(
            vec!["t".to_string(), "a".to_string(), "b".to_string()],
            vec![
                Column::F64(vec![0.0, 1.0, 2.0]),
                Column::F64(vec![1.0, 2.0, 3.0]),
                Column::F64(vec![10.0, 20.0, 30.0]),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_accessors() {
        let t = sample();
        assert_eq!(t.time_name(), "t");
        assert_eq!(t.value_names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.width(), 3);
        assert_eq!(t.t_range(), Some((0.0, 2.0)));
    }

    #[test]
    fn test_unsorted_time_rejected() {
        let err = Table::from_columns(
            vec!["t".to_string()],
            vec![Column::F64(vec![0.0, 2.0, 1.0])],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::UnsortedTime { row: 2, .. }));
    }

    #[test]
    fn test_text_time_rejected() {
        let err = Table::from_columns(
            vec!["t".to_string()],
            vec![Column::Str(vec!["x".to_string()])],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::NonNumericTime(_)));
    }

    #[test]
    fn test_rename_identity_keeps_names() {
        let mut t = sample();
        t.rename(|n| n.to_string(), true).unwrap();
        assert_eq!(t.names(), sample().names());
        assert_eq!(t.time_name(), "t");
    }

    #[test]
    fn test_rename_skips_time_unless_requested() {
        let mut t = sample();
        t.rename(|n| format!("x {}", n), false).unwrap();
        assert_eq!(t.time_name(), "t");
        assert_eq!(t.names()[1], "x a");
        t.rename(|n| n.to_uppercase(), true).unwrap();
        assert_eq!(t.time_name(), "T");
    }

    #[test]
    fn test_rename_collision_is_error() {
        let mut t = sample();
        let err = t.rename(|_| "same".to_string(), false).unwrap_err();
        assert!(matches!(err, TableError::DuplicateName(_)));
        assert_eq!(t.names(), sample().names());
    }

    #[test]
    fn test_append_with_duplicates() {
        let mut t = sample();
        let name = t.append("a", vec![0.0, 0.0, 0.0], true).unwrap();
        assert_eq!(name, "a_1");
        let err = t.append("a", vec![0.0, 0.0, 0.0], false).unwrap_err();
        assert!(matches!(err, TableError::DuplicateName(_)));
        let err = t.append("c", vec![0.0], false).unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { expected: 3, actual: 1, .. }));
    }

    #[test]
    fn test_recalc_with_this() {
        let mut t = sample();
        t.recalc("a", "this * 2 + b").unwrap();
        assert_eq!(t.f64_column("a").unwrap(), &[12.0, 24.0, 36.0]);
    }

    #[test]
    fn test_recalc_time_must_stay_sorted() {
        let mut t = sample();
        let err = t.recalc("t", "-t").unwrap_err();
        assert!(matches!(err, TableError::UnsortedTime { .. }));
        assert_eq!(t.times(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_append_expression_unknown_column() {
        let mut t = sample();
        let err = t.append_expression("c", "a + missing").unwrap_err();
        assert!(matches!(
            err,
            TableError::Expression(ExpressionError::UnknownColumn(ref n)) if n == "missing"
        ));
        assert!(!t.contains("c"));
    }

    #[test]
    fn test_append_expression_this_undefined() {
        let mut t = sample();
        let err = t.append_expression("c", "this + 1").unwrap_err();
        assert!(matches!(err, TableError::Expression(ExpressionError::ThisUndefined)));
    }

    #[test]
    fn test_recalc_matching() {
        let mut t = sample();
        let done = t.recalc_matching("^[ab]$", "this * 0").unwrap();
        assert_eq!(done, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(t.f64_column("b").unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_recalc_matching_is_all_or_nothing() {
        let mut t = Table::builder()
            .csv_str("a,t\n1,0\n2,1\n")
            .time_name("t")
            .build()
            .unwrap();
        let before = t.clone();
        let err = t.recalc_matching(".", "-this").unwrap_err();
        assert!(matches!(err, TableError::UnsortedTime { .. }));
        assert_eq!(t, before);
        assert_eq!(t.f64_column("a").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_recalc_matching_reads_unchanged_table() {
        let mut t = sample();
        t.recalc_matching("^[ab]$", "a + b").unwrap();
        // b sees the old a, not the freshly recalculated one
        assert_eq!(t.f64_column("a").unwrap(), &[11.0, 22.0, 33.0]);
        assert_eq!(t.f64_column("b").unwrap(), &[11.0, 22.0, 33.0]);
    }
}

// src/table/mod.rs
