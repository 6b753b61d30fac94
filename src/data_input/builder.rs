// src/data_input/builder.rs

use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_DELIMITER;
use crate::data_input::line_filter::LineFilter;
use crate::data_input::{csv_reader, excel_reader, infer, text_reader};
use crate::error::{Result, TableError};
use crate::table::{Column, ColumnStore, Table};

#[derive(Debug, Clone)]
enum Source {
    CsvPath(PathBuf),
    CsvText(String),
    TxtPath(PathBuf),
    TxtText(String),
    ExcelPath(PathBuf),
    Rows(Vec<Vec<String>>),
    Columns(Vec<Column>),
}

impl Source {
    fn kind(&self) -> &'static str {
        match self {
            Source::CsvPath(_) | Source::CsvText(_) => "csv",
            Source::TxtPath(_) | Source::TxtText(_) => "text",
            Source::ExcelPath(_) => "spreadsheet",
            Source::Rows(_) | Source::Columns(_) => "data",
        }
    }
}

/// Column names kept by the validity filter: exact names, or regular
/// expressions searched anywhere in the name.
struct NameFilter {
    exact: Vec<String>,
    patterns: Vec<Regex>,
}

impl NameFilter {
    fn new(valid: &[String], match_regex: bool) -> Result<Self> {
        let mut patterns = Vec::new();
        if match_regex {
            for pattern in valid {
                let regex = Regex::new(pattern).map_err(|source| TableError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                patterns.push(regex);
            }
        }
        Ok(Self { exact: valid.to_vec(), patterns })
    }

    fn accepts(&self, name: &str) -> bool {
        self.exact.iter().any(|n| n == name) || self.patterns.iter().any(|r| r.is_match(name))
    }
}

/// Builds a [`Table`] from exactly one source plus options.
///
/// ```no_run
/// use timeline_table::Table;
///
/// let table = Table::builder()
///     .csv_path("probes.csv")
///     .time_name("Time")
///     .title("run1")
///     .build()?;
/// # Ok::<(), timeline_table::TableError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder {
    sources: Vec<Source>,
    names: Option<Vec<String>>,
    time_name: Option<String>,
    valid_names: Option<Vec<String>>,
    valid_regex: bool,
    filter: LineFilter,
    delimiter: u8,
    title: Option<String>,
    sample_file: bool,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            names: None,
            time_name: None,
            valid_names: None,
            valid_regex: false,
            filter: LineFilter::default(),
            delimiter: DEFAULT_DELIMITER,
            title: None,
            sample_file: false,
        }
    }

    // ── sources ─────────────────────────────────────────────────────────────

    pub fn csv_path(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.push(Source::CsvPath(path.as_ref().to_path_buf()));
        self
    }

    pub fn csv_str(mut self, text: impl Into<String>) -> Self {
        self.sources.push(Source::CsvText(text.into()));
        self
    }

    pub fn txt_path(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.push(Source::TxtPath(path.as_ref().to_path_buf()));
        self
    }

    pub fn txt_str(mut self, text: impl Into<String>) -> Self {
        self.sources.push(Source::TxtText(text.into()));
        self
    }

    pub fn excel_path(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.push(Source::ExcelPath(path.as_ref().to_path_buf()));
        self
    }

    /// Picks the reader from the file extension: `.csv` is delimited text,
    /// `.xls`/`.xlsx`/`.xlsm`/`.ods` a spreadsheet, `.xy` a sample file and
    /// anything else whitespace text.
    pub fn file(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => self.csv_path(path),
            "xls" | "xlsx" | "xlsm" | "ods" => self.excel_path(path),
            "xy" => self.txt_path(path).sample_file(true),
            _ => self.txt_path(path),
        }
    }

    /// Raw string cells, one `Vec` per row. Requires [`names`](Self::names).
    pub fn rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.sources.push(Source::Rows(rows));
        self
    }

    /// Already typed columns. Requires [`names`](Self::names).
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.sources.push(Source::Columns(columns));
        self
    }

    // ── options ─────────────────────────────────────────────────────────────

    pub fn names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn time_name(mut self, name: &str) -> Self {
        self.time_name = Some(name.to_string());
        self
    }

    /// Keeps only the time column and the columns listed in `valid`. With
    /// `match_regex` the entries are also tried as regular expressions,
    /// searched anywhere in the name. Each source gets its own set, so groups
    /// read with different patterns are combined afterwards with [`Table::join`].
    pub fn valid_names<S: Into<String>>(
        mut self,
        valid: impl IntoIterator<Item = S>,
        match_regex: bool,
    ) -> Self {
        self.valid_names = Some(valid.into_iter().map(Into::into).collect());
        self.valid_regex = match_regex;
        self
    }

    pub fn skip_header(mut self, lines: usize) -> Self {
        self.filter.skip_header = lines;
        self
    }

    pub fn strip_characters(mut self, chars: &str) -> Self {
        self.filter.strip_characters = Some(chars.to_string());
        self
    }

    pub fn replace_first_line(mut self, line: &str) -> Self {
        self.filter.replace_first_line = Some(line.to_string());
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Treat a text source as a sample file (field names from the file name).
    pub fn sample_file(mut self, sample: bool) -> Self {
        self.sample_file = sample;
        self
    }

    // ── build ───────────────────────────────────────────────────────────────

    pub fn build(mut self) -> Result<Table> {
        let source = match self.sources.len() {
            0 => return Err(TableError::MissingSource),
            1 => self.sources.remove(0),
            _ => {
                let kinds: Vec<&str> = self.sources.iter().map(Source::kind).collect();
                return Err(TableError::AmbiguousSource(kinds.join(", ")));
            }
        };

        let mut title = self.title.clone();
        let mut store = self.read(source, &mut title)?;
        if store.width() == 0 {
            return Err(TableError::EmptyInput);
        }

        let time_label = match &self.time_name {
            Some(name) if store.contains(name) => name.clone(),
            Some(name) => {
                return Err(TableError::UnknownTimeColumn {
                    name: name.clone(),
                    available: store.names().to_vec(),
                })
            }
            None => store.names()[0].clone(),
        };

        let mut eliminated = BTreeSet::new();
        if let Some(valid) = &self.valid_names {
            let filter = NameFilter::new(valid, self.valid_regex)?;
            let dropped = store.retain(|_, name| name == time_label || filter.accepts(name));
            if !dropped.is_empty() {
                log::info!("Eliminated columns: {}", dropped.join(", "));
            }
            eliminated.extend(dropped);
        }
        let time = store.position(&time_label).ok_or_else(|| TableError::UnknownTimeColumn {
            name: time_label.clone(),
            available: store.names().to_vec(),
        })?;

        if let Some(title) = &title {
            let names = store
                .names()
                .iter()
                .enumerate()
                .map(|(i, n)| if i == time { n.clone() } else { format!("{} {}", title, n) })
                .collect();
            store.set_names(names)?;
        }

        log::debug!(
            "Built table: {} columns, {} rows, time column '{}'",
            store.width(),
            store.rows(),
            time_label
        );
        Table::from_parts(store, time, title, eliminated)
    }

    fn read(&self, source: Source, title: &mut Option<String>) -> Result<ColumnStore> {
        let names = self.names.as_deref();
        match source {
            Source::CsvPath(path) => {
                let text = fs::read_to_string(&path)?;
                csv_reader::read_csv(self.filter.apply(&text).as_bytes(), names, self.delimiter)
            }
            Source::CsvText(text) => {
                csv_reader::read_csv(self.filter.apply(&text).as_bytes(), names, self.delimiter)
            }
            Source::TxtPath(path) if self.sample_file => {
                let fields = match names {
                    Some(n) => n.to_vec(),
                    None => text_reader::sample_fields(&path),
                };
                let text = fs::read_to_string(&path)?;
                text_reader::read_sample(&self.filter.apply(&text), &fields)
            }
            Source::TxtText(text) if self.sample_file => {
                let fields = names.ok_or(TableError::MissingNames)?;
                text_reader::read_sample(&self.filter.apply(&text), fields)
            }
            Source::TxtPath(path) => {
                let text = fs::read_to_string(&path)?;
                self.read_timeline(&text, title)
            }
            Source::TxtText(text) => self.read_timeline(&text, title),
            Source::ExcelPath(path) => excel_reader::read_excel(&path),
            Source::Rows(rows) => {
                let names = self.names.clone().ok_or(TableError::MissingNames)?;
                infer::columns_from_rows(names, rows)
            }
            Source::Columns(columns) => {
                let names = self.names.clone().ok_or(TableError::MissingNames)?;
                ColumnStore::from_columns(names, columns)
            }
        }
    }

    fn read_timeline(&self, text: &str, title: &mut Option<String>) -> Result<ColumnStore> {
        let (store, derived) =
            text_reader::read_text(&self.filter.apply(text), self.names.as_deref(), title.is_none())?;
        if title.is_none() {
            *title = derived;
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect()
    }

    #[test]
    fn test_no_source() {
        assert!(matches!(TableBuilder::new().build(), Err(TableError::MissingSource)));
    }

    #[test]
    fn test_two_sources_are_ambiguous() {
        let err = TableBuilder::new()
            .csv_str("t\n0\n")
            .rows(rows(&[&["0"]]))
            .names(["t"])
            .build()
            .unwrap_err();
        assert!(matches!(err, TableError::AmbiguousSource(ref s) if s == "csv, data"));
    }

    #[test]
    fn test_rows_need_names() {
        let err = TableBuilder::new().rows(rows(&[&["0", "1"]])).build().unwrap_err();
        assert!(matches!(err, TableError::MissingNames));
    }

    #[test]
    fn test_rows_type_inference() {
        let t = TableBuilder::new()
            .rows(rows(&[&["0", "a", "1"], &["1", "bcd", "2"]]))
            .names(["t", "label", "v"])
            .build()
            .unwrap();
        assert_eq!(t.column_type("label").unwrap(), crate::table::ColumnType::Text { width: 3 });
        assert_eq!(t.f64_column("v").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_unknown_time_name() {
        let err = TableBuilder::new().csv_str("t,a\n0,1\n").time_name("x").build().unwrap_err();
        assert!(matches!(err, TableError::UnknownTimeColumn { ref name, .. } if name == "x"));
    }

    #[test]
    fn test_time_name_not_first() {
        let t = TableBuilder::new().csv_str("a,t\n5,0\n6,1\n").time_name("t").build().unwrap();
        assert_eq!(t.time_name(), "t");
        assert_eq!(t.value_names(), vec!["a".to_string()]);
        assert_eq!(t.times(), &[0.0, 1.0]);
    }

    #[test]
    fn test_valid_names_and_title() {
        let t = TableBuilder::new()
            .csv_str("t,p,U,k\n0,1,2,3\n")
            .valid_names(["p", "^U"], true)
            .title("run")
            .build()
            .unwrap();
        assert_eq!(t.names(), &["t", "run p", "run U"]);
        assert!(t.eliminated_names().contains("k"));
        assert_eq!(t.title(), Some("run"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = TableBuilder::new()
            .csv_str("t,a\n0,1\n")
            .valid_names(["("], true)
            .build()
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidPattern { .. }));
    }

    #[test]
    fn test_line_filter_options() {
        let t = TableBuilder::new()
            .csv_str("garbage\n\"0\",\"1\"\n\"1\",\"2\"\n")
            .replace_first_line("t,a")
            .strip_characters("\"")
            .build()
            .unwrap();
        assert_eq!(t.names(), &["t", "a"]);
        assert_eq!(t.f64_column("a").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_timeline_title_derivation() {
        let t = TableBuilder::new()
            .txt_str("# Time x y\n0 1 2\n1 2 3\n")
            .names(["probe", "a", "b"])
            .build()
            .unwrap();
        assert_eq!(t.title(), Some("probe"));
        assert_eq!(t.names(), &["index", "probe a", "probe b"]);
    }

    #[test]
    fn test_unsorted_input_rejected() {
        let err = TableBuilder::new().csv_str("t,a\n1,0\n0,0\n").build().unwrap_err();
        assert!(matches!(err, TableError::UnsortedTime { row: 1, .. }));
    }
}

// src/data_input/builder.rs
