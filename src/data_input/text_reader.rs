// src/data_input/text_reader.rs

//! Whitespace separated text: timeline files written by the solver utilities
//! and "sample" files written by set sampling.

use std::path::Path;

use crate::constants::{
    SAMPLE_COORD_NAME, TEXT_COMMENT_CHAR, TIMELINE_INDEX_NAME, VECTOR_COMPONENT_SUFFIXES,
    VECTOR_MAGNITUDE_SUFFIX,
};
use crate::data_input::infer::columns_from_rows;
use crate::error::{Result, TableError};
use crate::table::{Column, ColumnStore};

/// Splits a line into cells, dropping any trailing comment.
fn cells(line: &str) -> Vec<String> {
    let content = match line.find(TEXT_COMMENT_CHAR) {
        Some(pos) => &line[..pos],
        None => line,
    };
    content.split_whitespace().map(str::to_string).collect()
}

/// Data rows of `text`: empty lines and comment lines are skipped.
fn data_rows<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<Vec<String>> {
    lines
        .filter_map(|line| {
            let row = cells(line);
            if row.is_empty() {
                None
            } else {
                Some(row)
            }
        })
        .collect()
}

/// Reads a timeline file.
///
/// The first non-empty line is the header; a leading `#` on it is ignored.
/// When `names` are given they replace the header names. If there are more
/// names than columns and `derive_title` is set, the surplus leading names
/// joined by `_` become the title and an `index` column is inserted at the
/// split point; the last names then label the columns.
///
/// Returns the columns and the derived title, if any.
pub fn read_text(
    text: &str,
    names: Option<&[String]>,
    derive_title: bool,
) -> Result<(ColumnStore, Option<String>)> {
    let mut lines = text.lines().skip_while(|l| l.trim().is_empty());
    let header_line = lines.next().ok_or(TableError::EmptyInput)?;
    let header: Vec<String> = header_line
        .trim_start()
        .trim_start_matches(TEXT_COMMENT_CHAR)
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if header.is_empty() {
        return Err(TableError::EmptyInput);
    }
    let rows = data_rows(lines);

    let (names, title) = match names {
        None => (header, None),
        Some(given) => label_columns(given, header.len(), derive_title)?,
    };
    log::debug!("Text: {} columns, {} rows", names.len(), rows.len());
    Ok((columns_from_rows(names, rows)?, title))
}

fn label_columns(
    given: &[String],
    columns: usize,
    derive_title: bool,
) -> Result<(Vec<String>, Option<String>)> {
    let mut names = given.to_vec();
    let mut title = None;
    if derive_title {
        let split = (names.len() + 1).saturating_sub(columns).min(names.len());
        let joined = names[..split].join("_");
        if !joined.is_empty() {
            title = Some(joined);
        }
        names.insert(split, TIMELINE_INDEX_NAME.to_string());
    }
    if names.len() < columns {
        return Err(TableError::WrongDataSize(format!(
            "{} names for {} columns",
            names.len(),
            columns
        )));
    }
    let names = names.split_off(names.len() - columns);
    Ok((names, title))
}

/// Field names of a sample file: the file stem split on `_` minus its first part.
///
/// `line_p_U.xy` holds the fields `p` and `U`.
pub fn sample_fields(path: &Path) -> Vec<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().split('_').skip(1).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Reads a sample file: a coordinate column followed by either one column per
/// field or three columns per field for vectors.
///
/// Vector fields become `name_x`, `name_y`, `name_z` and a magnitude column
/// `name_mag`.
pub fn read_sample(text: &str, fields: &[String]) -> Result<ColumnStore> {
    let rows = data_rows(text.lines());
    let width = rows.first().map(Vec::len).ok_or(TableError::EmptyInput)?;
    let scalar = fields.len() + 1;
    let vector = 3 * fields.len() + 1;

    let mut names = vec![SAMPLE_COORD_NAME.to_string()];
    if width == scalar {
        names.extend(fields.iter().cloned());
        return columns_from_rows(names, rows);
    }
    if width != vector {
        return Err(TableError::SampleColumnMismatch {
            names: fields.to_vec(),
            columns: width,
            scalar,
            vector,
        });
    }

    for field in fields {
        for suffix in VECTOR_COMPONENT_SUFFIXES {
            names.push(format!("{}_{}", field, suffix));
        }
    }
    let raw = columns_from_rows(names, rows)?;

    let mut store = ColumnStore::default();
    store.push_column(raw.names()[0].clone(), raw.column(0).clone())?;
    for (i, field) in fields.iter().enumerate() {
        let mut components = Vec::with_capacity(3);
        for j in 0..3 {
            let index = 1 + 3 * i + j;
            let values = raw
                .column(index)
                .as_f64()
                .ok_or_else(|| TableError::NonNumericColumn(raw.names()[index].clone()))?;
            store.push_column(raw.names()[index].clone(), raw.column(index).clone())?;
            components.push(values);
        }
        let magnitude: Vec<f64> = (0..raw.rows())
            .map(|r| components.iter().map(|c| c[r] * c[r]).sum::<f64>().sqrt())
            .collect();
        store.push_column(format!("{}_{}", field, VECTOR_MAGNITUDE_SUFFIX), Column::F64(magnitude))?;
    }
    Ok(store)
}


// src/data_input/text_reader.rs
