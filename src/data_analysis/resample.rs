// src/data_analysis/resample.rs

use crate::data_analysis::evaluate::{interpolate, EvalOptions};
use crate::error::{Result, TableError};
use crate::table::{CellValue, Column, Table};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResampleOptions {
    pub extrapolate: bool,
    /// Pad this table with the source's times that lie outside its own domain first.
    pub extend: bool,
    pub exact_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddTimesOptions {
    /// Fill new rows by evaluating the existing data; otherwise they hold "no value".
    pub interpolate: bool,
    pub extrapolate: bool,
}

impl Table {
    /// Column `other_name` (default `name`) of `source` evaluated at every
    /// time of this table.
    ///
    /// The result has one cell per row of this table (after extension when
    /// `options.extend` is set) and the type of the source column.
    pub fn resample(
        &mut self,
        source: &Table,
        name: &str,
        other_name: Option<&str>,
        options: ResampleOptions,
    ) -> Result<Column> {
        let source_name = other_name.unwrap_or(name);
        // unknown names fail before the table is touched
        source.column(source_name)?;
        if options.extend {
            self.extend_to(source);
        }
        let eval = EvalOptions {
            extrapolate: options.extrapolate,
            exact_only: options.exact_only,
        };
        self.sample_from(source, source_name, eval)
    }

    /// Non-extending resampling used by [`resample`](Self::resample) and comparisons.
    pub(crate) fn sample_from(&self, source: &Table, name: &str, options: EvalOptions) -> Result<Column> {
        let column = source.column(name)?;
        let source_times = source.times();
        let mut out = column.empty_like(self.len());
        for &t in self.times() {
            out.push_value(interpolate(source_times, column, t, options));
        }
        Ok(out)
    }

    /// Adds rows for the times of `source` that lie before the first or after
    /// the last time of this table. New cells hold "no value". Returns the
    /// number of rows added.
    pub fn extend_to(&mut self, source: &Table) -> usize {
        let time = self.time_index();
        let Some((first, last)) = self.t_range() else {
            let times = dedup_ascending(source.times().iter().copied());
            self.store_mut().append_rows(time, &times);
            return times.len();
        };

        let foreign = source.times();
        let before = dedup_ascending(foreign.iter().copied().take_while(|&t| t < first));
        let after = dedup_ascending(foreign.iter().copied().filter(|&t| t > last));
        if !before.is_empty() {
            self.store_mut().prepend_rows(time, &before);
        }
        if !after.is_empty() {
            self.store_mut().append_rows(time, &after);
        }
        let added = before.len() + after.len();
        if added > 0 {
            log::debug!("Extended '{}' by {} rows", self.time_name(), added);
        }
        added
    }

    /// Inserts a row for every time in `times` that is not yet present.
    ///
    /// `times` must be ascending. Existing rows keep their values; new rows are
    /// interpolated from the rows present before the call when
    /// `options.interpolate` is set and hold "no value" otherwise. Applying the
    /// same times twice changes nothing the second time. Returns the number of
    /// rows inserted.
    pub fn add_times(&mut self, times: &[f64], options: AddTimesOptions) -> Result<usize> {
        for (row, t) in times.iter().enumerate() {
            if t.is_nan() || (row > 0 && *t < times[row - 1]) {
                return Err(TableError::UnsortedTime { name: "added times".to_string(), row });
            }
        }

        let own = self.times();
        let time = self.time_index();
        let columns = self.store().columns();
        let eval = EvalOptions { extrapolate: options.extrapolate, exact_only: false };

        let mut merged: Vec<Column> = columns.iter().map(|c| c.empty_like(own.len() + times.len())).collect();
        let mut i = 0;
        let mut last: Option<f64> = None;
        let mut inserted = 0;

        for &t in times {
            while i < own.len() && own[i] < t {
                for (out, src) in merged.iter_mut().zip(columns) {
                    out.push_row_from(src, i);
                }
                last = Some(own[i]);
                i += 1;
            }
            if (i < own.len() && own[i] == t) || last == Some(t) {
                continue;
            }
            for (c, (out, src)) in merged.iter_mut().zip(columns).enumerate() {
                if c == time {
                    out.push_value(CellValue::Number(t));
                } else if options.interpolate {
                    out.push_value(interpolate(own, src, t, eval));
                } else {
                    out.push_missing();
                }
            }
            last = Some(t);
            inserted += 1;
        }

        if inserted == 0 {
            return Ok(0);
        }
        for (out, src) in merged.iter_mut().zip(columns) {
            for row in i..own.len() {
                out.push_row_from(src, row);
            }
        }
        self.store_mut().replace_all(merged)?;
        log::debug!("Inserted {} rows into '{}'", inserted, self.time_name());
        Ok(inserted)
    }
}

/// Drops repeated values from an ascending sequence.
fn dedup_ascending(times: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();
    for t in times {
        if out.last() != Some(&t) {
            out.push(t);
        }
    }
    out
}


// src/data_analysis/resample.rs
