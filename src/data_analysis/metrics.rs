// src/data_analysis/metrics.rs

use ndarray::ArrayView1;
use ndarray_stats::QuantileExt;
use std::ops::Range;

use crate::data_analysis::evaluate::EvalOptions;
use crate::error::{Result, TableError};
use crate::table::Table;

/// Statistics of one column over a time window.
///
/// Every field is NaN when the window holds no sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    /// Trapezoidal time integral divided by the covered time span.
    pub weighted_average: f64,
    /// First sample time inside the window.
    pub t_min: f64,
    /// Last sample time inside the window.
    pub t_max: f64,
}

/// Absolute deviation between two tables over a time window.
///
/// Every field is NaN when the window holds no sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub max: f64,
    /// Time of the largest deviation.
    pub max_pos: f64,
    pub average: f64,
    pub weighted_average: f64,
    pub t_min: f64,
    pub t_max: f64,
}

impl Metrics {
    fn empty() -> Self {
        Self {
            min: f64::NAN,
            max: f64::NAN,
            average: f64::NAN,
            weighted_average: f64::NAN,
            t_min: f64::NAN,
            t_max: f64::NAN,
        }
    }
}

impl Comparison {
    fn empty() -> Self {
        Self {
            max: f64::NAN,
            max_pos: f64::NAN,
            average: f64::NAN,
            weighted_average: f64::NAN,
            t_min: f64::NAN,
            t_max: f64::NAN,
        }
    }
}

/// Rows of the ascending `times` with `lo <= t <= hi`.
fn window(times: &[f64], lo: f64, hi: f64) -> Range<usize> {
    let start = times.partition_point(|&t| t < lo);
    let end = times.partition_point(|&t| t <= hi);
    start..end.max(start)
}

/// Trapezoidal integral of `values` over `times` divided by the time span.
/// A window without extent yields the plain mean.
fn weighted_average(times: &[f64], values: &[f64]) -> f64 {
    let (Some(first), Some(last)) = (times.first(), times.last()) else {
        return f64::NAN;
    };
    let span = last - first;
    if span == 0.0 {
        return ArrayView1::from(values).mean().unwrap_or(f64::NAN);
    }
    let integral: f64 = times
        .windows(2)
        .zip(values.windows(2))
        .map(|(t, v)| (t[1] - t[0]) * (v[0] + v[1]) / 2.0)
        .sum();
    integral / span
}

impl Table {
    /// Min, max, mean and time-weighted mean of a numeric column, restricted
    /// to `min_time <= t <= max_time` (each bound defaults to the table's range).
    pub fn metrics(&self, name: &str, min_time: Option<f64>, max_time: Option<f64>) -> Result<Metrics> {
        let values = self.f64_column(name)?;
        let times = self.times();
        let Some((first, last)) = self.t_range() else {
            return Ok(Metrics::empty());
        };
        let rows = window(times, min_time.unwrap_or(first).max(first), max_time.unwrap_or(last).min(last));
        if rows.is_empty() {
            return Ok(Metrics::empty());
        }

        let (t, v) = (&times[rows.clone()], &values[rows]);
        let view = ArrayView1::from(v);
        Ok(Metrics {
            min: *view.min_skipnan(),
            max: *view.max_skipnan(),
            average: view.mean().unwrap_or(f64::NAN),
            weighted_average: weighted_average(t, v),
            t_min: t[0],
            t_max: t[t.len() - 1],
        })
    }

    /// Compares column `name` of this table against `other_name` (default
    /// `name`) of `other`, resampled onto this table's time axis with
    /// extrapolation.
    ///
    /// # Arguments
    ///
    /// * `common` - Restrict the window to the times where both tables have data.
    /// * `min_time`, `max_time` - Further clamp the window.
    pub fn compare(
        &self,
        other: &Table,
        name: &str,
        other_name: Option<&str>,
        common: bool,
        min_time: Option<f64>,
        max_time: Option<f64>,
    ) -> Result<Comparison> {
        let other_name = other_name.unwrap_or(name);
        let own = self.f64_column(name)?;
        other.f64_column(other_name)?;
        let resampled = self.sample_from(other, other_name, EvalOptions { extrapolate: true, exact_only: false })?;
        let reference = resampled
            .as_f64()
            .ok_or_else(|| TableError::NonNumericColumn(other_name.to_string()))?;

        let times = self.times();
        let Some((mut lo, mut hi)) = self.t_range() else {
            return Ok(Comparison::empty());
        };
        if common {
            let Some((other_first, other_last)) = other.t_range() else {
                return Ok(Comparison::empty());
            };
            let shared = window(times, lo.max(other_first), hi.min(other_last));
            if shared.is_empty() {
                return Ok(Comparison::empty());
            }
            lo = times[shared.start];
            hi = times[shared.end - 1];
        }
        if let Some(t) = min_time {
            lo = lo.max(t);
        }
        if let Some(t) = max_time {
            hi = hi.min(t);
        }

        let rows = window(times, lo, hi);
        if rows.is_empty() {
            return Ok(Comparison::empty());
        }
        let t = &times[rows.clone()];
        let diff: Vec<f64> = own[rows.clone()]
            .iter()
            .zip(&reference[rows])
            .map(|(a, b)| (a - b).abs())
            .collect();

        let mut max = 0.0;
        let mut max_pos = t[0];
        for (d, time) in diff.iter().zip(t) {
            if *d > max {
                max = *d;
                max_pos = *time;
            }
        }

        Ok(Comparison {
            max,
            max_pos,
            average: ArrayView1::from(&diff[..]).mean().unwrap_or(f64::NAN),
            weighted_average: weighted_average(t, &diff),
            t_min: t[0],
            t_max: t[t.len() - 1],
        })
    }
}


// src/data_analysis/metrics.rs
