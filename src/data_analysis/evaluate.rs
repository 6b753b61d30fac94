// src/data_analysis/evaluate.rs

use crate::error::Result;
use crate::table::{CellValue, Column, Table};
use crate::types::NamedValues;

/// Lookup policy for points between or outside samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalOptions {
    /// Outside the time domain return the nearest boundary value instead of "no value".
    pub extrapolate: bool,
    /// Return "no value" unless `t` is exactly a sample time.
    pub exact_only: bool,
}

/// Value of `column` at time `t` over the ascending axis `times`.
///
/// An exact hit returns the stored value untouched. Between samples numbers
/// are interpolated linearly and text takes the nearer neighbour.
pub(crate) fn interpolate(times: &[f64], column: &Column, t: f64, options: EvalOptions) -> CellValue {
    let n = times.len();
    if n == 0 || t.is_nan() {
        return column.missing_value();
    }

    // first sample not before t
    let hi = times.partition_point(|&x| x < t);
    if hi < n && times[hi] == t {
        return column.value(hi);
    }
    if options.exact_only {
        return column.missing_value();
    }
    if hi == 0 || hi == n {
        return if options.extrapolate {
            column.value(if hi == 0 { 0 } else { n - 1 })
        } else {
            column.missing_value()
        };
    }

    let lo = hi - 1;
    let fraction = (t - times[lo]) / (times[hi] - times[lo]);
    match column {
        Column::F64(v) => CellValue::Number(v[lo] + (v[hi] - v[lo]) * fraction),
        Column::Str(v) => CellValue::Text((if fraction < 0.5 { &v[lo] } else { &v[hi] }).clone()),
    }
}

impl Table {
    /// Value of column `name` at time `t`.
    ///
    /// # Arguments
    ///
    /// * `t` - The time at which the column is evaluated.
    /// * `name` - The column. Numeric columns yield `CellValue::Number` (NaN for
    ///   "no value"), text columns `CellValue::Text` (empty for "no value").
    /// * `options` - Extrapolation and exact-match policy.
    pub fn evaluate(&self, t: f64, name: &str, options: EvalOptions) -> Result<CellValue> {
        Ok(interpolate(self.times(), self.column(name)?, t, options))
    }

    /// Every non-time column evaluated at `t`, in column order.
    pub fn evaluate_all(&self, t: f64, options: EvalOptions) -> NamedValues {
        let times = self.times();
        let time = self.time_index();
        self.store()
            .names()
            .iter()
            .zip(self.store().columns())
            .enumerate()
            .filter(|(i, _)| *i != time)
            .map(|(_, (name, column))| (name.clone(), interpolate(times, column, t, options)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;

    fn linear() -> Table {
        // y = 2t + 1
        Table::from_columns(
            vec!["t".to_string(), "y".to_string(), "s".to_string()],
            vec![
                Column::F64(vec![0.0, 0.5, 2.0, 3.0]),
                Column::F64(vec![1.0, 2.0, 5.0, 7.0]),
                Column::Str(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            ],
            None,
        )
        .unwrap()
    }

    fn number(v: CellValue) -> f64 {
        v.as_f64().unwrap()
    }

    #[test]
    fn test_linear_interpolation() {
        let t = linear();
        for &x in &[0.1, 0.25, 1.3, 2.7] {
            let y = number(t.evaluate(x, "y", EvalOptions::default()).unwrap());
            assert!((y - (2.0 * x + 1.0)).abs() < 1e-12, "t={} y={}", x, y);
        }
    }

    #[test]
    fn test_exact_hit_is_stored_value() {
        let t = linear();
        let y = number(t.evaluate(0.5, "y", EvalOptions::default()).unwrap());
        assert_eq!(y.to_bits(), 2.0f64.to_bits());
    }

    #[test]
    fn test_outside_domain() {
        let t = linear();
        assert!(number(t.evaluate(-1.0, "y", EvalOptions::default()).unwrap()).is_nan());
        assert!(number(t.evaluate(4.0, "y", EvalOptions::default()).unwrap()).is_nan());
        let ext = EvalOptions { extrapolate: true, ..Default::default() };
        assert_eq!(number(t.evaluate(-1.0, "y", ext).unwrap()), 1.0);
        assert_eq!(number(t.evaluate(4.0, "y", ext).unwrap()), 7.0);
        assert_eq!(t.evaluate(9.0, "s", EvalOptions::default()).unwrap(), CellValue::Text(String::new()));
    }

    #[test]
    fn test_exact_only() {
        let t = linear();
        let exact = EvalOptions { extrapolate: true, exact_only: true };
        assert!(number(t.evaluate(1.0, "y", exact).unwrap()).is_nan());
        assert!(number(t.evaluate(-1.0, "y", exact).unwrap()).is_nan());
        assert_eq!(number(t.evaluate(2.0, "y", exact).unwrap()), 5.0);
    }

    #[test]
    fn test_duplicated_time_returns_first_occurrence() {
        let t = Table::from_columns(
            vec!["t".to_string(), "v".to_string(), "s".to_string()],
            vec![
                Column::F64(vec![0.0, 1.0, 1.0, 2.0]),
                Column::F64(vec![0.0, 5.0, 7.0, 9.0]),
                Column::Str(vec!["a".into(), "first".into(), "second".into(), "d".into()]),
            ],
            None,
        )
        .unwrap();
        assert_eq!(t.evaluate(1.0, "v", EvalOptions::default()).unwrap(), CellValue::Number(5.0));
        let exact = EvalOptions { exact_only: true, ..Default::default() };
        assert_eq!(t.evaluate(1.0, "v", exact).unwrap(), CellValue::Number(5.0));
        assert_eq!(t.evaluate(1.0, "s", EvalOptions::default()).unwrap(), CellValue::Text("first".into()));
        // the segments on either side use the neighbouring duplicate
        assert_eq!(t.evaluate(0.5, "v", EvalOptions::default()).unwrap(), CellValue::Number(2.5));
        assert_eq!(t.evaluate(1.5, "v", EvalOptions::default()).unwrap(), CellValue::Number(8.0));
    }

    #[test]
    fn test_text_nearest_neighbour() {
        let t = linear();
        assert_eq!(t.evaluate(0.9, "s", EvalOptions::default()).unwrap(), CellValue::Text("b".into()));
        assert_eq!(t.evaluate(1.4, "s", EvalOptions::default()).unwrap(), CellValue::Text("c".into()));
    }

    #[test]
    fn test_scenario_half_way() {
        let t = Table::from_columns(
            vec!["time".to_string(), "value".to_string()],
            vec![Column::F64(vec![0.0, 1.0, 2.0]), Column::F64(vec![0.0, 10.0, 20.0])],
            None,
        )
        .unwrap();
        assert_eq!(t.evaluate(0.5, "value", EvalOptions::default()).unwrap(), CellValue::Number(5.0));
    }

    #[test]
    fn test_evaluate_all_and_unknown() {
        let t = linear();
        let all = t.evaluate_all(2.0, EvalOptions::default());
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], ("y".to_string(), CellValue::Number(5.0)));
        assert!(matches!(
            t.evaluate(1.0, "nope", EvalOptions::default()),
            Err(TableError::UnknownColumn(_))
        ));
    }
}

// src/data_analysis/evaluate.rs
