// src/data_analysis/join.rs

use std::collections::BTreeSet;

use crate::constants::{DEFAULT_JOIN_PREFIX, TIME_MATCH_TOLERANCE};
use crate::error::{Result, TableError};
use crate::table::Table;

impl Table {
    /// Combines two tables that share a time axis.
    ///
    /// Both tables must have the same number of rows and time values that agree
    /// within `TIME_MATCH_TOLERANCE`. The result holds all columns of `self`
    /// followed by the non-time columns of `other`. Names of `other` that are
    /// already taken get `prefix`, or the other table's title plus `_`, or
    /// `other_` in front.
    pub fn join(&self, other: &Table, prefix: Option<&str>) -> Result<Table> {
        if self.len() != other.len() {
            return Err(TableError::WrongDataSize(format!(
                "Size of the arrays differs: {} and {} rows",
                self.len(),
                other.len()
            )));
        }
        let deviation = self
            .times()
            .iter()
            .zip(other.times())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        if deviation > TIME_MATCH_TOLERANCE {
            return Err(TableError::WrongDataSize(format!(
                "Times do not have the same values (deviation {})",
                deviation
            )));
        }

        let prefix = match (prefix, other.title()) {
            (Some(p), _) => p.to_string(),
            (None, Some(title)) => format!("{}_", title),
            (None, None) => DEFAULT_JOIN_PREFIX.to_string(),
        };

        let mut store = self.store().clone();
        let other_time = other.time_index();
        for (i, (name, column)) in other.store().names().iter().zip(other.store().columns()).enumerate() {
            if i == other_time {
                continue;
            }
            let mut joined = name.clone();
            if store.contains(&joined) {
                joined = store.unique_name(&format!("{}{}", prefix, name));
            }
            store.push_column(joined, column.clone())?;
        }
        Table::from_parts(store, self.time_index(), None, BTreeSet::new())
    }
}


// src/data_analysis/join.rs
