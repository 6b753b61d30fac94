// src/data_analysis/mod.rs

pub mod evaluate;
pub mod join;
pub mod metrics;
pub mod resample;

// src/data_analysis/mod.rs
