// src/data_output/mod.rs

pub mod csv_writer;

// src/data_output/mod.rs
