// src/data_input/mod.rs

pub mod builder;
pub mod csv_reader;
pub mod excel_reader;
pub mod infer;
pub mod line_filter;
pub mod text_reader;

// src/data_input/mod.rs
