// src/data_output/csv_writer.rs

use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::constants::DEFAULT_DELIMITER;
use crate::error::Result;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvWriteOptions {
    pub delimiter: u8,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self { delimiter: DEFAULT_DELIMITER }
    }
}

impl Table {
    /// Writes the table as CSV to `path`, header first.
    pub fn write_csv(&self, path: impl AsRef<Path>, options: CsvWriteOptions) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write_csv_to(BufWriter::new(file), options)
    }

    /// Writes the table as CSV. Numbers are decimal text, NaN is `nan`, text is verbatim.
    pub fn write_csv_to<W: Write>(&self, writer: W, options: CsvWriteOptions) -> Result<()> {
        let mut out = WriterBuilder::new().delimiter(options.delimiter).from_writer(writer);
        out.write_record(self.names())?;
        let columns = self.store().columns();
        for row in 0..self.len() {
            out.write_record(columns.iter().map(|c| c.cell_text(row)))?;
        }
        out.flush()?;
        Ok(())
    }
}


// src/data_output/csv_writer.rs
