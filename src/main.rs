// src/main.rs

use std::env;
use std::error::Error;
use std::path::Path;

use timeline_table::{CsvWriteOptions, ResampleOptions, Table};

fn print_usage(program: &str) {
    eprintln!("timeline-table {}", timeline_table::crate_version());
    eprintln!("Usage: {} <first> <other>... <dest.csv>", program);
    eprintln!("  Reads every source (.csv, .xls/.xlsx/.ods, .xy sample files, else whitespace text),");
    eprintln!("  resamples the columns of the later sources onto the time axis of the first");
    eprintln!("  and writes the joined table as CSV.");
}

fn run(sources: &[String], dest: &str) -> Result<(), Box<dyn Error>> {
    let first = Path::new(&sources[0]);
    println!("Reading {}", first.display());
    let mut joined = Table::builder().file(first).build()?;
    println!(
        "  {} rows, time column '{}', {} value columns",
        joined.len(),
        joined.time_name(),
        joined.value_names().len()
    );

    for source in &sources[1..] {
        let path = Path::new(source);
        let prefix = path.file_stem().unwrap_or_default().to_string_lossy();
        println!("Reading {}", path.display());
        let other = Table::builder().file(path).build()?;
        for name in other.value_names() {
            let values = joined.resample(&other, &name, None, ResampleOptions::default())?;
            let used = joined.append(&format!("{} {}", prefix, name), values, true)?;
            println!("  added '{}'", used);
        }
    }

    joined.write_csv(dest, CsvWriteOptions::default())?;
    println!("Wrote {} rows and {} columns to {}", joined.len(), joined.width(), dest);
    Ok(())
}

fn main() {
    env_logger::init();

    // --- Argument Parsing ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        print_usage(args.first().map(String::as_str).unwrap_or("timeline-table"));
        std::process::exit(1);
    }
    let (sources, dest) = args[1..].split_at(args.len() - 2);

    if let Err(e) = run(sources, &dest[0]) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// src/main.rs
