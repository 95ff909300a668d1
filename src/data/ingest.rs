//! CSV ingest for [`DataFrame`].
//!
//! Column kinds are inferred: a column whose every non-missing cell parses as
//! a number is numeric, anything else is categorical with sorted levels.

use std::io::Read;
use std::path::Path;

use super::frame::{Column, DataFrame, Factor};
use crate::error::Result;

/// Cells treated as missing values.
const MISSING: [&str; 3] = ["", "NA", "NaN"];

impl DataFrame {
    /// Parse a CSV stream with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr =
            csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record?;
            for (col, value) in cells.iter_mut().zip(record.iter()) {
                col.push(value.to_string());
            }
        }

        let mut frame = DataFrame::new();
        for (name, values) in headers.iter().zip(cells) {
            frame = frame.with_column(name, infer_column(&values))?;
        }
        log::debug!("parsed CSV: {} rows x {} columns", frame.nrow(), frame.ncol());
        Ok(frame)
    }

    /// Parse CSV text.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_csv_reader(text.as_bytes())
    }

    /// Read a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }
}

fn infer_column(values: &[String]) -> Column {
    let parsed: Option<Vec<f32>> = values
        .iter()
        .map(|v| if MISSING.contains(&v.as_str()) { Some(f32::NAN) } else { v.parse::<f32>().ok() })
        .collect();

    match parsed {
        Some(numbers) if values.iter().any(|v| !MISSING.contains(&v.as_str())) => {
            Column::Numeric(numbers)
        }
        _ => Column::Categorical(Factor::new(values)),
    }
}
