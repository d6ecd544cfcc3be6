//! Header-less numeric tables.
//!
//! Input tables accept commas, spaces, and tabs as separators, one record per
//! line; there is no header row. Result tables are written with a fixed
//! number of decimal places and a configurable delimiter.

use crate::error::{Error, Result};
use crate::postprocess::DofRow;
use std::fs;
use std::path::Path;

/// Parse a whitespace-or-comma separated table. `name` labels diagnostics.
///
/// Blank lines are skipped; every other line must tokenize into numbers.
/// Reported line numbers are 1-based.
pub fn parse_table(name: &str, text: &str) -> Result<Vec<Vec<f64>>> {
    let mut data = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut record = Vec::new();
        for token in line.split([',', ' ', '\t']).filter(|t| !t.is_empty()) {
            let value: f64 = token.parse().map_err(|_| {
                Error::InputShape(format!(
                    "{name}: line {}: non-numeric token {token:?}",
                    line_idx + 1
                ))
            })?;
            record.push(value);
        }
        data.push(record);
    }
    Ok(data)
}

/// Read and parse the table stored at `path`.
pub fn read_table(path: &Path) -> Result<Vec<Vec<f64>>> {
    let name = path.display().to_string();
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Configuration(format!("cannot open input file {name}: {e}")))?;
    parse_table(&name, &text)
}

/// Write a result matrix to `path`, fixed-point at `precision` decimal
/// places, columns separated by `delimiter`.
pub fn write_table(path: &Path, rows: &[DofRow], precision: usize, delimiter: &str) -> Result<()> {
    let mut out = String::new();
    for row in rows {
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                out.push_str(delimiter);
            }
            out.push_str(&format!("{value:.precision$}"));
        }
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}
