use crate::error::Result;
use crate::types::NormalizedRecord;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Column names in first-seen order across all records.
pub fn columns(records: &[NormalizedRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

pub fn write_csv<W: Write>(w: &mut W, records: &[NormalizedRecord]) -> io::Result<()> {
    let columns = columns(records);
    write_row(w, &columns)?;
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(|v| v.to_cell()).unwrap_or_default())
            .collect();
        write_row(w, &row)?;
    }
    Ok(())
}

/// Pretty-printed JSON array with four-space indentation.
pub fn write_json<W: Write>(w: W, records: &[NormalizedRecord]) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(w, formatter);
    records.serialize(&mut serializer)?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Write the final records as CSV and JSON.
pub fn write_output(records: &[NormalizedRecord], csv_path: &Path, json_path: &Path) -> Result<()> {
    info!("Saving CSV to {}", csv_path.display());
    let mut csv = create(csv_path)?;
    write_csv(&mut csv, records)?;
    csv.flush()?;

    info!("Saving JSON to {}", json_path.display());
    let mut json = create(json_path)?;
    write_json(&mut json, records)?;
    json.flush()?;
    Ok(())
}
