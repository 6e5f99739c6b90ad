use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Record;

/// Write the grid columns of `records` as CSV. Missing values become `NA`.
pub fn write_csv<'a, W: Write>(writer: W, records: impl IntoIterator<Item = &'a Record>) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    let mut rows = 0;
    for record in records {
        writer
            .serialize(CsvTableRow::from(record))
            .with_context(|| format!("writing row {rows}"))?;
        rows += 1;
    }
    if rows == 0 {
        // serde only emits the header alongside the first row
        writer.write_record(CsvTableRow::HEADER).context("writing header")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(rows)
}

/// Export to a file, returning the number of rows written.
pub fn export_csv<'a>(path: &Path, records: impl IntoIterator<Item = &'a Record>) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, records)
}

/// A record restricted to the grid columns.
#[derive(serde::Serialize)]
struct CsvTableRow<'a> {
    species: &'a str,
    island: &'a str,
    bill_length_mm: String,
    bill_depth_mm: String,
    body_mass_g: String,
}

impl CsvTableRow<'_> {
    const HEADER: [&'static str; 5] =
        ["species", "island", "bill_length_mm", "bill_depth_mm", "body_mass_g"];
}

impl<'a> From<&'a Record> for CsvTableRow<'a> {
    fn from(row: &'a Record) -> Self {
        let cell = |v: Option<f64>| v.map_or_else(|| "NA".to_string(), |v| v.to_string());
        CsvTableRow {
            species: row.species.label(),
            island: &row.island,
            bill_length_mm: cell(row.bill_length_mm),
            bill_depth_mm: cell(row.bill_depth_mm),
            body_mass_g: cell(row.body_mass_g),
        }
    }
}
