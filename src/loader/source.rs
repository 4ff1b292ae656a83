use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::io::Read;
use std::path::Path;

use super::table::Table;

/// Read a CSV file with a header row. No type inference: every value stays a string.
pub fn read_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    read_csv_from(file).with_context(|| format!("Failed to read CSV file: {}", path.display()))
}

/// Lenient read: rows shorter than the header are padded with empty values,
/// longer rows are cut to the header width, and bytes that are not UTF-8 are
/// replaced with U+FFFD. A blank header field is named `_c<index>`.
pub fn read_csv_from<R: Read>(reader: R) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .byte_headers()
        .context("Failed to read CSV header")?
        .iter()
        .enumerate()
        .map(|(i, h)| match String::from_utf8_lossy(h) {
            name if name.is_empty() => format!("_c{}", i),
            name => name.into_owned(),
        })
        .collect();

    if columns.is_empty() {
        anyhow::bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    let mut line_num = 1;
    loop {
        line_num += 1;
        let more = reader
            .read_byte_record(&mut record)
            .with_context(|| format!("Line {}", line_num))?;
        if !more {
            break;
        }
        rows.push(fit_to_width(&record, columns.len()));
    }

    log::debug!("Read CSV with {} columns and {} rows", columns.len(), rows.len());
    Ok(Table::new(columns, rows))
}

fn fit_to_width(record: &ByteRecord, width: usize) -> Vec<String> {
    if record.len() != width {
        log::warn!("Row has {} fields, expected {}", record.len(), width);
    }

    let mut row: Vec<String> = record
        .iter()
        .take(width)
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect();
    row.resize(width, String::new());
    row
}
