//! CSV ingestion and export.
//!
//! Ingestion infers column types the way a dataframe reader would: a column
//! whose non-empty cells all parse as numbers becomes numeric, anything else
//! stays text. Empty cells become null.

use crate::types::batch::BatchResult;
use crate::types::record::Record;
use crate::types::score::RESULT_FIELDS;
use crate::types::table::TransactionTable;
use anyhow::{Context, Result};
use serde_json::{Number, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Parse a transaction CSV. The first row is the header.
pub fn read_transactions<R: Read>(reader: R) -> Result<TransactionTable> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = unique_headers(
        rdr.headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(str::to_string)
            .collect(),
    );

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        // +2 for the header and 1-based line numbers
        let row = row.with_context(|| format!("Failed to parse CSV row at line {}", idx + 2))?;
        raw_rows.push(row.iter().map(str::to_string).collect());
    }

    let numeric: Vec<bool> = (0..headers.len())
        .map(|col| {
            raw_rows
                .iter()
                .map(|row| row[col].trim())
                .filter(|cell| !cell.is_empty())
                .all(|cell| parse_number(cell).is_some())
        })
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&numeric)
                .map(|(cell, &is_numeric)| typed_cell(cell, is_numeric))
                .collect()
        })
        .collect();

    TransactionTable::new(headers, rows)
}

/// Parse a transaction CSV file
pub fn read_transactions_from_path<P: AsRef<Path>>(path: P) -> Result<TransactionTable> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let table = read_transactions(file).with_context(|| format!("Failed to parse {:?}", path))?;
    info!(path = %path.display(), records = table.len(), columns = table.headers().len(), "Transactions loaded");
    Ok(table)
}

/// Export columns: union of all record keys in order of first appearance,
/// plus any result column no record carries.
pub fn result_columns(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for record in records {
        for column in record.columns() {
            if seen.insert(column.to_string()) {
                columns.push(column.to_string());
            }
        }
    }
    for field in RESULT_FIELDS {
        if seen.insert(field.to_string()) {
            columns.push(field.to_string());
        }
    }
    columns
}

/// Write a batch result as CSV, one row per record
pub fn write_results<W: Write>(writer: W, result: &BatchResult) -> Result<()> {
    let columns = result_columns(result.records());
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(&columns)
        .context("Failed to write CSV header")?;
    for record in result.records() {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(cell_text).unwrap_or_default())
            .collect();
        wtr.write_record(&row).context("Failed to write CSV row")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write a batch result to a CSV file
pub fn write_results_to_path<P: AsRef<Path>>(path: P, result: &BatchResult) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_results(file, result)?;
    info!(path = %path.display(), records = result.len(), "Results written");
    Ok(())
}

/// Make header names unique: repeats get `.1`, `.2`, ... and blank names
/// become `Unnamed: <index>`.
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name
            };
            let mut candidate = base.clone();
            let mut n = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}.{}", base, n);
                n += 1;
            }
            candidate
        })
        .collect()
}

fn parse_number(cell: &str) -> Option<Number> {
    if let Ok(i) = cell.parse::<i64>() {
        return Some(Number::from(i));
    }
    cell.parse::<f64>().ok().and_then(Number::from_f64)
}

fn typed_cell(cell: String, numeric: bool) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if numeric {
        if let Some(n) = parse_number(trimmed) {
            return Value::Number(n);
        }
    }
    Value::String(cell)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
