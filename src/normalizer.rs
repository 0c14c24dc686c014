//! Row normalization.
//!
//! Turns one row of a parsed [`TransactionTable`] into a [`Record`] that can
//! be sent to the detection API or scored locally.

use crate::types::record::Record;
use crate::types::table::TransactionTable;
use serde_json::{Map, Value};

/// Build a record from a header row and the matching cells.
///
/// Every header becomes exactly one key. Headers are expected to be unique
/// (ingestion disambiguates duplicates) and as long as `cells`.
pub fn normalize_row(headers: &[String], cells: &[Value]) -> Record {
    let mut fields = Map::with_capacity(headers.len());
    for (column, value) in headers.iter().zip(cells) {
        fields.insert(column.clone(), value.clone());
    }
    Record::from_fields(fields)
}

/// Normalize row `idx` of `table`, if it exists.
pub fn normalize(table: &TransactionTable, idx: usize) -> Option<Record> {
    table
        .rows()
        .get(idx)
        .map(|cells| normalize_row(table.headers(), cells))
}
