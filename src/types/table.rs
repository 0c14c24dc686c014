//! Parsed transaction table

use anyhow::{ensure, Result};
use serde_json::Value;

/// A parsed transaction file: header row plus typed cells.
///
/// Every row has exactly one cell per header; construction enforces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TransactionTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            ensure!(
                row.len() == headers.len(),
                "Row {} has {} cells, expected {}",
                idx,
                row.len(),
                headers.len()
            );
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, for display.
    pub fn head(&self, n: usize) -> &[Vec<Value>] {
        &self.rows[..n.min(self.rows.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_ragged_rows() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let result = TransactionTable::new(headers, vec![vec![json!(1)]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_head_is_bounded() {
        let headers = vec!["a".to_string()];
        let rows = vec![vec![json!(1)], vec![json!(2)]];
        let table = TransactionTable::new(headers, rows).unwrap();

        assert_eq!(table.head(5).len(), 2);
        assert_eq!(table.head(1), &[vec![json!(1)]]);
    }
}
