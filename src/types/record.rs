//! Transaction record structures

use crate::types::score::ScoreResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One transaction row: column name to scalar value, in column order.
///
/// Scalars are JSON numbers, strings, or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.fields.insert(column.into(), value);
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Values of the numeric-typed fields, in column order.
    pub fn numeric_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.fields.values().filter_map(Value::as_f64)
    }

    /// Copy of this record with the score fields merged on top.
    ///
    /// Existing columns with the same name are overwritten in place; new
    /// columns are appended.
    pub fn merged(&self, result: ScoreResult) -> Record {
        let mut fields = self.fields.clone();
        for (key, value) in result.into_fields() {
            fields.insert(key, value);
        }
        Record { fields }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_fields(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numeric_values_skip_strings_and_nulls() {
        let rec = record(json!({"id": "tx_1", "amount": -12.5, "count": 3, "note": null}));
        let values: Vec<f64> = rec.numeric_values().collect();
        assert_eq!(values, vec![-12.5, 3.0]);
    }

    #[test]
    fn test_merge_appends_result_columns() {
        let rec = record(json!({"id": "tx_1", "amount": 10}));
        let merged = rec.merged(ScoreResult::ApiError { status_code: 503 });

        let columns: Vec<&str> = merged.columns().collect();
        assert_eq!(
            columns,
            vec!["id", "amount", "status", "risk_score", "severity", "recommendation"]
        );
        // source record untouched
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn test_merge_overwrites_existing_column_in_place() {
        let rec = record(json!({"status": "pending", "amount": 10}));
        let merged = rec.merged(ScoreResult::ApiError { status_code: 500 });

        assert_eq!(merged.columns().next(), Some("status"));
        assert_eq!(merged.get("status"), Some(&json!("API Error")));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let rec = record(json!({"b": 1, "a": 2}));
        assert_eq!(serde_json::to_string(&rec).unwrap(), r#"{"b":1,"a":2}"#);
    }
}
