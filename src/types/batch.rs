//! Result of one scoring batch

use crate::types::record::Record;
use crate::types::score::SEVERITY_FIELD;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Label used in severity tallies for records without a severity value
pub const MISSING_SEVERITY: &str = "(missing)";

/// Scored records of one run, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Unique run identifier
    pub run_id: Uuid,
    /// Strategy label ("remote" or "local")
    pub strategy: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    records: Vec<Record>,
}

impl BatchResult {
    pub(crate) fn new(
        run_id: Uuid,
        strategy: &str,
        started_at: DateTime<Utc>,
        records: Vec<Record>,
    ) -> Self {
        Self {
            run_id,
            strategy: strategy.to_string(),
            started_at,
            finished_at: Utc::now(),
            records,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per severity label.
    ///
    /// Remote responses are merged verbatim, so labels outside the usual
    /// four can show up; records lacking one are counted as
    /// [`MISSING_SEVERITY`].
    pub fn severity_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            let label = match record.get(SEVERITY_FIELD) {
                Some(Value::String(s)) => s.clone(),
                None | Some(Value::Null) => MISSING_SEVERITY.to_string(),
                Some(other) => other.to_string(),
            };
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_counts() {
        let records: Vec<Record> = vec![
            json!({"severity": "Low"}),
            json!({"severity": "High"}),
            json!({"severity": "Low"}),
            json!({"amount": 1}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();

        let batch = BatchResult::new(Uuid::new_v4(), "local", Utc::now(), records);
        let counts = batch.severity_counts();

        assert_eq!(counts["Low"], 2);
        assert_eq!(counts["High"], 1);
        assert_eq!(counts[MISSING_SEVERITY], 1);
        assert_eq!(batch.len(), 4);
    }
}
