//! Local heuristic scorer used when the detection API is not in play

use crate::types::record::Record;
use crate::types::score::{
    Assessment, ScoreResult, Severity, SeverityThresholds, NORMAL_STATUS, SUSPICIOUS_STATUS,
};

/// Scores a record from the magnitude of its numeric fields.
///
/// Pure and deterministic: the same record always yields the same result.
#[derive(Debug, Clone, Default)]
pub struct LocalScorer {
    thresholds: SeverityThresholds,
}

impl LocalScorer {
    pub fn new(thresholds: SeverityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &SeverityThresholds {
        &self.thresholds
    }

    /// Sum of absolute values of every numeric field.
    pub fn raw_score(record: &Record) -> f64 {
        record.numeric_values().map(f64::abs).sum()
    }

    pub fn assess(&self, record: &Record) -> Assessment {
        let score = Self::raw_score(record);
        let severity = Severity::from_score(score, &self.thresholds);

        let status = if severity == Severity::Low {
            NORMAL_STATUS
        } else {
            SUSPICIOUS_STATUS
        };
        let recommendation = if severity == Severity::High {
            "Review"
        } else {
            "Monitor"
        };

        Assessment {
            status: status.to_string(),
            risk_score: Some(round2(score)),
            severity,
            recommendation: recommendation.to_string(),
        }
    }

    pub fn score(&self, record: &Record) -> ScoreResult {
        ScoreResult::Heuristic(self.assess(record))
    }
}

/// Two-decimal rounding, ties to even. Sums too large to scale are
/// returned as-is.
fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / 100.0
}
