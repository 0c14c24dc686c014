//! Risk assessment data structures merged onto scored records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Result column holding the human-readable state
pub const STATUS_FIELD: &str = "status";
/// Result column holding the numeric risk score
pub const RISK_SCORE_FIELD: &str = "risk_score";
/// Result column holding the severity label
pub const SEVERITY_FIELD: &str = "severity";
/// Result column holding the suggested action
pub const RECOMMENDATION_FIELD: &str = "recommendation";

/// The four columns every scored record carries, in export order.
pub const RESULT_FIELDS: [&str; 4] = [
    STATUS_FIELD,
    RISK_SCORE_FIELD,
    SEVERITY_FIELD,
    RECOMMENDATION_FIELD,
];

pub const NORMAL_STATUS: &str = "🟢 Normal";
pub const SUSPICIOUS_STATUS: &str = "🔴 Suspicious";
pub const API_ERROR_STATUS: &str = "API Error";
pub const CONNECTION_FAILED_STATUS: &str = "Connection Failed";

/// Severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Unknown,
}

impl Severity {
    /// Classify a heuristic score against the configured thresholds.
    ///
    /// Lower bounds are inclusive: a score equal to `thresholds.medium` is
    /// `Medium`, a score equal to `thresholds.high` is `High`.
    pub fn from_score(score: f64, thresholds: &SeverityThresholds) -> Self {
        if score >= thresholds.high {
            Severity::High
        } else if score >= thresholds.medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configurable severity thresholds for the local heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    /// Scores at or above this are at least `Medium`
    pub medium: f64,
    /// Scores at or above this are `High`
    pub high: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            medium: 100.0,
            high: 200.0,
        }
    }
}

/// Typed four-field assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub status: String,
    pub risk_score: Option<f64>,
    pub severity: Severity,
    pub recommendation: String,
}

impl Assessment {
    /// Sentinel for a non-success response from the remote service.
    pub fn api_error() -> Self {
        Self {
            status: API_ERROR_STATUS.to_string(),
            risk_score: None,
            severity: Severity::Unknown,
            recommendation: "Check API".to_string(),
        }
    }

    /// Sentinel for a transport failure; `reason` describes what went wrong.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        Self {
            status: CONNECTION_FAILED_STATUS.to_string(),
            risk_score: None,
            severity: Severity::Unknown,
            recommendation: reason.into(),
        }
    }

    /// Render as result columns in export order.
    pub fn into_fields(self) -> Map<String, Value> {
        let risk_score = self
            .risk_score
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);

        let mut fields = Map::with_capacity(RESULT_FIELDS.len());
        fields.insert(STATUS_FIELD.to_string(), Value::String(self.status));
        fields.insert(RISK_SCORE_FIELD.to_string(), risk_score);
        fields.insert(
            SEVERITY_FIELD.to_string(),
            Value::String(self.severity.to_string()),
        );
        fields.insert(
            RECOMMENDATION_FIELD.to_string(),
            Value::String(self.recommendation),
        );
        fields
    }
}

/// Outcome of scoring one record, before it is merged onto the record.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreResult {
    /// Computed by the local heuristic
    Heuristic(Assessment),
    /// Body of a successful remote response, merged verbatim
    Reported(Map<String, Value>),
    /// Remote service answered with a non-success status code
    ApiError { status_code: u16 },
    /// Request never produced a usable response
    ConnectionFailed { reason: String },
}

impl ScoreResult {
    /// Fields to merge onto the scored record.
    ///
    /// `Reported` is passed through untouched: keys the service omitted are
    /// not backfilled.
    pub fn into_fields(self) -> Map<String, Value> {
        match self {
            ScoreResult::Heuristic(assessment) => assessment.into_fields(),
            ScoreResult::Reported(fields) => fields,
            ScoreResult::ApiError { .. } => Assessment::api_error().into_fields(),
            ScoreResult::ConnectionFailed { reason } => {
                Assessment::connection_failed(reason).into_fields()
            }
        }
    }

    /// Short label used for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreResult::Heuristic(_) => "heuristic",
            ScoreResult::Reported(_) => "reported",
            ScoreResult::ApiError { .. } => "api_error",
            ScoreResult::ConnectionFailed { .. } => "connection_failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ScoreResult::ApiError { .. } | ScoreResult::ConnectionFailed { .. }
        )
    }
}
