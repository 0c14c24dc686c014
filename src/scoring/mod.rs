//! Scoring strategies: remote detection API or local heuristic

pub mod local;
pub mod remote;

pub use local::LocalScorer;
pub use remote::RemoteScorer;

use crate::config::AppConfig;
use crate::types::record::Record;
use crate::types::score::{ScoreResult, SeverityThresholds};
use anyhow::Result;
use std::fmt;
use std::time::Duration;

/// How every record of a batch is scored. Chosen once per run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringStrategy {
    /// POST each record to the detection API
    Remote { endpoint: String, credential: String },
    /// Score each record with the local heuristic
    Local,
}

impl ScoringStrategy {
    /// Strategy selected by the `scoring.use_api` setting
    pub fn from_config(config: &AppConfig) -> Self {
        if config.scoring.use_api {
            ScoringStrategy::Remote {
                endpoint: config.api.url.clone(),
                credential: config.api.key.clone(),
            }
        } else {
            ScoringStrategy::Local
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoringStrategy::Remote { .. } => "remote",
            ScoringStrategy::Local => "local",
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringStrategy::Remote { endpoint, .. } => write!(f, "remote ({})", endpoint),
            ScoringStrategy::Local => f.write_str("local heuristic"),
        }
    }
}

/// Settings shared by the scorers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerSettings {
    /// Bound on each remote call
    pub timeout: Duration,
    /// Severity cut-offs for the local heuristic
    pub thresholds: SeverityThresholds,
}

impl ScorerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.api.timeout_secs),
            thresholds: config.scoring.thresholds,
        }
    }
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            thresholds: SeverityThresholds::default(),
        }
    }
}

/// A ready-to-use scorer for one strategy
pub enum Scorer {
    Remote(RemoteScorer),
    Local(LocalScorer),
}

impl Scorer {
    /// Build the scorer for `strategy`
    pub fn build(strategy: &ScoringStrategy, settings: &ScorerSettings) -> Result<Self> {
        match strategy {
            ScoringStrategy::Remote {
                endpoint,
                credential,
            } => Ok(Scorer::Remote(RemoteScorer::new(
                endpoint.as_str(),
                credential.as_str(),
                settings.timeout,
            )?)),
            ScoringStrategy::Local => Ok(Scorer::Local(LocalScorer::new(settings.thresholds))),
        }
    }

    pub async fn score(&self, record: &Record) -> ScoreResult {
        match self {
            Scorer::Remote(scorer) => scorer.score(record).await,
            Scorer::Local(scorer) => scorer.score(record),
        }
    }
}
