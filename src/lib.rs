//! FinSec Threat Detection Library
//!
//! Scores batches of financial transactions for fraud risk, either through
//! a remote detection API or with a local heuristic, and exports the scored
//! records as CSV.

pub mod config;
pub mod io;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod scoring;
pub mod types;

pub use config::AppConfig;
pub use pipeline::{BatchAnalyzer, BatchState, NoProgress, ProgressObserver, ProgressUpdate};
pub use scoring::{LocalScorer, RemoteScorer, ScorerSettings, ScoringStrategy};
pub use types::{batch::BatchResult, Record, ScoreResult, Severity, TransactionTable};
