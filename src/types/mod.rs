//! Type definitions for the threat detection pipeline

pub mod batch;
pub mod record;
pub mod score;
pub mod table;

pub use batch::BatchResult;
pub use record::Record;
pub use score::{Assessment, ScoreResult, Severity, SeverityThresholds};
pub use table::TransactionTable;
