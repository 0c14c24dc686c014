//! Batch orchestration: score every record of a table, in order.

use crate::metrics::BatchMetrics;
use crate::normalizer::normalize_row;
use crate::scoring::{Scorer, ScorerSettings, ScoringStrategy};
use crate::types::batch::BatchResult;
use crate::types::table::TransactionTable;
use anyhow::Result;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle of a batch analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
    Complete,
}

/// Progress after a record has been scored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub completed: usize,
    pub total: usize,
}

impl ProgressUpdate {
    /// Fraction of the batch done, in `(0, 1]`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Receives a progress update after every record
pub trait ProgressObserver {
    fn on_progress(&mut self, update: ProgressUpdate);
}

impl<F> ProgressObserver for F
where
    F: FnMut(ProgressUpdate),
{
    fn on_progress(&mut self, update: ProgressUpdate) {
        self(update)
    }
}

/// Observer that ignores progress
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _update: ProgressUpdate) {}
}

/// Scores a table record by record with one fixed strategy.
///
/// Records are processed strictly in input order, one at a time; a remote
/// call is awaited before the next record starts. A failed record keeps its
/// failure in its own fields and the run goes on.
pub struct BatchAnalyzer {
    strategy: ScoringStrategy,
    scorer: Scorer,
    state: BatchState,
    metrics: BatchMetrics,
}

impl BatchAnalyzer {
    pub fn new(strategy: ScoringStrategy, settings: &ScorerSettings) -> Result<Self> {
        let scorer = Scorer::build(&strategy, settings)?;
        info!(strategy = %strategy, "Batch analyzer initialized");

        Ok(Self {
            strategy,
            scorer,
            state: BatchState::Idle,
            metrics: BatchMetrics::new(),
        })
    }

    pub fn strategy(&self) -> &ScoringStrategy {
        &self.strategy
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Metrics of the latest run
    pub fn metrics(&self) -> &BatchMetrics {
        &self.metrics
    }

    /// Score every row of `table`, reporting progress to `observer`.
    pub async fn run<O>(&mut self, table: &TransactionTable, observer: &mut O) -> BatchResult
    where
        O: ProgressObserver + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = table.len();

        self.state = BatchState::Running;
        self.metrics = BatchMetrics::new();
        info!(run_id = %run_id, records = total, strategy = self.strategy.label(), "Batch started");

        let mut scored = Vec::with_capacity(total);
        for (idx, cells) in table.rows().iter().enumerate() {
            let record = normalize_row(table.headers(), cells);

            let start = Instant::now();
            let result = self.scorer.score(&record).await;
            let elapsed = start.elapsed();

            let outcome = result.kind();
            if result.is_failure() {
                warn!(run_id = %run_id, record = idx, outcome, "Record scored with failure sentinel");
            } else {
                debug!(run_id = %run_id, record = idx, outcome, elapsed_us = elapsed.as_micros() as u64, "Record scored");
            }
            self.metrics.record(elapsed, outcome);

            scored.push(record.merged(result));
            observer.on_progress(ProgressUpdate {
                completed: idx + 1,
                total,
            });
        }

        self.state = BatchState::Complete;
        info!(
            run_id = %run_id,
            records = scored.len(),
            failures = self.metrics.failures(),
            "Batch complete"
        );

        BatchResult::new(run_id, self.strategy.label(), started_at, scored)
    }
}
