//! Per-run statistics for a scoring batch.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for one batch run.
///
/// Owned and written by the orchestrator only; runs are sequential so no
/// synchronization is involved.
#[derive(Debug)]
pub struct BatchMetrics {
    /// Records scored so far
    records_processed: u64,
    /// Outcomes by kind (heuristic, reported, api_error, connection_failed)
    outcomes: BTreeMap<&'static str, u64>,
    /// Per-record scoring times (in microseconds)
    scoring_times: Vec<u64>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self {
            records_processed: 0,
            outcomes: BTreeMap::new(),
            scoring_times: Vec::new(),
            start_time: Instant::now(),
        }
    }

    /// Record one scored record
    pub fn record(&mut self, scoring_time: Duration, outcome: &'static str) {
        self.records_processed += 1;
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        self.scoring_times.push(scoring_time.as_micros() as u64);
    }

    pub fn records_processed(&self) -> u64 {
        self.records_processed
    }

    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.outcomes.get(outcome).copied().unwrap_or(0)
    }

    /// Records whose scoring fell back to a failure sentinel
    pub fn failures(&self) -> u64 {
        self.outcome_count("api_error") + self.outcome_count("connection_failed")
    }

    /// Get scoring time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        if self.scoring_times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted = self.scoring_times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Records per second since the run started
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.records_processed as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self, severity_counts: &BTreeMap<String, usize>) {
        let processing = self.get_processing_stats();
        let failures = self.failures();
        let failure_rate = if self.records_processed > 0 {
            (failures as f64 / self.records_processed as f64) * 100.0
        } else {
            0.0
        };

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║              FINSEC THREAT DETECTION - RUN SUMMARY           ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Records Scored: {:>8}  │  Throughput: {:>8.1} rec/s         ║",
            self.records_processed,
            self.get_throughput()
        );
        info!(
            "║ Scoring Failures: {:>6}  │  Failure Rate: {:>6.1}%            ║",
            failures, failure_rate
        );
        info!(
            "║ Scoring Time (μs): mean={:>6} p50={:>6} p95={:>6} max={:>6} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.max_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Records by Severity:                                         ║");
        let total: usize = severity_counts.values().sum();
        for (severity, count) in severity_counts {
            let pct = if total > 0 {
                (*count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar = "█".repeat(((pct / 5.0) as usize).min(20));
            info!("║   {:10}: {:>6} ({:>5.1}%) {}", severity, count, pct, bar);
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoring time statistics
#[derive(Debug, Default, PartialEq)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}
