//! FinSec Threat Detection - Main Entry Point
//!
//! Loads a transaction CSV, scores every record through the detection API or
//! the local heuristic, and writes the scored records back out as CSV.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use finsec_threat_detection::{
    config::{AppConfig, LoggingConfig},
    io,
    normalizer::normalize_row,
    BatchAnalyzer, LocalScorer, ProgressObserver, ProgressUpdate, Record, ScorerSettings,
    ScoringStrategy,
};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    init_logging(&config.logging)?;
    debug!(api_url = %config.api.url, timeout_secs = config.api.timeout_secs, "Configuration loaded");

    let use_api_override = cli.command.use_api_override();
    match cli.command {
        Commands::Analyze {
            input,
            output,
            preview,
            ..
        } => analyze(config, use_api_override, &input, &output, preview).await,
        Commands::ScoreJson { record } => score_json(&config, &record),
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("finsec_threat_detection={}", logging.level).parse()?)
        .add_directive(format!("finsec={}", logging.level).parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }
    Ok(())
}

async fn analyze(
    mut config: AppConfig,
    use_api_override: Option<bool>,
    input: &Path,
    output: &Path,
    preview: usize,
) -> Result<()> {
    info!("Starting FinSec threat detection");

    let table = io::read_transactions_from_path(input)?;
    for (idx, cells) in table.head(preview).iter().enumerate() {
        let record = normalize_row(table.headers(), cells);
        info!(row = idx, "{}", serde_json::to_string(&record)?);
    }

    if let Some(use_api) = use_api_override {
        config.scoring.use_api = use_api;
    }
    let strategy = ScoringStrategy::from_config(&config);
    let settings = ScorerSettings::from_config(&config);

    let mut analyzer = BatchAnalyzer::new(strategy, &settings)?;
    let mut progress = ProgressLogger::new();
    let result = analyzer.run(&table, &mut progress).await;

    analyzer.metrics().print_summary(&result.severity_counts());
    io::write_results_to_path(output, &result)?;

    info!(
        run_id = %result.run_id,
        records = result.len(),
        output = %output.display(),
        "✅ Analysis complete."
    );
    Ok(())
}

fn score_json(config: &AppConfig, raw: &str) -> Result<()> {
    let value: Value = serde_json::from_str(raw).context("Record is not valid JSON")?;
    let Value::Object(fields) = value else {
        bail!("Record must be a JSON object");
    };

    let record = Record::from_fields(fields);
    let scorer = LocalScorer::new(config.scoring.thresholds);
    let scored = record.merged(scorer.score(&record));

    println!("{}", serde_json::to_string_pretty(&scored)?);
    Ok(())
}

/// Logs progress at every tenth of the batch and at completion.
struct ProgressLogger {
    last_decile: usize,
}

impl ProgressLogger {
    fn new() -> Self {
        Self { last_decile: 0 }
    }
}

impl ProgressObserver for ProgressLogger {
    fn on_progress(&mut self, update: ProgressUpdate) {
        let decile = (update.fraction() * 10.0).floor() as usize;
        if decile > self.last_decile || update.completed == update.total {
            self.last_decile = decile;
            info!(
                completed = update.completed,
                total = update.total,
                progress = format!("{:.0}%", update.fraction() * 100.0),
                "Scoring progress"
            );
        } else {
            debug!(completed = update.completed, total = update.total, "Scoring progress");
        }
    }
}
