//! Sample Transaction Generator
//!
//! Writes a transaction CSV for trying out `finsec analyze`.
//!
//! Usage: sample_transactions [OUTPUT] [COUNT] [SUSPICIOUS_RATE] [SEED]

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

/// One transaction row
#[derive(Debug, Clone, Serialize)]
struct Transaction {
    transaction_id: String,
    timestamp: String,
    merchant_category: String,
    country: String,
    amount: f64,
    fee: f64,
    tx_count_last_hour: u32,
    failed_tx_last_hour: u32,
}

/// Transaction generator for testing
struct TransactionGenerator {
    rng: StdRng,
    transaction_counter: u64,
}

impl TransactionGenerator {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            transaction_counter: 0,
        }
    }

    /// Small everyday purchase; the local heuristic rates these `Low`
    fn generate_ordinary(&mut self) -> Transaction {
        let amount = self.rng.gen_range(5.0..80.0);
        self.build(amount, 0..2, 0..1)
    }

    /// Large or bursty transaction; lands in `Medium` or `High`
    fn generate_suspicious(&mut self) -> Transaction {
        let amount = self.rng.gen_range(120.0..5000.0);
        self.build(amount, 5..15, 1..5)
    }

    fn build(
        &mut self,
        amount: f64,
        recent: std::ops::Range<u32>,
        failed: std::ops::Range<u32>,
    ) -> Transaction {
        self.transaction_counter += 1;
        let minutes_ago = self.rng.gen_range(0..1440);

        Transaction {
            transaction_id: format!("tx_{:08}", self.transaction_counter),
            timestamp: (Utc::now() - Duration::minutes(minutes_ago)).to_rfc3339(),
            merchant_category: self
                .random_choice(&["5411", "5812", "5541", "5912", "5999"])
                .to_string(),
            country: self.random_choice(&["US", "UK", "CA", "DE", "FR"]).to_string(),
            amount: (amount * 100.0).round() / 100.0,
            fee: (amount * 0.01 * 100.0).round() / 100.0,
            tx_count_last_hour: self.rng.gen_range(recent),
            failed_tx_last_hour: self.rng.gen_range(failed),
        }
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_transactions=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let output = args.get(1).map(|s| s.as_str()).unwrap_or("transactions.csv");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let suspicious_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let seed: Option<u64> = args.get(4).and_then(|s| s.parse().ok());

    info!(output, count, suspicious_rate, ?seed, "Generating sample transactions");

    let mut generator = TransactionGenerator::new(seed);
    let mut writer =
        csv::Writer::from_path(output).with_context(|| format!("Failed to create {}", output))?;

    let mut ordinary_count = 0;
    let mut suspicious_count = 0;
    for _ in 0..count {
        let transaction = if generator.rng.gen_bool(suspicious_rate.clamp(0.0, 1.0)) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            ordinary_count += 1;
            generator.generate_ordinary()
        };
        writer.serialize(&transaction)?;
    }
    writer.flush()?;

    info!(
        "Completed! Wrote {} transactions ({} ordinary, {} suspicious) to {}",
        count, ordinary_count, suspicious_count, output
    );
    Ok(())
}
