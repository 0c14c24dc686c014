use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "finsec_results.csv";

#[derive(Parser, Debug)]
#[command(
    name = "finsec",
    version,
    about = "FinSec: fraud & threat detection for transaction files"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Configuration file (defaults to config/config.toml when present)"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every transaction of a CSV file and write the results
    Analyze {
        input: PathBuf,
        #[arg(long, short, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        #[arg(long, conflicts_with = "remote", help = "Score with the local heuristic")]
        local: bool,
        #[arg(long, help = "Score through the remote detection API")]
        remote: bool,
        #[arg(long, default_value_t = 5, help = "Rows to log before scoring")]
        preview: usize,
    },
    /// Score a single JSON record with the local heuristic
    ScoreJson { record: String },
}

impl Commands {
    /// Strategy override from `--local` / `--remote`, if any
    pub fn use_api_override(&self) -> Option<bool> {
        match self {
            Commands::Analyze { local: true, .. } => Some(false),
            Commands::Analyze { remote: true, .. } => Some(true),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_flag_overrides_strategy() {
        let cli = Cli::parse_from(["finsec", "analyze", "tx.csv", "--local"]);
        assert_eq!(cli.command.use_api_override(), Some(false));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["finsec", "analyze", "tx.csv"]);
        assert_eq!(cli.command.use_api_override(), None);
        match cli.command {
            Commands::Analyze {
                output, preview, ..
            } => {
                assert_eq!(output, PathBuf::from(DEFAULT_OUTPUT));
                assert_eq!(preview, 5);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_local_and_remote_conflict() {
        assert!(Cli::try_parse_from(["finsec", "analyze", "tx.csv", "--local", "--remote"]).is_err());
    }
}
