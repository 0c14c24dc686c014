//! Configuration management for the threat detection pipeline

use crate::types::score::SeverityThresholds;
use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_API_URL: &str = "https://finsec1.onrender.com/detect";
pub const DEFAULT_API_KEY: &str = "supersecret";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

/// Remote detection API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Detection endpoint URL (`FINSEC_API_URL`)
    pub url: String,
    /// Bearer credential (`FINSEC_API_KEY`)
    pub key: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Scoring settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Score through the remote API (`true`) or the local heuristic (`false`)
    pub use_api: bool,
    /// Local heuristic severity thresholds
    pub thresholds: SeverityThresholds,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load from the default config file (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::build(Path::new(DEFAULT_CONFIG_PATH), false, None)
    }

    /// Load from a specific file, which must exist, and the environment
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(path.as_ref(), true, None)
    }

    /// Load with an explicit variable set in place of the process environment
    pub fn load_with_vars<P: AsRef<Path>>(
        path: P,
        vars: HashMap<String, String>,
    ) -> Result<Self> {
        Self::build(path.as_ref(), false, Some(vars))
    }

    fn build(
        path: &Path,
        required: bool,
        vars: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let lookup = |name: &str| match &vars {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        };

        let config = Config::builder()
            .set_default("api.url", DEFAULT_API_URL)?
            .set_default("api.key", DEFAULT_API_KEY)?
            .set_default("api.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("scoring.use_api", true)?
            .set_default("scoring.thresholds.medium", 100.0)?
            .set_default("scoring.thresholds.high", 200.0)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::from(path).required(required))
            // FINSEC_API__TIMEOUT_SECS, FINSEC_LOGGING__LEVEL, ...
            .add_source(
                Environment::with_prefix("FINSEC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(vars.clone()),
            )
            .set_override_option("api.url", lookup("FINSEC_API_URL"))?
            .set_override_option("api.key", lookup("FINSEC_API_KEY"))?
            .set_override_option("scoring.use_api", lookup("FINSEC_USE_API"))?
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.api.url.is_empty(), "api.url must not be empty");
        ensure!(self.api.timeout_secs > 0, "api.timeout_secs must be positive");
        let thresholds = &self.scoring.thresholds;
        ensure!(
            thresholds.medium <= thresholds.high,
            "scoring.thresholds.medium ({}) must not exceed scoring.thresholds.high ({})",
            thresholds.medium,
            thresholds.high
        );
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                url: DEFAULT_API_URL.to_string(),
                key: DEFAULT_API_KEY.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            scoring: ScoringConfig {
                use_api: true,
                thresholds: SeverityThresholds::default(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_file() -> &'static Path {
        Path::new("does/not/exist.toml")
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.url, "https://finsec1.onrender.com/detect");
        assert_eq!(config.api.key, "supersecret");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.scoring.use_api);
        assert_eq!(config.scoring.thresholds.medium, 100.0);
        assert_eq!(config.scoring.thresholds.high, 200.0);
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = AppConfig::load_with_vars(no_file(), HashMap::new()).unwrap();
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.api.key, DEFAULT_API_KEY);
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.scoring.use_api);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_env_overrides() {
        let vars = HashMap::from([
            ("FINSEC_API_URL".to_string(), "http://localhost:9000/detect".to_string()),
            ("FINSEC_API_KEY".to_string(), "k3y".to_string()),
            ("FINSEC_USE_API".to_string(), "false".to_string()),
            ("FINSEC_API__TIMEOUT_SECS".to_string(), "3".to_string()),
        ]);
        let config = AppConfig::load_with_vars(no_file(), vars).unwrap();

        assert_eq!(config.api.url, "http://localhost:9000/detect");
        assert_eq!(config.api.key, "k3y");
        assert!(!config.scoring.use_api);
        assert_eq!(config.api.timeout_secs, 3);
    }

    #[test]
    fn test_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nurl = \"http://scoring.internal/detect\"\n\n[scoring]\nuse_api = false\n\n[scoring.thresholds]\nmedium = 50.0\nhigh = 75.0\n"
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.api.url, "http://scoring.internal/detect");
        assert_eq!(config.api.key, DEFAULT_API_KEY);
        assert!(!config.scoring.use_api);
        assert_eq!(config.scoring.thresholds.medium, 50.0);
        assert_eq!(config.scoring.thresholds.high, 75.0);
    }

    #[test]
    fn test_missing_required_file() {
        assert!(AppConfig::load_from_path(no_file()).is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[scoring.thresholds]\nmedium = 300.0\nhigh = 200.0\n").unwrap();

        assert!(AppConfig::load_from_path(file.path()).is_err());
    }
}
