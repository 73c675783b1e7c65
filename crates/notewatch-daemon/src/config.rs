//! Resolved daemon configuration

use crate::cli::Cli;
use crate::error::DaemonError;
use notewatch_extractor::ExtractorConfig;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Everything the daemon needs, loaded once at startup
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Directory to watch
    pub watch_dir: PathBuf,

    /// SQLite database file
    pub database: PathBuf,

    /// Ollama endpoint
    pub ai_endpoint: String,

    /// Model identifier
    pub model: String,

    /// Directory rescan interval
    pub poll_interval: Duration,

    /// Extraction settings
    pub extractor: ExtractorConfig,
}

impl DaemonConfig {
    /// Resolve arguments, reading the extractor TOML file if one is given
    pub fn from_cli(cli: Cli) -> Result<Self, DaemonError> {
        let mut extractor = match &cli.config {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    DaemonError::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                ExtractorConfig::from_toml(&contents).map_err(DaemonError::Config)?
            }
            None => ExtractorConfig::default(),
        };

        if let Some(attempts) = cli.max_repair_attempts {
            extractor.max_repair_attempts = attempts;
        }

        let config = Self {
            watch_dir: cli.watch_dir,
            database: cli.database,
            ai_endpoint: cli.ai_endpoint,
            model: cli.model,
            poll_interval: Duration::from_millis(cli.poll_interval_ms),
            extractor,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DaemonError> {
        if self.model.trim().is_empty() {
            return Err(DaemonError::Config("model name must not be empty".to_string()));
        }
        if self.ai_endpoint.trim().is_empty() {
            return Err(DaemonError::Config("AI endpoint must not be empty".to_string()));
        }
        if self.poll_interval.is_zero() {
            return Err(DaemonError::Config("poll interval must be greater than 0".to_string()));
        }
        self.extractor.validate().map_err(DaemonError::Config)
    }
}
