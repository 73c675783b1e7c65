//! Command-line arguments, each with an environment fallback

use clap::Parser;
use std::path::PathBuf;

/// Directory watched when nothing else is configured
pub const DEFAULT_WATCH_DIR: &str = "/mnt/storage";

/// Notewatch - split new text notes into sections and store them
#[derive(Debug, Parser)]
#[command(name = "notewatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory to watch for new .txt files (not recursive)
    #[arg(long, env = "WATCH_DIR", default_value = DEFAULT_WATCH_DIR)]
    pub watch_dir: PathBuf,

    /// SQLite database file for section records
    #[arg(long, env = "DATABASE_PATH", default_value = "notewatch.db")]
    pub database: PathBuf,

    /// Ollama endpoint (server root or full /api/generate URL)
    #[arg(long, env = "AI_ENDPOINT", default_value = "http://localhost:11434/api/generate")]
    pub ai_endpoint: String,

    /// Model identifier
    #[arg(long, env = "MODEL_NAME")]
    pub model: String,

    /// Extractor configuration file (TOML)
    #[arg(short, long, env = "NOTEWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// How often to rescan the directory, in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Override max_repair_attempts from the config file
    #[arg(long, env = "MAX_REPAIR_ATTEMPTS")]
    pub max_repair_attempts: Option<u32>,
}
