//! Notewatch Daemon
//!
//! Watches a directory for new `.txt` notes, splits each one into sections
//! with an LLM and stores one record per section in SQLite.
//!
//! # Overview
//!
//! - **Watcher**: rescans the directory on a fixed interval and reports new
//!   `.txt` files (case-insensitive, not recursive)
//! - **Worker**: hands each new file to the extraction [`Pipeline`],
//!   logging and skipping files that fail
//! - **Shutdown**: Ctrl+C stops the loop after the current file and closes
//!   the store
//!
//! # Configuration
//!
//! Every option is a command-line flag with an environment fallback; a
//! `.env` file in the working directory is loaded first. Extraction
//! settings can also come from a TOML file:
//!
//! ```toml
//! max_repair_attempts = 1
//! request_timeout_secs = 120
//! context_size = 8192
//! temperature = 0.0
//! preview_chars = 2000
//! ```
//!
//! [`Pipeline`]: notewatch_extractor::Pipeline

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod watcher;
pub mod worker;

pub use cli::Cli;
pub use config::DaemonConfig;
pub use error::DaemonError;
pub use metrics::WatchMetrics;
pub use watcher::{is_text_file, DirectoryWatcher, FileEvent};
pub use worker::WatchWorker;

use notewatch_extractor::Pipeline;
use notewatch_llm::{GenerateOptions, OllamaProvider};
use notewatch_store::SqliteStore;

/// Run the daemon until Ctrl+C
///
/// # Errors
///
/// Returns an error if the provider, store, or watcher cannot be set up,
/// or if the store fails to close cleanly.
pub async fn run(config: DaemonConfig) -> Result<(), DaemonError> {
    let options = GenerateOptions {
        temperature: config.extractor.temperature,
        num_ctx: config.extractor.context_size,
    };
    let llm = OllamaProvider::with_timeout(
        config.ai_endpoint.as_str(),
        config.model.as_str(),
        config.extractor.request_timeout(),
    )?
    .with_options(options);

    let store = SqliteStore::new(&config.database)?;
    tracing::debug!("Opened record store at {}", config.database.display());

    let pipeline = Pipeline::new(llm, store, config.extractor.clone())?;
    let watcher = DirectoryWatcher::new(&config.watch_dir)?;

    tracing::info!(
        "Note-watcher is running. Watching '{}' for new .txt files using model '{}'...",
        config.watch_dir.display(),
        config.model
    );

    let worker = WatchWorker::new(pipeline, watcher, config.poll_interval);
    let store = worker.run().await;

    store.close()?;
    tracing::info!("Record store closed");
    Ok(())
}
