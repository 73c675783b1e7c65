//! Error types for the watcher daemon

use thiserror::Error;

/// Errors that stop the daemon from starting or running
///
/// Failures while processing a single file are not represented here; they
/// are logged and the watch continues.
#[derive(Error, Debug)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(#[from] notewatch_store::StoreError),

    /// LLM provider setup error
    #[error("LLM error: {0}")]
    Llm(#[from] notewatch_llm::LlmError),

    /// Pipeline setup error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] notewatch_extractor::ExtractorError),

    /// The watched directory is unusable
    #[error("Watch error: {0}")]
    Watch(String),
}
