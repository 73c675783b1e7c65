//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while turning a note into records
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error (transport failure or non-success status)
    #[error("LLM error: {0}")]
    Llm(String),

    /// A single model call exceeded the configured timeout
    #[error("Model call timed out after {0}s")]
    Timeout(u64),

    /// No parsable JSON after every repair attempt was spent
    #[error("Malformed model output after {attempts} repair attempt(s): {reason}")]
    MalformedOutput {
        /// Repair attempts made
        attempts: u32,
        /// Last JSON parse error
        reason: String,
        /// Last raw model output, truncated
        preview: String,
    },

    /// The input file could not be read
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for ExtractorError {
    fn from(e: std::io::Error) -> Self {
        ExtractorError::Io(e.to_string())
    }
}
