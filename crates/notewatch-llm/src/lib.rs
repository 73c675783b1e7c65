//! Notewatch LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `notewatch-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted, deterministic mock for testing
//! - `OllamaProvider`: Ollama `/api/generate` integration with schema-constrained output
//!
//! # Examples
//!
//! ```
//! use notewatch_llm::MockProvider;
//! use notewatch_domain::traits::LlmProvider;
//!
//! # async fn example() {
//! let provider = MockProvider::new("[]");
//! let result = provider.generate_structured("prompt", "{}").await.unwrap();
//! assert_eq!(result, "[]");
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;

use notewatch_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use ollama::{GenerateOptions, OllamaProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network error or non-success HTTP status
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request could not be built (e.g. the schema is not valid JSON)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// A scripted reply for [`MockProvider`]
#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<Scripted>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are served from a FIFO script; once the script is exhausted the
/// default response is returned. Every prompt is recorded so tests can
/// assert on what the pipeline actually sent.
///
/// # Examples
///
/// ```
/// use notewatch_llm::MockProvider;
/// use notewatch_domain::traits::LlmProvider;
///
/// # async fn example() {
/// let provider = MockProvider::new("fallback");
/// provider.push_response("first");
/// assert_eq!(provider.generate_structured("a", "{}").await.unwrap(), "first");
/// assert_eq!(provider.generate_structured("b", "{}").await.unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a MockProvider that replies with `responses` in order
    pub fn with_sequence<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::default();
        for response in responses {
            provider.push_response(response);
        }
        provider
    }

    /// Queue a reply
    pub fn push_response(&self, response: impl Into<String>) {
        self.lock().script.push_back(Scripted::Reply(response.into()));
    }

    /// Queue a failure, surfaced as [`LlmError::Communication`]
    pub fn push_error(&self, message: impl Into<String>) {
        self.lock().script.push_back(Scripted::Fail(message.into()));
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.lock().prompts.len()
    }

    /// All prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    /// The most recent prompt, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.lock().prompts.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        let next = {
            let mut state = self.lock();
            state.prompts.push(prompt.to_string());
            state.script.pop_front()
        };

        match next {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(LlmError::Communication(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate_structured("any prompt", "{}").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_sequence_then_default() {
        let provider = MockProvider::with_sequence(["one", "two"]);

        assert_eq!(provider.generate_structured("p1", "{}").await.unwrap(), "one");
        assert_eq!(provider.generate_structured("p2", "{}").await.unwrap(), "two");
        assert_eq!(provider.generate_structured("p3", "{}").await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_mock_provider_records_prompts() {
        let provider = MockProvider::default();

        provider.generate_structured("first", "{}").await.unwrap();
        provider.generate_structured("second", "{}").await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["first", "second"]);
        assert_eq!(provider.last_prompt().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let provider = MockProvider::default();
        provider.push_error("connection refused");

        let result = provider.generate_structured("bad prompt", "{}").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
        // Failed calls still count as calls
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate_structured("test", "{}").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
