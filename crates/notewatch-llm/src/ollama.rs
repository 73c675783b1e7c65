//! Ollama Provider Implementation
//!
//! Talks to Ollama's `/api/generate` endpoint with a JSON Schema passed as
//! the `format` constraint and deterministic decoding options.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - Configurable endpoint, model, timeout and decoding options
//! - Schema-constrained output via the `format` field
//! - No internal retries: a failed call is reported to the caller as-is
//!
//! # Examples
//!
//! ```no_run
//! use notewatch_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3").unwrap();
//! assert_eq!(provider.generate_url(), "http://localhost:11434/api/generate");
//! ```

use crate::LlmError;
use notewatch_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Path of the generate API
pub const GENERATE_PATH: &str = "/api/generate";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default context window passed as `num_ctx`
pub const DEFAULT_CONTEXT_SIZE: u32 = 8192;

/// Ollama API provider
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
    options: GenerateOptions,
}

/// Decoding options sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerateOptions {
    /// Sampling temperature; 0.0 means greedy decoding
    pub temperature: f32,
    /// Context window size
    pub num_ctx: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            num_ctx: DEFAULT_CONTEXT_SIZE,
        }
    }
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: serde_json::Value,
    options: GenerateOptions,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// `endpoint` may be the server root (`http://localhost:11434`) or the
    /// full generate URL (`http://localhost:11434/api/generate`).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Other`] if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama provider with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            timeout,
            options: GenerateOptions::default(),
        })
    }

    /// Create a new Ollama provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Override the decoding options
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Model identifier sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Decoding options sent with each request
    pub fn options(&self) -> GenerateOptions {
        self.options
    }

    /// Full URL of the generate API
    pub fn generate_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        if base.ends_with(GENERATE_PATH) {
            base.to_string()
        } else {
            format!("{}{}", base, GENERATE_PATH)
        }
    }

    /// Send one generate request and return the trimmed `response` field
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is unreachable or the request times out
    /// - The model is not available (HTTP 404)
    /// - Any other non-success status is returned
    /// - The body is not a valid generate response
    async fn request(
        &self,
        prompt: &str,
        format: serde_json::Value,
    ) -> Result<String, LlmError> {
        let url = self.generate_url();

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format,
            options: self.options,
        };

        debug!("POST {} (model '{}', prompt {} chars)", url, self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let body = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.response.unwrap_or_default().trim().to_string())
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        let format: serde_json::Value = serde_json::from_str(schema)
            .map_err(|e| LlmError::InvalidRequest(format!("Schema is not valid JSON: {}", e)))?;
        self.request(prompt, format).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434", "llama2").unwrap();
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model(), "llama2");
        assert_eq!(provider.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "mistral");
    }

    #[test]
    fn test_generate_url_accepts_root_or_full_path() {
        let root = OllamaProvider::new("http://localhost:11434/", "m").unwrap();
        assert_eq!(root.generate_url(), "http://localhost:11434/api/generate");

        let full = OllamaProvider::new("http://localhost:11434/api/generate", "m").unwrap();
        assert_eq!(full.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_default_options_are_deterministic() {
        let provider = OllamaProvider::default_endpoint("m").unwrap();
        assert_eq!(provider.options().temperature, 0.0);
        assert_eq!(provider.options().num_ctx, 8192);
    }

    #[test]
    fn test_request_body_shape() {
        let body = OllamaGenerateRequest {
            model: "m",
            prompt: "p",
            stream: false,
            format: serde_json::json!({"type": "array"}),
            options: GenerateOptions::default(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["format"]["type"], "array");
        assert_eq!(value["options"]["temperature"], 0.0);
        assert_eq!(value["options"]["num_ctx"], 8192);
    }

    #[tokio::test]
    async fn test_invalid_schema_is_rejected_before_sending() {
        let provider = OllamaProvider::default_endpoint("m").unwrap();
        let result = provider.generate_structured("p", "not json").await;
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        // Port 9 (discard) is closed on test hosts; connection is refused
        let provider = OllamaProvider::with_timeout("http://127.0.0.1:9", "llama2", Duration::from_secs(2)).unwrap();

        let result = provider.generate_structured("test", "{}").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
