//! Model client: schema-constrained generate and fix calls

use crate::error::ExtractorError;
use crate::prompt::{fix_prompt, section_schema, PromptBuilder};
use notewatch_domain::traits::LlmProvider;
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Which prompt a model call uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Split the input text into sections
    Generate,
    /// Repair previously produced output against the schema
    Fix,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Generate => write!(f, "generate"),
            GenerationMode::Fix => write!(f, "fix"),
        }
    }
}

/// Sends generate- and fix-mode requests through an [`LlmProvider`]
///
/// Every request carries the section schema. Failures are returned to the
/// caller unchanged; this type never retries.
pub struct ModelClient<L> {
    provider: L,
    schema: String,
    timeout: Duration,
}

impl<L> ModelClient<L>
where
    L: LlmProvider,
    L::Error: fmt::Display,
{
    /// Create a client with the given per-call timeout
    pub fn new(provider: L, timeout: Duration) -> Self {
        Self {
            provider,
            schema: section_schema().to_string(),
            timeout,
        }
    }

    /// The serialized output schema sent with every request
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The underlying provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Ask the model to split `text` into sections
    pub async fn generate(&self, text: &str) -> Result<String, ExtractorError> {
        self.call(GenerationMode::Generate, text).await
    }

    /// Ask the model to repair `data` into schema-conformant JSON
    pub async fn fix(&self, data: &str) -> Result<String, ExtractorError> {
        self.call(GenerationMode::Fix, data).await
    }

    /// Issue one model call and return the trimmed response
    pub async fn call(&self, mode: GenerationMode, input: &str) -> Result<String, ExtractorError> {
        let prompt = match mode {
            GenerationMode::Generate => PromptBuilder::new(input).build(),
            GenerationMode::Fix => fix_prompt(input, &self.schema),
        };

        debug!("{} prompt length: {} chars", mode, prompt.len());

        let response = timeout(
            self.timeout,
            self.provider.generate_structured(&prompt, &self.schema),
        )
        .await
        .map_err(|_| ExtractorError::Timeout(self.timeout.as_secs()))?
        .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("{} response length: {} chars", mode, response.len());

        Ok(response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notewatch_llm::MockProvider;

    fn client(provider: MockProvider) -> ModelClient<MockProvider> {
        ModelClient::new(provider, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_generate_mode_sends_instruction_and_text() {
        let provider = MockProvider::new("  [] \n");
        let client = client(provider.clone());

        let response = client.generate("Intro. Body.").await.unwrap();

        assert_eq!(response, "[]");
        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.starts_with("Split the following text"));
        assert!(prompt.ends_with("Intro. Body."));
    }

    #[tokio::test]
    async fn test_fix_mode_embeds_schema_and_data() {
        let provider = MockProvider::new("[]");
        let client = client(provider.clone());

        client.fix(r#"[{"title": "X""#).await.unwrap();

        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.starts_with("Fix the following"));
        assert!(prompt.contains(client.schema()));
        assert!(prompt.ends_with(r#"DATA:
[{"title": "X""#));
    }

    #[tokio::test]
    async fn test_provider_error_is_propagated() {
        let provider = MockProvider::default();
        provider.push_error("connection refused");
        let client = client(provider.clone());

        let result = client.generate("text").await;

        assert!(matches!(result, Err(ExtractorError::Llm(ref m)) if m.contains("connection refused")));
        assert_eq!(provider.call_count(), 1);
    }

    struct SlowProvider;

    impl LlmProvider for SlowProvider {
        type Error = String;

        async fn generate_structured(&self, _prompt: &str, _schema: &str) -> Result<String, String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("[]".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let client = ModelClient::new(SlowProvider, Duration::from_secs(1));
        let result = client.generate("text").await;
        assert!(matches!(result, Err(ExtractorError::Timeout(1))));
    }
}
