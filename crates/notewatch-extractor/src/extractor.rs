//! Repair loop: generate, validate, and fix until the output parses

use crate::client::ModelClient;
use crate::error::ExtractorError;
use crate::parser::{json_candidate, parse_sections};
use crate::types::{Extraction, ExtractionAttempt, ExtractionState};
use notewatch_domain::traits::LlmProvider;
use std::fmt;
use tracing::{debug, error, warn};

/// Turns note text into validated sections
///
/// Makes one generate-mode call, then up to `max_repair_attempts` fix-mode
/// calls while the output fails to parse. With N repair attempts the model
/// is called at most N+1 times.
pub struct SectionExtractor<L> {
    client: ModelClient<L>,
    max_repair_attempts: u32,
    preview_chars: usize,
}

impl<L> SectionExtractor<L>
where
    L: LlmProvider,
    L::Error: fmt::Display,
{
    /// Create a new extractor
    pub fn new(client: ModelClient<L>, max_repair_attempts: u32, preview_chars: usize) -> Self {
        Self {
            client,
            max_repair_attempts,
            preview_chars,
        }
    }

    /// The model client used for every call
    pub fn client(&self) -> &ModelClient<L> {
        &self.client
    }

    /// Maximum fix-mode calls per file
    pub fn max_repair_attempts(&self) -> u32 {
        self.max_repair_attempts
    }

    /// Run the repair loop for one file
    ///
    /// # Errors
    ///
    /// - [`ExtractorError::Llm`] / [`ExtractorError::Timeout`] if any model
    ///   call fails; such failures are not retried
    /// - [`ExtractorError::MalformedOutput`] if nothing parses once the
    ///   repair budget is spent
    pub async fn extract(&self, text: &str, filename: &str) -> Result<Extraction, ExtractorError> {
        let mut attempt = ExtractionAttempt::default();
        let mut state = ExtractionState::Generating;

        loop {
            state = match state {
                ExtractionState::Generating => {
                    attempt.raw = self.client.generate(text).await?;
                    ExtractionState::Validating
                }
                ExtractionState::Validating => self.validate(&mut attempt, filename),
                ExtractionState::Repairing => {
                    attempt.attempts += 1;
                    attempt.raw = self.client.fix(&attempt.candidate).await?;
                    ExtractionState::Validating
                }
                ExtractionState::Done(sections) => {
                    return Ok(Extraction {
                        sections,
                        repair_attempts: attempt.attempts,
                    });
                }
                ExtractionState::Failed => {
                    let reason = attempt.last_error.take().unwrap_or_default();
                    let preview = truncate_preview(&attempt.raw, self.preview_chars);
                    error!("Failed to parse AI JSON for {}: {}", filename, reason);
                    error!("Raw AI output (truncated): {}", preview);
                    return Err(ExtractorError::MalformedOutput {
                        attempts: attempt.attempts,
                        reason,
                        preview,
                    });
                }
            };
        }
    }

    fn validate(&self, attempt: &mut ExtractionAttempt, filename: &str) -> ExtractionState {
        attempt.candidate = json_candidate(&attempt.raw);
        debug!("Candidate for {}: {} chars", filename, attempt.candidate.len());

        match parse_sections(&attempt.candidate) {
            Ok(sections) => ExtractionState::Done(sections),
            Err(e) => {
                attempt.last_error = Some(e.to_string());
                if attempt.attempts < self.max_repair_attempts {
                    warn!(
                        "JSON parse failed for {}, retrying schema-fix ({}/{})...",
                        filename,
                        attempt.attempts + 1,
                        self.max_repair_attempts
                    );
                    ExtractionState::Repairing
                } else {
                    ExtractionState::Failed
                }
            }
        }
    }
}

/// Cut `raw` to at most `max_chars` characters, appending `...` when cut
pub fn truncate_preview(raw: &str, max_chars: usize) -> String {
    match raw.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &raw[..idx]),
        None => raw.to_string(),
    }
}
