//! The per-file processing context

use crate::client::ModelClient;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::SectionExtractor;
use crate::materializer::materialize;
use crate::types::ProcessOutcome;
use notewatch_domain::traits::{LlmProvider, RecordStore};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Everything needed to turn a note into stored records
///
/// Owns the model client and the single long-lived store handle. Build it
/// once at startup, feed it files one at a time, and call
/// [`Pipeline::into_store`] at shutdown to close the store.
pub struct Pipeline<L, S> {
    extractor: SectionExtractor<L>,
    store: S,
    config: ExtractorConfig,
}

impl<L, S> Pipeline<L, S>
where
    L: LlmProvider,
    L::Error: fmt::Display,
    S: RecordStore,
    S::Error: fmt::Display,
{
    /// Create a pipeline
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::Config`] if `config` is invalid.
    pub fn new(provider: L, store: S, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let client = ModelClient::new(provider, config.request_timeout());
        let extractor = SectionExtractor::new(client, config.max_repair_attempts, config.preview_chars);

        Ok(Self {
            extractor,
            store,
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The record store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The record store, mutably
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Tear the pipeline down, handing back the store for closing
    pub fn into_store(self) -> S {
        self.store
    }

    /// Extract sections from `text` and store one record per section
    ///
    /// Either every section of a successful parse is materialized or, on
    /// failure, nothing is.
    pub async fn process_text(
        &mut self,
        text: &str,
        filename: &str,
    ) -> Result<ProcessOutcome, ExtractorError> {
        let extraction = self.extractor.extract(text, filename).await?;
        let sections = extraction.sections.len();

        let report = materialize(&mut self.store, filename, extraction.sections);

        if report.failed > 0 {
            info!(
                "Processed {} into {} sections ({} not stored).",
                filename, sections, report.failed
            );
        } else {
            info!("Processed {} into {} sections.", filename, sections);
        }

        Ok(ProcessOutcome {
            filename: filename.to_string(),
            sections,
            repair_attempts: extraction.repair_attempts,
            report,
        })
    }

    /// Read `path` as UTF-8 and process it under its basename
    pub async fn process_file(&mut self, path: &Path) -> Result<ProcessOutcome, ExtractorError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ExtractorError::Io(format!("Not a file path: {}", path.display())))?;

        let text = tokio::fs::read_to_string(path).await?;
        self.process_text(&text, &filename).await
    }
}
