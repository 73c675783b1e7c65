//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! infrastructure. Implementations live in other crates.

use crate::Record;
use std::future::Future;

/// Trait for persisting records
///
/// Implemented by the infrastructure layer (notewatch-store). The pipeline
/// only ever writes; no query interface is required.
pub trait RecordStore {
    /// Error type for store operations
    type Error;

    /// Insert a single record
    fn insert_record(&mut self, record: Record) -> Result<(), Self::Error>;
}

/// Trait for text-generation backends
///
/// Implemented by the infrastructure layer (notewatch-llm).
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text for `prompt`, constrained to the JSON Schema in `schema`
    ///
    /// Implementations must use deterministic decoding and must not retry
    /// on their own; retry policy belongs to the caller.
    fn generate_structured(
        &self,
        prompt: &str,
        schema: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
