//! Notewatch Extractor
//!
//! Splits note text into topical sections using an LLM and stores one
//! record per section.
//!
//! # Architecture
//!
//! ```text
//! text → ModelClient (generate) → sanitize → extract JSON → parse
//!                ↑                                           │ fails
//!                └──────────── ModelClient (fix) ←───────────┘
//!                                                            │ parses
//!                                           materialize → RecordStore
//! ```
//!
//! # Key Features
//!
//! - **Tolerant parsing**: code fences, chatter around the JSON and bare
//!   objects are all accepted
//! - **Bounded repair**: malformed output is sent back to the model in fix
//!   mode up to `max_repair_attempts` times
//! - **Defensive validation**: field presence and types are re-checked
//!   regardless of what the backend claims to enforce
//! - **Explicit context**: a [`Pipeline`] owns the model client and the
//!   store handle; nothing is global
//!
//! # Example Usage
//!
//! ```no_run
//! use notewatch_extractor::{ExtractorConfig, Pipeline};
//! use notewatch_llm::MockProvider;
//! use notewatch_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"[{"title":"Intro","summary":"s","tags":["a"],"content":"Intro."}]"#);
//! let store = SqliteStore::new(":memory:")?;
//!
//! let mut pipeline = Pipeline::new(llm, store, ExtractorConfig::default())?;
//! let outcome = pipeline.process_text("Intro. Body.", "note.txt").await?;
//!
//! println!("Stored {} of {} sections", outcome.report.inserted, outcome.sections);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod materializer;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod types;


pub use client::{GenerationMode, ModelClient};
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::SectionExtractor;
pub use materializer::materialize;
pub use pipeline::Pipeline;
pub use types::{Extraction, ExtractionAttempt, ExtractionState, MaterializeReport, ProcessOutcome};
