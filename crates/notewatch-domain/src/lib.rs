//! Notewatch Domain Layer
//!
//! Core value types and collaborator interfaces for the note ingestion
//! pipeline. This crate has ZERO external dependencies; the HTTP backend,
//! the database and the file watcher all live in other crates and plug in
//! through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **Section**: one topic-partitioned chunk of an input file plus the
//!   metadata the model derived for it
//! - **Record**: the persisted form of a Section, carrying provenance
//!   (source filename and ingestion timestamp)
//!
//! ## Architecture
//!
//! ```text
//! file text → LlmProvider → Sections → Records → RecordStore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod section;
pub mod traits;

// Re-exports for convenience
pub use section::{unix_timestamp, Record, Section};
