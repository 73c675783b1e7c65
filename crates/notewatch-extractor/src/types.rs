//! State and result types for extraction

use notewatch_domain::Section;

/// Where the repair loop currently is
///
/// ```text
/// Generating → Validating → Done
///                  ↓    ↑
///              Repairing
///                  ↓
///               Failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionState {
    /// Waiting on the generate-mode call
    Generating,
    /// Parsing the latest raw output
    Validating,
    /// Waiting on a fix-mode call
    Repairing,
    /// Parsed successfully
    Done(Vec<Section>),
    /// Repair budget exhausted
    Failed,
}

impl ExtractionState {
    /// Whether the loop has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExtractionState::Done(_) | ExtractionState::Failed)
    }
}

/// Per-file bookkeeping for the repair loop
///
/// Lives only while one file is processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionAttempt {
    /// Latest raw model output
    pub raw: String,

    /// Best JSON candidate recovered from `raw`
    pub candidate: String,

    /// Repair attempts made so far
    pub attempts: u32,

    /// Most recent parse error
    pub last_error: Option<String>,
}

/// Sections recovered from one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Validated sections, in model order
    pub sections: Vec<Section>,

    /// Fix-mode calls it took to get there
    pub repair_attempts: u32,
}

/// Outcome of writing sections to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Records written
    pub inserted: usize,

    /// Records the store rejected
    pub failed: usize,
}

/// Outcome of processing one file end to end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Source file basename
    pub filename: String,

    /// Sections the model produced
    pub sections: usize,

    /// Fix-mode calls made
    pub repair_attempts: u32,

    /// Store results
    pub report: MaterializeReport,
}
