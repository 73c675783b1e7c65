//! Section and Record - the extracted and persisted units of a note

use std::time::{SystemTime, UNIX_EPOCH};

/// One topically coherent chunk of an input file
///
/// Every field is always present. Values the model omitted are normalized
/// to an empty string or an empty tag list before a `Section` is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Short heading for the section
    pub title: String,

    /// One or two sentence summary
    pub summary: String,

    /// Topic tags, in the order the model produced them
    pub tags: Vec<String>,

    /// The original sub-text this section was derived from
    pub content: String,
}

impl Section {
    /// Create a section from its four fields
    ///
    /// # Examples
    ///
    /// ```
    /// use notewatch_domain::Section;
    ///
    /// let section = Section::new("Intro", "s", vec!["a".to_string()], "Intro.");
    /// assert_eq!(section.title, "Intro");
    /// assert_eq!(section.tags, vec!["a"]);
    /// ```
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        tags: Vec<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            tags,
            content: content.into(),
        }
    }
}

/// The persisted unit written to the record store
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Basename of the source file
    pub filename: String,

    /// Section title
    pub title: String,

    /// Section summary
    pub summary: String,

    /// Section tags
    pub tags: Vec<String>,

    /// Section content, i.e. the original text
    pub original: String,

    /// Seconds since the Unix epoch at the moment the record was built
    pub timestamp: f64,
}

impl Record {
    /// Project a section into a record with an explicit timestamp
    pub fn from_section(section: Section, filename: impl Into<String>, timestamp: f64) -> Self {
        Self {
            filename: filename.into(),
            title: section.title,
            summary: section.summary,
            tags: section.tags,
            original: section.content,
            timestamp,
        }
    }

    /// Project a section into a record stamped with the current wall-clock time
    ///
    /// # Examples
    ///
    /// ```
    /// use notewatch_domain::{Record, Section};
    ///
    /// let record = Record::stamped(Section::new("T", "", vec![], "c"), "note.txt");
    /// assert_eq!(record.filename, "note.txt");
    /// assert_eq!(record.original, "c");
    /// assert!(record.timestamp > 0.0);
    /// ```
    pub fn stamped(section: Section, filename: impl Into<String>) -> Self {
        Self::from_section(section, filename, unix_timestamp())
    }
}

/// Current time as fractional seconds since the Unix epoch
///
/// A clock set before 1970 yields `0.0`.
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
