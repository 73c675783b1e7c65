//! Prompts and the output schema for section extraction

use serde_json::{json, Value};

/// JSON Schema the model output must satisfy
///
/// An array of objects, each with exactly `title`, `summary`, `tags` and
/// `content`.
pub fn section_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "title":   {"type": "string"},
                "summary": {"type": "string"},
                "tags":    {"type": "array", "items": {"type": "string"}},
                "content": {"type": "string"}
            },
            "required": ["title", "summary", "tags", "content"],
            "additionalProperties": false
        }
    })
}

/// Builds the generate-mode prompt for one note
pub struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build the complete extraction prompt
    ///
    /// The note text is appended verbatim after the instructions.
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(SPLIT_INSTRUCTIONS.len() + self.text.len() + 8);
        prompt.push_str(SPLIT_INSTRUCTIONS);
        prompt.push_str("\n\nTEXT:\n");
        prompt.push_str(&self.text);
        prompt
    }
}

/// Build the fix-mode prompt asking the model to repair `data` against `schema`
pub fn fix_prompt(data: &str, schema: &str) -> String {
    format!("{}\n\nSCHEMA:\n{}\n\nDATA:\n{}", FIX_INSTRUCTIONS, schema, data)
}

const SPLIT_INSTRUCTIONS: &str = "Split the following text into sections by topic.
Return a JSON array of objects with fields: title (string), summary (string), tags (array of strings), content (string).
If a value is missing, use an empty string or empty array.";

const FIX_INSTRUCTIONS: &str = "Fix the following so it becomes valid JSON matching this schema exactly. \
Output JSON only, no explanations.";
