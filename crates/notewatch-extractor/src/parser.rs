//! Recover structured sections from free-text model output
//!
//! Models wrap JSON in markdown fences, prepend chatter ("Sure! Here is..."),
//! or return a bare object where an array was asked for. The helpers here
//! peel that away without ever failing: each returns the best candidate it
//! can find and leaves the decision to the caller.

use notewatch_domain::Section;
use regex::Regex;
use serde_json::{Map, Value};
use std::ops::Range;
use std::sync::LazyLock;
use tracing::warn;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(.*?)```").unwrap()
});

/// Return the trimmed body of the first fenced code block, or `text` unchanged
///
/// The fence may be tagged `json` in any case. Running this on its own
/// output is a no-op.
pub fn strip_code_fences(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => text,
    }
}

/// Byte range of the first balanced `open`..`close` block in `text`
fn balanced_span(text: &str, open: char, close: char) -> Option<Range<usize>> {
    let start = text.find(open)?;

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        if ch == '"' || ch == '\'' {
            quote = Some(ch);
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                let end = start + offset + ch.len_utf8();
                return Some(start..end);
            }
        }
    }

    None
}

/// Extract the first balanced `open`..`close` block from `text`
///
/// Scanning starts at the first `open`. Brackets inside single- or
/// double-quoted string literals are ignored, and a backslash inside a
/// string escapes the next character. Returns `None` when there is no
/// opening bracket or the block never closes.
///
/// # Examples
///
/// ```
/// use notewatch_extractor::parser::extract_balanced_block;
///
/// let text = r#"Sure! {"a": "}", "b": [1, {"c": 2}]} trailing"#;
/// assert_eq!(
///     extract_balanced_block(text, '{', '}'),
///     Some(r#"{"a": "}", "b": [1, {"c": 2}]}"#)
/// );
/// assert_eq!(extract_balanced_block("[1, 2", '[', ']'), None);
/// ```
pub fn extract_balanced_block(text: &str, open: char, close: char) -> Option<&str> {
    balanced_span(text, open, close).map(|span| &text[span])
}

/// Extract the first top-level JSON array or object from model output
///
/// Code fences are stripped first. An array is preferred over an object,
/// unless the array sits inside the object (a bare object with a `tags`
/// list, say), in which case the object is the top-level value. An array
/// that follows an unclosed `{` belongs to that truncated object and is
/// never returned on its own.
pub fn extract_first_json(text: &str) -> Option<&str> {
    let cleaned = strip_code_fences(text).trim_start();

    let array = balanced_span(cleaned, '[', ']');
    let object = balanced_span(cleaned, '{', '}');
    let object_start = cleaned.find('{');

    let span = match (array, object) {
        (Some(a), Some(o)) if o.start < a.start && a.end <= o.end => o,
        (Some(a), None) if object_start.is_some_and(|start| start < a.start) => return None,
        (Some(a), _) => a,
        (None, o) => o?,
    };

    Some(&cleaned[span])
}

/// Best string to parse (and, failing that, to hand to fix mode)
///
/// In order of preference: the first balanced JSON block; everything from
/// the first opening bracket onward when the block is truncated; the raw
/// text trimmed.
pub fn json_candidate(raw: &str) -> String {
    if let Some(block) = extract_first_json(raw) {
        return block.to_string();
    }

    let cleaned = strip_code_fences(raw).trim();
    match cleaned.find(|c: char| c == '[' || c == '{') {
        Some(start) => cleaned[start..].to_string(),
        None => raw.trim().to_string(),
    }
}

/// Parse `candidate` as a JSON sequence, wrapping a non-array value in a
/// one-element sequence
pub fn parse_json_sequence(candidate: &str) -> Result<Vec<Value>, serde_json::Error> {
    let value: Value = serde_json::from_str(candidate)?;
    Ok(match value {
        Value::Array(items) => items,
        other => vec![other],
    })
}

/// Parse `candidate` into sections
///
/// Fails only when `candidate` is not JSON. Elements that are not objects
/// are skipped with a warning; fields are coerced by [`coerce_section`].
pub fn parse_sections(candidate: &str) -> Result<Vec<Section>, serde_json::Error> {
    let items = parse_json_sequence(candidate)?;

    let mut sections = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match coerce_section(item) {
            Some(section) => sections.push(section),
            None => warn!("Skipping section {}: expected a JSON object, got {}", idx, kind(item)),
        }
    }
    Ok(sections)
}

/// Coerce one JSON object into a [`Section`]
///
/// The schema is not trusted. Missing or null fields become `""` / `[]`;
/// numbers and booleans are stringified; arrays and objects in a string
/// field are dropped. A bare string `tags` becomes a single tag.
pub fn coerce_section(value: &Value) -> Option<Section> {
    let obj = value.as_object()?;

    Some(Section {
        title: string_field(obj, "title"),
        summary: string_field(obj, "summary"),
        tags: tags_field(obj),
        content: string_field(obj, "content"),
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).and_then(scalar_to_string).unwrap_or_default()
}

fn tags_field(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("tags") {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(Value::String(tag)) if !tag.trim().is_empty() => vec![tag.clone()],
        _ => Vec::new(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
