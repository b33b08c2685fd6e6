//! Recovers JSON payloads from free-form model output.
//!
//! Models are told not to fence or annotate their JSON, but they do anyway.
//! Extraction order:
//! 1. the inner content of the first ```json fence, else the first ``` fence;
//! 2. within that (or the whole text), the span from the first opening
//!    bracket to the last closing bracket of the requested shape;
//! 3. `serde_json` parse of that span.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Array,
    Object,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Array => ('[', ']'),
            JsonShape::Object => ('{', '}'),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON payload found in AI response")]
    NoJson,

    #[error("AI response is not valid JSON: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("AI response has the wrong JSON shape")]
    WrongShape,

    #[error("AI response contained no usable entries")]
    Empty,

    #[error("AI response is missing a valid {0} line")]
    MissingLabel(&'static str),
}

/// Extracts and parses the JSON value of `shape` embedded in `text`.
pub fn extract_json(text: &str, shape: JsonShape) -> Result<Value, ParseError> {
    let candidate = fenced_block(text).unwrap_or(text);
    let span = bracket_span(candidate, shape).ok_or(ParseError::NoJson)?;
    Ok(serde_json::from_str(span)?)
}

/// Parses each element of a JSON array into `T`.
///
/// Plain strings mixed into an object list are skipped, as are objects that do
/// not fit `T`. The result may be empty; callers decide whether that is fatal.
pub fn parse_records<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ParseError> {
    let Value::Array(items) = value else {
        return Err(ParseError::WrongShape);
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if item.is_string() {
            debug!("Skipping plain-string entry {index} in AI array");
            continue;
        }
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping malformed entry {index} in AI array: {e}"),
        }
    }
    Ok(records)
}

/// Returns the body of the first `json`-tagged fenced block, or failing that
/// the first fenced block of any kind. An unterminated fence runs to the end
/// of the text.
fn fenced_block(text: &str) -> Option<&str> {
    let tagged = format!("{FENCE}json");
    if let Some(pos) = text.to_ascii_lowercase().find(&tagged) {
        return Some(fence_body(&text[pos + tagged.len()..]));
    }
    let start = text.find(FENCE)? + FENCE.len();
    Some(fence_body(&text[start..]))
}

fn fence_body(rest: &str) -> &str {
    let body = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.trim()
}

/// Greedy span from the first opening delimiter to the last closing one.
fn bracket_span(text: &str, shape: JsonShape) -> Option<&str> {
    let (open, close) = shape.delimiters();
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}
