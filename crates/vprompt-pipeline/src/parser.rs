//! Scene timeline extraction from raw oracle text.
//!
//! Oracle responses often wrap the JSON payload in prose, markdown fences or
//! trailing commentary. Extraction is tolerant of the surrounding noise but
//! strict about the extracted span: it must deserialize as a JSON object.
//!
//! Strategies, in priority order:
//! 1. A fenced code block labelled `json`
//! 2. The first balanced `{...}` span that parses as an object
//!
//! The result is a tagged [`ParseOutcome`]; nothing here panics or returns
//! an error the caller has to propagate.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Maximum number of `{` positions tried by the balanced scanner.
pub const MAX_SCAN_ATTEMPTS: usize = 16;

/// Which extraction strategy produced the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Fenced,
    Balanced,
}

impl ExtractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionSource::Fenced => "fenced",
            ExtractionSource::Balanced => "balanced",
        }
    }
}

/// Untyped key-value tree extracted from the oracle text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCandidate {
    pub root: Map<String, Value>,
    pub source: ExtractionSource,
}

impl ParsedCandidate {
    /// String value of the first present, non-blank key.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.root.get(*k))
            .find_map(coerce_text)
    }

    /// Array value of the first present key.
    pub fn array(&self, keys: &[&str]) -> Option<&Vec<Value>> {
        keys.iter()
            .filter_map(|k| self.root.get(*k))
            .find_map(Value::as_array)
    }
}

/// Why the oracle text could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("oracle response is empty")]
    EmptyInput,

    #[error("no structured payload found in oracle response")]
    NoStructuredPayload,

    #[error("structured payload is not valid JSON: {0}")]
    InvalidPayload(String),

    #[error("structured payload is not a JSON object")]
    NotAnObject,
}

impl ParseFailure {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ParseFailure::EmptyInput => "empty_input",
            ParseFailure::NoStructuredPayload => "no_payload",
            ParseFailure::InvalidPayload(_) => "invalid_payload",
            ParseFailure::NotAnObject => "not_an_object",
        }
    }
}

pub type ParseOutcome = Result<ParsedCandidate, ParseFailure>;

/// Extract a candidate object from raw oracle text.
pub fn parse_timeline(text: &str) -> ParseOutcome {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseFailure::EmptyInput);
    }

    let mut last_failure = ParseFailure::NoStructuredPayload;

    if let Some(block) = fenced_json_block(text) {
        match parse_object(block) {
            Ok(root) => {
                return Ok(ParsedCandidate {
                    root,
                    source: ExtractionSource::Fenced,
                })
            }
            Err(failure) => {
                debug!(reason = failure.reason(), "Fenced block rejected, scanning for object");
                last_failure = failure;
            }
        }
    }

    let mut offset = 0;
    for _ in 0..MAX_SCAN_ATTEMPTS {
        let Some(relative) = text[offset..].find('{') else {
            break;
        };
        let start = offset + relative;

        match balanced_object(&text[start..]) {
            Some(span) => match parse_object(span) {
                Ok(root) => {
                    return Ok(ParsedCandidate {
                        root,
                        source: ExtractionSource::Balanced,
                    })
                }
                Err(failure) => last_failure = failure,
            },
            None => {
                // A stray brace in prose; a later one may still open the payload.
                if matches!(last_failure, ParseFailure::NoStructuredPayload) {
                    last_failure =
                        ParseFailure::InvalidPayload("unterminated JSON object".to_string());
                }
            }
        }

        offset = start + 1;
    }

    Err(last_failure)
}

/// Body of the first ```` ```json ```` fenced block, if any.
fn fenced_json_block(text: &str) -> Option<&str> {
    let lower = text.to_ascii_lowercase();
    let fence = lower.find("```json")?;
    let body_start = fence + "```json".len();
    let body_end = text[body_start..]
        .find("```")
        .map(|end| body_start + end)
        .unwrap_or(text.len());
    Some(text[body_start..body_end].trim())
}

/// The first balanced `{...}` span at the start of `s`, honouring string
/// literals and escapes. `s` must start with `{`.
fn balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => depth += 1,
            '}' | ']' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Strictly parse a span as a JSON object, retrying once with trailing
/// commas removed.
fn parse_object(span: &str) -> Result<Map<String, Value>, ParseFailure> {
    let value = match serde_json::from_str::<Value>(span) {
        Ok(value) => value,
        Err(first_err) => {
            let repaired = strip_trailing_commas(span);
            if repaired == span {
                return Err(ParseFailure::InvalidPayload(first_err.to_string()));
            }
            serde_json::from_str::<Value>(&repaired)
                .map_err(|_| ParseFailure::InvalidPayload(first_err.to_string()))?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ParseFailure::NotAnObject),
    }
}

/// Remove commas that directly precede a closing `}` or `]` outside of
/// string literals.
fn strip_trailing_commas(span: &str) -> String {
    let chars: Vec<char> = span.chars().collect();
    let mut out = String::with_capacity(span.len());
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &ch) in chars.iter().enumerate() {
        if escape_next {
            escape_next = false;
            out.push(ch);
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            ',' if !in_string => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some('}') | Some(']')) {
                    continue;
                }
            }
            _ => {}
        }
        out.push(ch);
    }

    out
}

/// Coerce a JSON value to trimmed text. Null and blank values yield `None`.
pub fn coerce_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(coerce_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .values()
            .filter_map(coerce_text)
            .collect::<Vec<_>>()
            .join(", "),
    };

    (!text.is_empty()).then_some(text)
}

/// Title/description lines salvaged from unstructured prose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSeed {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Pull `Title:` / `Description:` lines out of prose.
pub fn prose_seed(text: &str) -> ResultSeed {
    let mut seed = ResultSeed::default();

    for line in text.lines() {
        let line = line.trim().trim_start_matches(['#', '*', '-', ' ']).trim();
        if seed.title.is_none() {
            seed.title = labelled_value(line, "title");
        }
        if seed.description.is_none() {
            seed.description = labelled_value(line, "description");
        }
    }

    seed
}

fn labelled_value(line: &str, label: &str) -> Option<String> {
    let (head, rest) = line.split_once(':')?;
    if !head.trim().trim_matches('*').eq_ignore_ascii_case(label) {
        return None;
    }
    let value = rest.trim().trim_matches(['*', '"']).trim();
    (!value.is_empty()).then(|| value.to_string())
}
