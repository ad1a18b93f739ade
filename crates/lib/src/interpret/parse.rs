//! Parsing generation replies into an [`InterpretationResult`].
//!
//! Replies are often wrapped in markdown. Candidates are tried in order: the
//! body of a ```` ```json ```` block, the body of any fenced block, then the
//! reply as-is. A block body ends at the first closing fence that starts a
//! line, or failing that at the last closing fence in the reply. The first
//! candidate that parses wins.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// The structured reply the generation service is asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationResult {
  pub success: bool,
  #[serde(default)]
  pub files: Vec<GeneratedFile>,
  #[serde(default)]
  pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
  pub path: String,
  #[serde(default)]
  pub content: Value,
}

impl GeneratedFile {
  /// File contents as text. Non-string JSON is written pretty-printed, `null` as empty.
  pub fn text(&self) -> String {
    match &self.content {
      Value::String(s) => s.clone(),
      Value::Null => String::new(),
      other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
  }
}

/// Which part of the reply a parse attempt looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
  JsonFence,
  Fence,
  Raw,
}

impl fmt::Display for Candidate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Candidate::JsonFence => write!(f, "```json block"),
      Candidate::Fence => write!(f, "fenced block"),
      Candidate::Raw => write!(f, "reply"),
    }
  }
}

#[derive(Debug, Error)]
#[error("invalid JSON in {candidate}: {source}")]
pub struct ParseError {
  pub candidate: Candidate,
  #[source]
  pub source: serde_json::Error,
}

/// Parse a generation reply.
///
/// On failure the error of the most specific candidate tried is returned, since
/// that is the one the service meant as its answer.
pub fn parse_response(text: &str) -> Result<InterpretationResult, ParseError> {
  let mut first_error: Option<ParseError> = None;

  let fenced = [
    (Candidate::JsonFence, fenced_bodies(text, JSON_FENCE)),
    (Candidate::Fence, fenced_bodies(text, FENCE)),
  ];
  for (candidate, bodies) in fenced {
    for body in bodies {
      match serde_json::from_str(body.trim()) {
        Ok(result) => return Ok(result),
        Err(e) => {
          if first_error.is_none() {
            first_error = Some(ParseError { candidate, source: e });
          }
        }
      }
    }
  }

  serde_json::from_str(text.trim()).map_err(|e| {
    first_error.unwrap_or(ParseError {
      candidate: Candidate::Raw,
      source: e,
    })
  })
}

/// Possible bodies of the block opened by `opener`: up to the first closing
/// fence at the start of a line, then up to the last closing fence.
///
/// The rest of the opening line is a language tag unless it already holds JSON.
/// An unterminated block runs to the end of the text.
fn fenced_bodies<'a>(text: &'a str, opener: &str) -> Vec<&'a str> {
  let Some(start) = text.find(opener).map(|i| i + opener.len()) else {
    return Vec::new();
  };
  let body = &text[start..];
  let body = match body.find('\n') {
    Some(i) if !body[..i].contains(['{', '[']) => &body[i + 1..],
    _ => body,
  };

  let mut bodies = Vec::with_capacity(2);
  if let Some(end) = body.find(&format!("\n{FENCE}")) {
    bodies.push(&body[..end]);
  }
  let last = body.rfind(FENCE).map_or(body, |end| &body[..end]);
  if bodies.first() != Some(&last) {
    bodies.push(last);
  }
  bodies
}
