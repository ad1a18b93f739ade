//! Append-only audit log of every prompt and reply exchanged with the service.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::warn;

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
  Prompt,
  Response,
  FixPrompt,
  FixResponse,
}

impl LogKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      LogKind::Prompt => "PROMPT",
      LogKind::Response => "RESPONSE",
      LogKind::FixPrompt => "FIX_PROMPT",
      LogKind::FixResponse => "FIX_RESPONSE",
    }
  }
}

impl fmt::Display for LogKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

pub struct AuditLog {
  path: PathBuf,
}

impl AuditLog {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Append a record. Failures are logged and otherwise ignored.
  pub fn record(&self, kind: LogKind, text: &str) {
    if let Err(e) = self.append(kind, text) {
      warn!(path = %self.path.display(), kind = %kind, error = %e, "could not write audit log");
    }
  }

  fn append(&self, kind: LogKind, text: &str) -> io::Result<()> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;

    let mut record = String::with_capacity(text.len() + 3 * RULE_WIDTH);
    record.push_str(&"=".repeat(RULE_WIDTH));
    record.push('\n');
    record.push_str(&format!("TIMESTAMP: {}\n", Local::now().to_rfc3339()));
    record.push_str(&format!("TYPE: {kind}\n"));
    record.push_str(&"-".repeat(RULE_WIDTH));
    record.push('\n');
    record.push_str(text);
    record.push_str("\n\n");

    file.write_all(record.as_bytes())
  }
}
