//! The litany: a project's declared words.
//!
//! Stored as YAML at the project root:
//!
//! ```yaml
//! words:
//! - cadence
//! - metre
//! ```
//!
//! The litany is best-effort state. A missing, empty or unparseable file
//! loads as an empty litany (with a warning for the unparseable case) rather
//! than failing the caller. Names are kept in insertion order without
//! duplicates, and top-level keys other than `words` survive rewrites.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

const WORDS_KEY: &str = "words";

#[derive(Debug, Error)]
pub enum LitanyError {
  #[error("failed to serialize litany: {0}")]
  Serialize(#[source] serde_yaml::Error),

  #[error("failed to write litany '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Clone)]
pub struct Litany {
  path: PathBuf,
  /// The whole document, so unrelated keys are written back untouched.
  document: Mapping,
  words: Vec<String>,
}

impl Litany {
  /// An empty litany that will be saved at `path`.
  pub fn empty(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      document: Mapping::new(),
      words: Vec::new(),
    }
  }

  /// Load the litany at `path`.
  ///
  /// Never fails: anything unreadable degrades to an empty litany.
  pub fn load(path: &Path) -> Self {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no litany file, starting empty");
        return Self::empty(path);
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "could not read litany, treating it as empty");
        return Self::empty(path);
      }
    };

    if content.trim().is_empty() {
      return Self::empty(path);
    }

    let document = match serde_yaml::from_str::<Value>(&content) {
      Ok(Value::Mapping(map)) => map,
      Ok(Value::Null) => return Self::empty(path),
      Ok(_) => {
        warn!(path = %path.display(), "litany is not a YAML mapping, treating it as empty");
        return Self::empty(path);
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "could not parse litany, treating it as empty");
        return Self::empty(path);
      }
    };

    let words = match document.get(WORDS_KEY) {
      None | Some(Value::Null) => Vec::new(),
      Some(Value::Sequence(items)) => collect_words(path, items),
      Some(_) => {
        warn!(path = %path.display(), "litany 'words' is not a list, treating it as empty");
        Vec::new()
      }
    };

    Self {
      path: path.to_path_buf(),
      document,
      words,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Words in the order they were first added.
  pub fn words(&self) -> &[String] {
    &self.words
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.words.iter().any(|w| w == name)
  }

  /// Record `name`, saving immediately.
  ///
  /// Returns `false` without touching the file if it was already present.
  pub fn add(&mut self, name: &str) -> Result<bool, LitanyError> {
    if self.contains(name) {
      info!("'{}' already in {}", name, self.path.display());
      return Ok(false);
    }

    info!("Adding '{}' to {}", name, self.path.display());
    self.words.push(name.to_string());
    self.save()?;
    Ok(true)
  }

  /// Write the whole document back to disk.
  pub fn save(&self) -> Result<(), LitanyError> {
    let mut document = self.document.clone();
    document.insert(
      Value::String(WORDS_KEY.to_string()),
      Value::Sequence(self.words.iter().cloned().map(Value::String).collect()),
    );

    let content = serde_yaml::to_string(&document).map_err(LitanyError::Serialize)?;
    fs::write(&self.path, content).map_err(|e| LitanyError::Write {
      path: self.path.clone(),
      source: e,
    })
  }
}

fn collect_words(path: &Path, items: &[Value]) -> Vec<String> {
  let mut words: Vec<String> = Vec::with_capacity(items.len());
  for item in items {
    let name = match item {
      Value::String(s) => s.trim().to_string(),
      Value::Number(n) => n.to_string(),
      Value::Bool(b) => b.to_string(),
      other => {
        warn!(path = %path.display(), entry = ?other, "skipping litany entry that is not a name");
        continue;
      }
    };
    if !name.is_empty() && !words.contains(&name) {
      words.push(name);
    }
  }
  words
}
